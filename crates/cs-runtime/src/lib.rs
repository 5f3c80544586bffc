mod session;
mod template;

pub use session::{CallSession, SessionSnapshot, DIAL_RING_DELAY, SESSION_SNAPSHOT_SCHEMA};
pub use template::{placeholder_keys, render_template, unknown_placeholders};
