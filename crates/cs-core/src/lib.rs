pub mod error;
pub mod substitution;
pub mod types;

pub use error::{CallScriptError, EngineError};
pub use substitution::*;
pub use types::*;
