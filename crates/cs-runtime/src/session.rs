use std::sync::Arc;
use std::time::Duration;

use cs_core::{
    CurrentView, EngineError, PlaceholderKey, ProspectField, SideEffect, StateId,
    SubstitutionTable, TransitionView, DIAL_STATE, START_STATE,
};
use cs_script::ScriptGraph;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::template::render_template;

pub const SESSION_SNAPSHOT_SCHEMA: &str = "call-session.v1";

/// How long a front end shows the dialing step before offering its options.
pub const DIAL_RING_DELAY: Duration = Duration::from_secs(3);

/// One salesperson's walk through the call script.
///
/// Owns the current state, the back-navigation history and the substitution
/// table. Failed operations leave all three untouched.
#[derive(Debug, Clone)]
pub struct CallSession {
    graph: Arc<ScriptGraph>,
    current: StateId,
    history: Vec<StateId>,
    substitutions: SubstitutionTable,
}

include!("session/lifecycle.rs");
include!("session/navigation.rs");
include!("session/snapshot.rs");
