use thiserror::Error;

use crate::types::StateId;

/// Local, recoverable conditions raised by the dialogue engine.
///
/// None of these mutate the session: the engine returns the error and leaves
/// the current state, history and substitutions exactly as they were.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("State \"{id}\" is not defined in the script graph.")]
    NotFound { id: String },
    #[error("State \"{target}\" is not a transition of \"{from}\".")]
    InvalidTransition { from: StateId, target: StateId },
    #[error("Choice index \"{index}\" is out of range 0..{max}.")]
    InvalidChoiceIndex { index: usize, max: usize },
    #[error("Unknown placeholder key \"{key}\".")]
    UnknownKey { key: String },
    #[error("Placeholder key \"{key}\" is derived and cannot be set directly.")]
    DerivedKey { key: String },
    #[error("Unsupported session snapshot schema \"{found}\".")]
    SnapshotSchema { found: String },
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "ENGINE_STATE_NOT_FOUND",
            Self::InvalidTransition { .. } => "ENGINE_INVALID_TRANSITION",
            Self::InvalidChoiceIndex { .. } => "ENGINE_CHOICE_INDEX",
            Self::UnknownKey { .. } => "ENGINE_UNKNOWN_KEY",
            Self::DerivedKey { .. } => "ENGINE_DERIVED_KEY",
            Self::SnapshotSchema { .. } => "ENGINE_SNAPSHOT_SCHEMA",
        }
    }
}

#[derive(Debug, Error, Clone)]
#[error("{code}: {message}")]
pub struct CallScriptError {
    pub code: String,
    pub message: String,
}

impl CallScriptError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<EngineError> for CallScriptError {
    fn from(error: EngineError) -> Self {
        Self::new(error.code(), error.to_string())
    }
}
