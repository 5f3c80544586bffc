mod case;
mod runner;
mod source;

pub use case::{ExpectedView, TestAction, TestCase, TESTCASE_SCHEMA_V1};
pub use runner::{assert_case, run_case, ObservedView, RunReport, MAX_ACTIONS};
pub use source::{find_case_files, read_test_case};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsToolError {
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse testcase {path}: {source}")]
    ParseCase {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid testcase schema version \"{found}\", expected \"{expected}\".")]
    InvalidSchemaVersion { expected: String, found: String },
    #[error("No .case.json files under {path}.")]
    SourceEmpty { path: PathBuf },
    #[error("Engine error: {0}")]
    Engine(#[from] cs_core::CallScriptError),
    #[error("Action {action_index} ({action_kind}) failed: {source}")]
    ActionFailed {
        action_index: usize,
        action_kind: String,
        source: cs_core::CallScriptError,
    },
    #[error("Guard exceeded: max_actions={max_actions}.")]
    GuardExceeded { max_actions: usize },
    #[error("Expected view count {expected}, actual {actual}. observed={observed}")]
    ViewCountMismatch {
        expected: usize,
        actual: usize,
        observed: String,
    },
    #[error("View mismatch at index {index}. expected={expected} actual={actual}")]
    ViewMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("Failed to serialize view for diff: {0}")]
    ViewSerialize(serde_json::Error),
}
