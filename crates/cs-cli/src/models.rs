use cs_api::ProspectInfo;
use cs_runtime::SessionSnapshot;
use serde::{Deserialize, Serialize};

use crate::CliConfig;

pub(crate) const AGENT_STATE_SCHEMA: &str = "call-agent-state.v1";

/// Everything a CLI invocation needs to pick a call back up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AgentState {
    pub(crate) schema_version: String,
    pub(crate) session: SessionSnapshot,
    #[serde(default)]
    pub(crate) prospect: ProspectInfo,
    #[serde(default)]
    pub(crate) notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ActivityOutcome {
    Saved { id: String },
    MissingIds,
    EmptyNotes,
    Failed,
}

impl ActivityOutcome {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Saved { .. } => "saved",
            Self::MissingIds => "skipped-missing-ids",
            Self::EmptyNotes => "skipped-empty",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TuiCommandAction {
    NotHandled,
    Continue,
    RefreshView,
    /// Like `RefreshView`, but the line rings before the options show.
    Dialed,
    Quit,
}

pub(crate) struct TuiCommandContext<'a> {
    pub(crate) state_file: &'a str,
    pub(crate) config: &'a CliConfig,
}
