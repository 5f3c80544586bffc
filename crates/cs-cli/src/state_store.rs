use std::fs;
use std::path::Path;

use cs_core::CallScriptError;

use crate::{
    map_cli_state_invalid, map_cli_state_read, map_cli_state_write, AgentState,
    AGENT_STATE_SCHEMA,
};

pub(crate) fn save_agent_state(path: &Path, state: &AgentState) -> Result<(), CallScriptError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(map_cli_state_write)?;

    let payload = serde_json::to_string(state).expect("agent state should serialize");
    fs::write(path, payload).map_err(map_cli_state_write)
}

pub(crate) fn load_agent_state(path: &Path) -> Result<AgentState, CallScriptError> {
    if !path.exists() {
        return Err(CallScriptError::new(
            "CLI_STATE_NOT_FOUND",
            format!("State file does not exist: {}", path.display()),
        ));
    }

    let raw = fs::read_to_string(path).map_err(map_cli_state_read)?;

    let state: AgentState = serde_json::from_str(&raw).map_err(map_cli_state_invalid)?;

    if state.schema_version != AGENT_STATE_SCHEMA {
        return Err(CallScriptError::new(
            "CLI_STATE_SCHEMA",
            format!("Unsupported agent state schema: {}", state.schema_version),
        ));
    }

    Ok(state)
}
