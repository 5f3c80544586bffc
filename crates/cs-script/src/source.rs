use cs_core::{CallScriptError, State};
use serde::{Deserialize, Serialize};

pub const SCRIPT_SCHEMA_V1: &str = "call-script.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSource {
    pub schema_version: String,
    pub states: Vec<State>,
}

pub(crate) fn parse_script_source(raw: &str) -> Result<ScriptSource, CallScriptError> {
    let source: ScriptSource = serde_json::from_str(raw).map_err(|error| {
        CallScriptError::new(
            "SCRIPT_PARSE",
            format!("Failed to parse call script: {}", error),
        )
    })?;

    if source.schema_version != SCRIPT_SCHEMA_V1 {
        return Err(CallScriptError::new(
            "SCRIPT_SCHEMA",
            format!(
                "Unsupported call script schema \"{}\", expected \"{}\".",
                source.schema_version, SCRIPT_SCHEMA_V1
            ),
        ));
    }

    Ok(source)
}
