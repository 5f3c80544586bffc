use cs_core::CallScriptError;
use std::fmt::Display;

fn map_error(code: &'static str, error: impl Display) -> CallScriptError {
    CallScriptError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: CallScriptError) -> i32 {
    tracing::debug!(code = %error.code, "command failed");
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.message).expect("string json")
    );
    1
}

pub(crate) fn map_tui_io(error: std::io::Error) -> CallScriptError {
    map_error("TUI_IO", error)
}

pub(crate) fn map_cli_state_write(error: std::io::Error) -> CallScriptError {
    map_error("CLI_STATE_WRITE", error)
}

pub(crate) fn map_cli_state_read(error: std::io::Error) -> CallScriptError {
    map_error("CLI_STATE_READ", error)
}

pub(crate) fn map_cli_state_invalid(error: serde_json::Error) -> CallScriptError {
    map_error("CLI_STATE_INVALID", error)
}

pub(crate) fn map_config_read(error: std::io::Error) -> CallScriptError {
    map_error("CONFIG_READ", error)
}

pub(crate) fn map_config_invalid(error: serde_json::Error) -> CallScriptError {
    map_error("CONFIG_INVALID", error)
}

pub(crate) fn map_activity_write(error: std::io::Error) -> CallScriptError {
    map_error("ACTIVITY_WRITE", error)
}

pub(crate) fn map_activity_encode(error: serde_json::Error) -> CallScriptError {
    map_error("ACTIVITY_ENCODE", error)
}

pub(crate) fn map_log_file(error: std::io::Error) -> CallScriptError {
    map_error("CLI_LOG_FILE", error)
}
