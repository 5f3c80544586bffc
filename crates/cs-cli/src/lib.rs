use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use cs_core::CallScriptError;
use cs_runtime::unknown_placeholders;
use tracing::info;

mod activity_store;
mod agent;
mod cli_args;
mod config;
mod error_map;
mod line_tui;
mod logging;
mod markup;
mod models;
mod notes;
mod search;
mod session_ops;
mod state_store;
mod tui;
mod tui_actions;
mod tui_render;
mod tui_state;
mod view_output;

pub(crate) use activity_store::save_call_notes;
pub(crate) use cli_args::{
    AdvanceArgs, AgentArgs, AgentCommand, CheckArgs, ChooseArgs, Cli, Mode, NoteArgs,
    ProspectArgs, SearchArgs, SetArgs, StartArgs, StepArgs, TuiArgs,
};
pub(crate) use config::CliConfig;
pub(crate) use error_map::{
    emit_error, map_activity_encode, map_activity_write, map_cli_state_invalid, map_cli_state_read,
    map_cli_state_write, map_config_invalid, map_config_read, map_log_file, map_tui_io,
};
pub(crate) use line_tui::run_tui_line_mode;
pub(crate) use logging::{init_file_logging, init_stderr_logging};
pub(crate) use markup::{to_plain_lines, to_styled_lines};
pub(crate) use models::{
    ActivityOutcome, AgentState, TuiCommandAction, TuiCommandContext, AGENT_STATE_SCHEMA,
};
pub(crate) use notes::CallNotes;
pub(crate) use search::{build_search_url, parse_search_input, SearchKind, SearchQuery};
pub(crate) use session_ops::{emit_view_with_saved_state, ActiveCall};
pub(crate) use state_store::{load_agent_state, save_agent_state};
pub(crate) use tui::rich_terminal_available;
pub(crate) use tui_actions::handle_key;
pub(crate) use tui_render::render_tui;
pub(crate) use tui_state::{InputMode, TuiUiState, CHOICE_VIEWPORT_ROWS};
pub(crate) use view_output::{emit_view, plain_label};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, CallScriptError> {
    let config = CliConfig::load(cli.global.config.as_deref())?
        .with_log_level(cli.global.log_level.as_deref());
    if matches!(cli.command, Mode::Tui(_)) && rich_terminal_available() {
        init_file_logging(&config.log_level, &config.log_file())?;
    } else {
        init_stderr_logging(&config.log_level);
    }

    match cli.command {
        Mode::Agent(args) => agent::run_agent(args, &config),
        Mode::Tui(args) => run_tui(args, &config),
        Mode::Search(args) => run_search(args),
        Mode::Check(args) => run_check(args, &config),
    }
}

fn run_tui(args: TuiArgs, config: &CliConfig) -> Result<i32, CallScriptError> {
    let state_file = args
        .state_file
        .unwrap_or_else(|| config.default_state_file().to_string_lossy().to_string());
    let mut call = ActiveCall::start(config, &args.prospect)?;
    let context = TuiCommandContext {
        state_file: &state_file,
        config,
    };
    tui::run_tui_ratatui_mode(&context, &mut call)
}

fn run_search(args: SearchArgs) -> Result<i32, CallScriptError> {
    let query = SearchQuery {
        query: args.query,
        city: args.city,
        state: args.state,
        location: args.location,
    };
    let url = build_search_url(args.kind, &query)
        .ok_or_else(|| CallScriptError::new("CLI_SEARCH_EMPTY", "Search query is empty"))?;
    println!("RESULT:OK");
    println!("URL:{}", url);
    Ok(0)
}

fn run_check(args: CheckArgs, config: &CliConfig) -> Result<i32, CallScriptError> {
    let graph = match &args.script {
        Some(path) => Arc::new(cs_script::load_script_graph_from_file(Path::new(path))?),
        None => cs_api::load_graph(config.script_json()?.as_deref())?,
    };

    let unknown = unknown_placeholders(&graph);
    if !unknown.is_empty() {
        let listed = unknown
            .iter()
            .map(|(state, key)| format!("{}:[{}]", state.as_str(), key))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(CallScriptError::new(
            "SCRIPT_UNKNOWN_PLACEHOLDER",
            format!("Script uses unknown placeholders: {}", listed),
        ));
    }

    info!(states = graph.len(), "call script is valid");
    println!("RESULT:OK");
    println!("STATES:{}", graph.len());
    Ok(0)
}
