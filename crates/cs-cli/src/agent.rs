use std::path::Path;

use cs_core::{CallScriptError, CurrentView};
use tracing::info;

use crate::{
    emit_view_with_saved_state, ActiveCall, AdvanceArgs, AgentArgs, AgentCommand, ChooseArgs,
    CliConfig, NoteArgs, SetArgs, StartArgs, StepArgs,
};

pub(super) fn run_agent(args: AgentArgs, config: &CliConfig) -> Result<i32, CallScriptError> {
    match args.command {
        AgentCommand::Start(args) => run_start(args, config),
        AgentCommand::Begin(args) => run_begin(args, config),
        AgentCommand::Choose(args) => run_choose(args, config),
        AgentCommand::Advance(args) => run_advance(args, config),
        AgentCommand::Back(args) => run_back(args, config),
        AgentCommand::Restart(args) => run_restart(args, config),
        AgentCommand::Set(args) => run_set(args, config),
        AgentCommand::Note(args) => run_note(args, config),
    }
}

pub(super) fn run_start(args: StartArgs, config: &CliConfig) -> Result<i32, CallScriptError> {
    let call = ActiveCall::start(config, &args.prospect)?;
    info!(state_out = %args.state_out, "call session started");
    let view = call.session.current_view();
    emit_view_with_saved_state(&call, &view, None, &args.state_out)
}

pub(super) fn run_begin(args: StepArgs, config: &CliConfig) -> Result<i32, CallScriptError> {
    run_state_transition(&args.state_in, &args.state_out, config, |call| {
        Ok(call.session.begin_call()?)
    })
}

pub(super) fn run_choose(args: ChooseArgs, config: &CliConfig) -> Result<i32, CallScriptError> {
    run_state_transition(&args.state_in, &args.state_out, config, |call| {
        Ok(call.session.choose(args.choice)?)
    })
}

pub(super) fn run_advance(args: AdvanceArgs, config: &CliConfig) -> Result<i32, CallScriptError> {
    run_state_transition(&args.state_in, &args.state_out, config, |call| {
        Ok(call.session.advance_by_name(&args.target)?)
    })
}

pub(super) fn run_back(args: StepArgs, config: &CliConfig) -> Result<i32, CallScriptError> {
    run_state_transition(&args.state_in, &args.state_out, config, |call| {
        Ok(call.session.go_back())
    })
}

pub(super) fn run_restart(args: StepArgs, config: &CliConfig) -> Result<i32, CallScriptError> {
    run_state_transition(&args.state_in, &args.state_out, config, |call| {
        Ok(call.restart())
    })
}

pub(super) fn run_set(args: SetArgs, config: &CliConfig) -> Result<i32, CallScriptError> {
    run_state_transition(&args.state_in, &args.state_out, config, |call| {
        call.session.set_substitution(&args.key, args.value.as_str())?;
        Ok(call.session.current_view())
    })
}

pub(super) fn run_note(args: NoteArgs, config: &CliConfig) -> Result<i32, CallScriptError> {
    run_state_transition(&args.state_in, &args.state_out, config, |call| {
        call.notes.append(&args.text);
        Ok(call.session.current_view())
    })
}

fn run_state_transition(
    state_in: &str,
    state_out: &str,
    config: &CliConfig,
    transition: impl FnOnce(&mut ActiveCall) -> Result<CurrentView, CallScriptError>,
) -> Result<i32, CallScriptError> {
    let mut call = ActiveCall::load(config, Path::new(state_in))?;
    let view = transition(&mut call)?;
    let activity = call.apply_side_effect(&view, config);
    emit_view_with_saved_state(&call, &view, activity.as_ref(), state_out)
}
