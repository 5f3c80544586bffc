use clap::{Args, Parser, Subcommand};

use crate::SearchKind;

#[derive(Debug, Parser)]
#[command(name = "callscript")]
#[command(about = "Sales call script assistant")]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) global: GlobalArgs,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Args)]
pub(crate) struct GlobalArgs {
    /// Config file. Defaults to `callscript.json` when present.
    #[arg(long = "config", global = true)]
    pub(crate) config: Option<String>,
    #[arg(long = "log-level", global = true)]
    pub(crate) log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Agent(AgentArgs),
    Tui(TuiArgs),
    Search(SearchArgs),
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[command(subcommand)]
    pub(crate) command: AgentCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AgentCommand {
    Start(StartArgs),
    Begin(StepArgs),
    Choose(ChooseArgs),
    Advance(AdvanceArgs),
    Back(StepArgs),
    Restart(StepArgs),
    Set(SetArgs),
    Note(NoteArgs),
}

/// Prospect details accepted by every command that opens a session.
#[derive(Debug, Args, Default, Clone)]
pub(crate) struct ProspectArgs {
    /// CRM link query string, e.g. `name=Pat&company=Acme&accountId=a1`.
    #[arg(long = "prospect-query")]
    pub(crate) prospect_query: Option<String>,
    #[arg(long = "name")]
    pub(crate) name: Option<String>,
    #[arg(long = "title")]
    pub(crate) title: Option<String>,
    #[arg(long = "company")]
    pub(crate) company: Option<String>,
    #[arg(long = "industry")]
    pub(crate) industry: Option<String>,
    #[arg(long = "caller-name")]
    pub(crate) caller_name: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct StartArgs {
    #[command(flatten)]
    pub(crate) prospect: ProspectArgs,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct StepArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct ChooseArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "choice")]
    pub(crate) choice: usize,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct AdvanceArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "target")]
    pub(crate) target: String,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct SetArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "key")]
    pub(crate) key: String,
    #[arg(long = "value")]
    pub(crate) value: String,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct NoteArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    /// Line appended to the call notes.
    #[arg(long = "text")]
    pub(crate) text: String,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct TuiArgs {
    #[command(flatten)]
    pub(crate) prospect: ProspectArgs,
    #[arg(long = "state-file")]
    pub(crate) state_file: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    #[arg(value_enum)]
    pub(crate) kind: SearchKind,
    pub(crate) query: String,
    #[arg(long = "city")]
    pub(crate) city: Option<String>,
    #[arg(long = "state")]
    pub(crate) state: Option<String>,
    #[arg(long = "location")]
    pub(crate) location: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    /// Script file to validate instead of the configured one.
    #[arg(long = "script")]
    pub(crate) script: Option<String>,
}
