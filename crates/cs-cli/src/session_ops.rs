use std::path::Path;

use cs_api::{
    create_session, prospect_from_query, resume_session, CreateSessionOptions, ProspectInfo,
    ResumeSessionOptions,
};
use cs_core::{CallScriptError, CurrentView, ProspectField, SideEffect};
use cs_runtime::CallSession;

use crate::{
    emit_view, load_agent_state, save_agent_state, save_call_notes, ActivityOutcome, AgentState,
    CallNotes, CliConfig, ProspectArgs, AGENT_STATE_SCHEMA,
};

/// A call in progress: the engine session plus what the UI keeps beside it.
#[derive(Debug, Clone)]
pub(crate) struct ActiveCall {
    pub(crate) session: CallSession,
    pub(crate) prospect: ProspectInfo,
    pub(crate) notes: CallNotes,
}

/// Query string first, then the individual flags on top.
pub(crate) fn prospect_from_args(args: &ProspectArgs) -> ProspectInfo {
    let mut prospect = args
        .prospect_query
        .as_deref()
        .map(prospect_from_query)
        .unwrap_or_default();
    let overrides = [
        (&mut prospect.name, &args.name),
        (&mut prospect.title, &args.title),
        (&mut prospect.company, &args.company),
        (&mut prospect.industry, &args.industry),
    ];
    for (slot, value) in overrides {
        if let Some(value) = value.as_ref().filter(|value| !value.is_empty()) {
            *slot = Some(value.clone());
        }
    }
    prospect
}

impl ActiveCall {
    pub(crate) fn start(config: &CliConfig, args: &ProspectArgs) -> Result<Self, CallScriptError> {
        let prospect = prospect_from_args(args);
        let session = create_session(CreateSessionOptions {
            script_json: config.script_json()?,
            caller_name: Some(
                args.caller_name
                    .clone()
                    .unwrap_or_else(|| config.caller_name.clone()),
            ),
            substitutions: Default::default(),
            prospect: Some(prospect.clone()),
        })?;
        Ok(Self {
            session,
            prospect,
            notes: CallNotes::default(),
        })
    }

    pub(crate) fn resume(config: &CliConfig, state: AgentState) -> Result<Self, CallScriptError> {
        let session = resume_session(ResumeSessionOptions {
            script_json: config.script_json()?,
            snapshot: state.session,
        })?;
        Ok(Self {
            session,
            prospect: state.prospect,
            notes: CallNotes::from_text(state.notes),
        })
    }

    pub(crate) fn load(config: &CliConfig, path: &Path) -> Result<Self, CallScriptError> {
        let state = load_agent_state(path)?;
        Self::resume(config, state)
    }

    pub(crate) fn to_agent_state(&self) -> AgentState {
        AgentState {
            schema_version: AGENT_STATE_SCHEMA.to_string(),
            session: self.session.snapshot(),
            prospect: self.prospect.clone(),
            notes: self.notes.text().to_string(),
        }
    }

    pub(crate) fn save(&self, path: &Path) -> Result<(), CallScriptError> {
        save_agent_state(path, &self.to_agent_state())
    }

    /// Edits one prospect detail mid-call and re-renders the current step.
    ///
    /// Name and company also feed the contact and account of saved notes.
    pub(crate) fn set_field(
        &mut self,
        field: ProspectField,
        value: &str,
    ) -> Result<CurrentView, CallScriptError> {
        self.session.set_field(field, value)?;
        let stored = Some(value.to_string()).filter(|value| !value.is_empty());
        match field {
            ProspectField::Name => self.prospect.name = stored,
            ProspectField::Title => self.prospect.title = stored,
            ProspectField::Company => self.prospect.company = stored,
            ProspectField::Industry => self.prospect.industry = stored,
            ProspectField::Benefit | ProspectField::Pain => {}
        }
        Ok(self.session.current_view())
    }

    /// Returns to the start state and wipes the notes in the same step.
    pub(crate) fn restart(&mut self) -> CurrentView {
        let notes = &mut self.notes;
        self.session.reset_with(|| notes.wipe())
    }

    /// Runs the action tagged on the transition that produced `view`, if any.
    pub(crate) fn apply_side_effect(
        &self,
        view: &CurrentView,
        config: &CliConfig,
    ) -> Option<ActivityOutcome> {
        match view.side_effect? {
            SideEffect::SaveNotes => Some(save_call_notes(
                &config.activity_log_path(),
                &self.prospect,
                self.notes.text(),
            )),
        }
    }
}

pub(crate) fn emit_view_with_saved_state(
    call: &ActiveCall,
    view: &CurrentView,
    activity: Option<&ActivityOutcome>,
    state_out: &str,
) -> Result<i32, CallScriptError> {
    call.save(Path::new(state_out))?;
    emit_view(view, activity, state_out);
    Ok(0)
}

#[cfg(test)]
mod session_ops_tests {
    use super::*;
    use crate::cli_test_support::*;
    use cs_core::StateId;

    fn config_in(dir: &Path) -> CliConfig {
        CliConfig {
            state_dir: dir.to_path_buf(),
            ring_delay_ms: 0,
            ..CliConfig::default()
        }
    }

    #[test]
    fn flags_override_query_fields() {
        let args = ProspectArgs {
            prospect_query: Some("name=Pat&company=Acme&accountId=a1".to_string()),
            company: Some("Acme Freight".to_string()),
            title: Some(String::new()),
            ..ProspectArgs::default()
        };
        let prospect = prospect_from_args(&args);
        assert_eq!(prospect.name.as_deref(), Some("Pat"));
        assert_eq!(prospect.company.as_deref(), Some("Acme Freight"));
        assert_eq!(prospect.title, None);
        assert_eq!(prospect.account_id.as_deref(), Some("a1"));
    }

    #[test]
    fn start_uses_config_caller_and_prospect_fields() {
        let config = CliConfig {
            caller_name: "Dana".to_string(),
            ..CliConfig::default()
        };
        let args = ProspectArgs {
            name: Some("Pat".to_string()),
            ..ProspectArgs::default()
        };
        let call = ActiveCall::start(&config, &args).expect("start");
        assert_eq!(call.session.substitutions().lookup("YN"), Some("Dana"));
        assert_eq!(call.session.substitutions().lookup("N"), Some("Pat"));

        let args = ProspectArgs {
            caller_name: Some("Sam".to_string()),
            ..ProspectArgs::default()
        };
        let call = ActiveCall::start(&config, &args).expect("start");
        assert_eq!(call.session.substitutions().lookup("YN"), Some("Sam"));
    }

    #[test]
    fn save_load_roundtrip_keeps_notes_and_prospect() {
        let dir = temp_path("session-ops");
        let config = config_in(&dir);
        let args = ProspectArgs {
            prospect_query: Some("name=Pat&accountId=a1&contactId=c1".to_string()),
            ..ProspectArgs::default()
        };
        let mut call = ActiveCall::start(&config, &args).expect("start");
        call.session.begin_call().expect("begin");
        call.notes.append("• Interest level: high");

        let path = dir.join("state.json");
        call.save(&path).expect("save");
        let loaded = ActiveCall::load(&config, &path).expect("load");
        assert_eq!(loaded.session.current_state(), StateId::Dialing);
        assert_eq!(loaded.notes.text(), "• Interest level: high");
        assert_eq!(loaded.prospect.contact_id.as_deref(), Some("c1"));
        assert_eq!(loaded.session.current_view(), call.session.current_view());
    }

    #[test]
    fn set_field_updates_placeholder_and_prospect() {
        let config = CliConfig::default();
        let mut call = ActiveCall::start(&config, &ProspectArgs::default()).expect("start");
        call.session.begin_call().expect("begin");
        call.session.advance(StateId::Hook).expect("hook");

        let view = call.set_field(ProspectField::Name, "Robin").expect("name");
        assert!(view.text.contains("<strong>Robin</strong>"));
        assert_eq!(call.prospect.contact_name(), Some("Robin"));

        call.set_field(ProspectField::Pain, "rising rates").expect("pain");
        assert_eq!(call.session.substitutions().lookup("PP"), Some("rising rates"));

        call.set_field(ProspectField::Company, "").expect("company");
        assert_eq!(call.prospect.account_name(), None);
        assert_eq!(call.session.current_state(), StateId::Hook);
    }

    #[test]
    fn restart_wipes_notes_and_keeps_caller() {
        let config = CliConfig::default();
        let mut call = ActiveCall::start(&config, &ProspectArgs::default()).expect("start");
        call.session.begin_call().expect("begin");
        call.notes.append("something");
        let view = call.restart();
        assert_eq!(view.state, StateId::Start);
        assert_eq!(call.notes.text(), "");
        assert_eq!(call.session.substitutions().lookup("YN"), Some("Lewis"));
    }

    #[test]
    fn save_notes_side_effect_writes_activity() {
        let dir = temp_path("session-ops-activity");
        let config = config_in(&dir);
        let args = ProspectArgs {
            prospect_query: Some("name=Pat&company=Acme&accountId=a1&contactId=c1".to_string()),
            ..ProspectArgs::default()
        };
        let mut call = ActiveCall::start(&config, &args).expect("start");
        call.notes.append("• Next steps: send quote");

        let quiet = call.session.current_view();
        assert_eq!(call.apply_side_effect(&quiet, &config), None);

        let mut tagged = quiet;
        tagged.side_effect = Some(SideEffect::SaveNotes);
        let outcome = call.apply_side_effect(&tagged, &config).expect("outcome");
        assert!(matches!(outcome, ActivityOutcome::Saved { .. }));
        assert!(config.activity_log_path().exists());
    }
}
