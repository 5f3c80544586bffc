mod prospect;

use std::collections::BTreeMap;
use std::sync::Arc;

use cs_core::{CallScriptError, SubstitutionTable};
use cs_runtime::{CallSession, SessionSnapshot};
use cs_script::{compile_script_graph_from_json, ScriptGraph};

pub use prospect::{prospect_from_query, ProspectInfo};

#[derive(Debug, Clone, Default)]
pub struct CreateSessionOptions {
    /// Custom script JSON. The embedded sales script is used when absent.
    pub script_json: Option<String>,
    pub caller_name: Option<String>,
    /// Raw placeholder key to value, applied after the caller name.
    pub substitutions: BTreeMap<String, String>,
    pub prospect: Option<ProspectInfo>,
}

#[derive(Debug, Clone)]
pub struct ResumeSessionOptions {
    pub script_json: Option<String>,
    pub snapshot: SessionSnapshot,
}

pub fn load_graph(script_json: Option<&str>) -> Result<Arc<ScriptGraph>, CallScriptError> {
    match script_json {
        Some(raw) => compile_script_graph_from_json(raw).map(Arc::new),
        None => Ok(ScriptGraph::builtin()),
    }
}

/// Builds a fresh session at the start state.
///
/// Prospect fields are applied before explicit substitutions, so the latter
/// win on overlap.
pub fn create_session(options: CreateSessionOptions) -> Result<CallSession, CallScriptError> {
    let graph = load_graph(options.script_json.as_deref())?;
    let table = match options.caller_name {
        Some(name) => SubstitutionTable::with_caller_name(name),
        None => SubstitutionTable::default(),
    };
    let mut session = CallSession::with_substitutions(graph, table);

    if let Some(prospect) = &options.prospect {
        session.set_substitutions(
            prospect
                .substitutions()
                .into_iter()
                .map(|(key, value)| (key.as_str(), value)),
        )?;
    }
    session.set_substitutions(options.substitutions)?;
    Ok(session)
}

pub fn resume_session(options: ResumeSessionOptions) -> Result<CallSession, CallScriptError> {
    let graph = load_graph(options.script_json.as_deref())?;
    Ok(CallSession::resume(graph, options.snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::{PlaceholderKey, StateId};

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn create_session_uses_builtin_script_by_default() {
        let session = create_session(CreateSessionOptions::default()).expect("session");
        assert_eq!(session.current_state(), StateId::Start);
        assert_eq!(session.graph().len(), StateId::ALL.len());
        assert_eq!(session.substitutions().get(PlaceholderKey::YN), "Lewis");
    }

    #[test]
    fn create_session_applies_prospect_then_explicit_values() {
        let session = create_session(CreateSessionOptions {
            caller_name: Some("Dana".to_string()),
            substitutions: map(&[("CN", "Globex"), ("PP", "renewal costs")]),
            prospect: Some(prospect_from_query("name=Pat&company=Acme")),
            ..CreateSessionOptions::default()
        })
        .expect("session");
        let table = session.substitutions();
        assert_eq!(table.get(PlaceholderKey::YN), "Dana");
        assert_eq!(table.get(PlaceholderKey::N), "Pat");
        assert_eq!(table.get(PlaceholderKey::CN), "Globex");
        assert_eq!(table.get(PlaceholderKey::PP), "renewal costs");
    }

    #[test]
    fn create_session_reports_bad_keys() {
        let error = create_session(CreateSessionOptions {
            substitutions: map(&[("TIA", "Retail")]),
            ..CreateSessionOptions::default()
        })
        .expect_err("derived key should fail");
        assert_eq!(error.code, "ENGINE_DERIVED_KEY");
    }

    #[test]
    fn create_session_rejects_invalid_script() {
        let error = create_session(CreateSessionOptions {
            script_json: Some("{".to_string()),
            ..CreateSessionOptions::default()
        })
        .expect_err("broken script should fail");
        assert_eq!(error.code, "SCRIPT_PARSE");
    }

    #[test]
    fn resume_session_restores_snapshot() {
        let mut session = create_session(CreateSessionOptions::default()).expect("session");
        session.begin_call().expect("begin");
        session.advance(StateId::Hook).expect("advance");

        let resumed = resume_session(ResumeSessionOptions {
            script_json: None,
            snapshot: session.snapshot(),
        })
        .expect("resume");
        assert_eq!(resumed.current_view(), session.current_view());

        let mut stale = session.snapshot();
        stale.schema_version = "call-session.v9".to_string();
        let error = resume_session(ResumeSessionOptions {
            script_json: None,
            snapshot: stale,
        })
        .expect_err("schema should fail");
        assert_eq!(error.code, "ENGINE_SNAPSHOT_SCHEMA");
    }
}
