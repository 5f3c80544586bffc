use std::path::Path;

use cs_api::{create_session, prospect_from_query, CreateSessionOptions};
use cs_core::{CallScriptError, CurrentView, Mood, SideEffect, StateId};
use cs_runtime::CallSession;
use serde::{Deserialize, Serialize};

use crate::source::read_test_case;
use crate::{CsToolError, TestAction, TestCase};

pub const MAX_ACTIONS: usize = 5_000;

/// The parts of a [`CurrentView`] a case can assert on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedView {
    pub state: StateId,
    pub mood: Mood,
    pub text: String,
    pub targets: Vec<StateId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effect: Option<SideEffect>,
    pub can_go_back: bool,
}

impl From<CurrentView> for ObservedView {
    fn from(view: CurrentView) -> Self {
        Self {
            state: view.state,
            mood: view.mood,
            text: view.text,
            targets: view.transitions.iter().map(|t| t.target).collect(),
            side_effect: view.side_effect,
            can_go_back: view.can_go_back,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub observed_views: Vec<ObservedView>,
    pub consumed_actions: usize,
}

fn apply_action(
    session: &mut CallSession,
    action: &TestAction,
) -> Result<CurrentView, CallScriptError> {
    let view = match action {
        TestAction::Begin => session.begin_call()?,
        TestAction::Advance { target } => session.advance_by_name(target)?,
        TestAction::Choose { index } => session.choose(*index)?,
        TestAction::Back => session.go_back(),
        TestAction::Reset => session.reset(),
        TestAction::Set { key, value } => {
            session.set_substitution(key, value.as_str())?;
            session.current_view()
        }
    };
    Ok(view)
}

pub fn run_case(case: &TestCase) -> Result<RunReport, CsToolError> {
    if case.actions.len() > MAX_ACTIONS {
        return Err(CsToolError::GuardExceeded {
            max_actions: MAX_ACTIONS,
        });
    }

    let mut session = create_session(CreateSessionOptions {
        script_json: None,
        caller_name: case.caller_name.clone(),
        substitutions: case.substitutions.clone(),
        prospect: case.prospect_query.as_deref().map(prospect_from_query),
    })?;

    let mut observed_views = vec![ObservedView::from(session.current_view())];
    for (action_index, action) in case.actions.iter().enumerate() {
        let view =
            apply_action(&mut session, action).map_err(|source| CsToolError::ActionFailed {
                action_index,
                action_kind: action.kind_name().to_string(),
                source,
            })?;
        observed_views.push(ObservedView::from(view));
    }

    Ok(RunReport {
        observed_views,
        consumed_actions: case.actions.len(),
    })
}

pub fn assert_case(case_path: &Path) -> Result<(), CsToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(&case)?;

    if report.observed_views.len() != case.expected_views.len() {
        let observed = serde_json::to_string_pretty(&report.observed_views)
            .map_err(CsToolError::ViewSerialize)?;
        return Err(CsToolError::ViewCountMismatch {
            expected: case.expected_views.len(),
            actual: report.observed_views.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in case
        .expected_views
        .iter()
        .zip(report.observed_views.iter())
        .enumerate()
    {
        if !expected.matches(actual) {
            let expected = serde_json::to_string(expected).map_err(CsToolError::ViewSerialize)?;
            let actual = serde_json::to_string(actual).map_err(CsToolError::ViewSerialize)?;
            return Err(CsToolError::ViewMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    Ok(())
}
