use cs_core::CurrentView;

use crate::{to_plain_lines, ActivityOutcome};

fn json_string(value: &str) -> String {
    serde_json::to_string(value).expect("string json")
}

/// Plain text of a transition label, markup removed and lines joined.
pub(crate) fn plain_label(label: &str) -> String {
    to_plain_lines(label).join(" ")
}

pub(crate) fn view_lines(
    view: &CurrentView,
    activity: Option<&ActivityOutcome>,
    state_out: &str,
) -> Vec<String> {
    let mut lines = vec![
        "RESULT:OK".to_string(),
        "EVENT:VIEW".to_string(),
        format!("STATE:{}", view.state.as_str()),
        format!("MOOD:{}", view.mood.as_str()),
    ];
    for text in to_plain_lines(&view.text) {
        lines.push(format!("TEXT_JSON:{}", json_string(&text)));
    }
    for transition in &view.transitions {
        lines.push(format!(
            "CHOICE:{}|{}|{}",
            transition.index,
            transition.target.as_str(),
            json_string(&plain_label(&transition.label))
        ));
    }
    if let Some(side_effect) = view.side_effect {
        lines.push(format!("SIDE_EFFECT:{}", side_effect.as_str()));
    }
    if let Some(activity) = activity {
        lines.push(format!("ACTIVITY:{}", activity.as_str()));
    }
    lines.push(format!("CAN_GO_BACK:{}", view.can_go_back));
    lines.push(format!("STATE_OUT:{}", state_out));
    lines
}

pub(crate) fn emit_view(view: &CurrentView, activity: Option<&ActivityOutcome>, state_out: &str) {
    for line in view_lines(view, activity, state_out) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod view_output_tests {
    use super::*;
    use cs_api::{create_session, CreateSessionOptions};
    use cs_core::StateId;

    #[test]
    fn hook_view_lists_choices_in_order() {
        let mut session = create_session(CreateSessionOptions::default()).expect("session");
        session.set_substitution("N", "Pat").expect("name");
        session.begin_call().expect("begin");
        let view = session.advance(StateId::Hook).expect("hook");

        let lines = view_lines(&view, None, "/tmp/state.json");
        assert_eq!(lines[0], "RESULT:OK");
        assert_eq!(lines[1], "EVENT:VIEW");
        assert_eq!(lines[2], "STATE:hook");
        assert_eq!(lines[4], "TEXT_JSON:\"Hi, is this Pat?\"");
        assert_eq!(lines[5], "CHOICE:0|main_script_start|\"✅ Yes, this is Pat\"");
        assert_eq!(lines[8], "CHOICE:3|gatekeeper_intro|\"👥 Gatekeeper / Not the right person\"");
        assert_eq!(lines[9], "CAN_GO_BACK:true");
        assert_eq!(lines[10], "STATE_OUT:/tmp/state.json");
    }

    #[test]
    fn side_effect_and_activity_are_reported() {
        let session = create_session(CreateSessionOptions::default()).expect("session");
        let mut view = session.current_view();
        view.side_effect = Some(cs_core::SideEffect::SaveNotes);
        let lines = view_lines(&view, Some(&ActivityOutcome::MissingIds), "out.json");
        assert!(lines.contains(&"SIDE_EFFECT:saveNotes".to_string()));
        assert!(lines.contains(&"ACTIVITY:skipped-missing-ids".to_string()));
        assert!(lines.contains(&"CAN_GO_BACK:false".to_string()));
    }

    #[test]
    fn plain_label_drops_markup() {
        assert_eq!(plain_label("<strong>Yes</strong> now"), "Yes now");
    }
}
