use std::sync::OnceLock;

use cs_core::{PlaceholderKey, StateId, SubstitutionTable};
use cs_script::ScriptGraph;
use regex::Regex;

fn placeholder_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\[([A-Z]+)\]").expect("placeholder regex must compile"))
}

/// Replaces every `[KEY]` token with its value from `table`.
///
/// Tokens naming a key outside [`PlaceholderKey::ALL`] render as the empty
/// string. Substituted values are not scanned again.
pub fn render_template(template: &str, table: &SubstitutionTable) -> String {
    let mut output = String::with_capacity(template.len());
    let mut last_index = 0usize;
    for captures in placeholder_regex().captures_iter(template) {
        let full = captures
            .get(0)
            .expect("capture group 0 must exist for each regex capture");
        let key = captures
            .get(1)
            .expect("capture group 1 must exist for each regex capture");
        output.push_str(&template[last_index..full.start()]);
        output.push_str(table.lookup(key.as_str()).unwrap_or(""));
        last_index = full.end();
    }
    output.push_str(&template[last_index..]);
    output
}

/// Raw keys referenced by `template`, in first-seen order.
pub fn placeholder_keys(template: &str) -> Vec<&str> {
    let mut keys = Vec::new();
    for captures in placeholder_regex().captures_iter(template) {
        if let Some(key) = captures.get(1) {
            if !keys.contains(&key.as_str()) {
                keys.push(key.as_str());
            }
        }
    }
    keys
}

/// Placeholders in state texts or transition labels that no table can fill.
pub fn unknown_placeholders(graph: &ScriptGraph) -> Vec<(StateId, String)> {
    let mut unknown = Vec::new();
    for state in graph.states() {
        let templates = std::iter::once(state.text.as_str())
            .chain(state.transitions.iter().map(|t| t.label.as_str()));
        for template in templates {
            for key in placeholder_keys(template) {
                let entry = (state.id, key.to_string());
                if PlaceholderKey::parse(key).is_none() && !unknown.contains(&entry) {
                    unknown.push(entry);
                }
            }
        }
    }
    unknown
}
