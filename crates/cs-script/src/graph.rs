use std::collections::BTreeMap;

use cs_core::{EngineError, State, StateId, START_STATE};

/// Immutable, validated set of call-script states.
///
/// Built only through [`crate::compile_script_graph_from_json`], so every
/// [`StateId`] has exactly one definition and the graph loops back to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptGraph {
    states: BTreeMap<StateId, State>,
}

impl ScriptGraph {
    pub(crate) fn from_validated(states: BTreeMap<StateId, State>) -> Self {
        Self { states }
    }

    pub fn start(&self) -> StateId {
        START_STATE
    }

    pub fn get(&self, id: StateId) -> Result<&State, EngineError> {
        self.states.get(&id).ok_or_else(|| EngineError::NotFound {
            id: id.as_str().to_string(),
        })
    }

    /// Infallible lookup for ids already known to the graph.
    ///
    /// # Panics
    /// Panics if `id` has no definition, which validation rules out.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[&id]
    }

    pub fn get_by_name(&self, raw: &str) -> Result<&State, EngineError> {
        let id = raw.parse::<StateId>()?;
        self.get(id)
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod graph_tests {
    use super::*;
    use cs_core::Mood;

    fn single_state_graph() -> ScriptGraph {
        let mut states = BTreeMap::new();
        states.insert(
            StateId::Start,
            State {
                id: StateId::Start,
                text: "Click 'Dial'".to_string(),
                mood: Mood::Neutral,
                transitions: Vec::new(),
            },
        );
        ScriptGraph::from_validated(states)
    }

    #[test]
    fn get_reports_missing_ids_as_not_found() {
        let graph = single_state_graph();
        assert_eq!(graph.get(StateId::Start).map(|s| s.id), Ok(StateId::Start));
        assert_eq!(
            graph.get(StateId::Hook),
            Err(EngineError::NotFound {
                id: "hook".to_string()
            })
        );
    }

    #[test]
    fn get_by_name_parses_before_lookup() {
        let graph = single_state_graph();
        assert!(graph.get_by_name("start").is_ok());
        assert_eq!(
            graph.get_by_name("lobby"),
            Err(EngineError::NotFound {
                id: "lobby".to_string()
            })
        );
        assert_eq!(graph.len(), 1);
        assert!(!graph.is_empty());
    }
}
