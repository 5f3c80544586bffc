impl CallSession {
    pub fn new(graph: Arc<ScriptGraph>) -> Self {
        Self::with_substitutions(graph, SubstitutionTable::default())
    }

    pub fn with_substitutions(graph: Arc<ScriptGraph>, substitutions: SubstitutionTable) -> Self {
        Self {
            graph,
            current: START_STATE,
            history: Vec::new(),
            substitutions,
        }
    }

    pub fn graph(&self) -> &Arc<ScriptGraph> {
        &self.graph
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn history(&self) -> &[StateId] {
        &self.history
    }

    pub fn substitutions(&self) -> &SubstitutionTable {
        &self.substitutions
    }

    pub fn current_view(&self) -> CurrentView {
        self.view_with(None)
    }

    /// Returns to start with empty history.
    ///
    /// Every substitution goes back to its default except the caller name.
    pub fn reset(&mut self) -> CurrentView {
        self.reset_with(|| {})
    }

    /// Like [`CallSession::reset`], running `hook` once before the view is built.
    pub fn reset_with(&mut self, hook: impl FnOnce()) -> CurrentView {
        self.current = START_STATE;
        self.history.clear();
        self.substitutions.reset();
        hook();
        debug!("call session reset");
        self.current_view()
    }

    pub fn set_substitution(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), EngineError> {
        let result = key
            .parse::<PlaceholderKey>()
            .and_then(|key| self.substitutions.set(key, value));
        if let Err(error) = &result {
            warn!(code = error.code(), "{}", error);
        }
        result
    }

    /// Applies every valid entry, then reports the first rejected one.
    pub fn set_substitutions<I, K, V>(&mut self, mapping: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut first_error = None;
        for (key, value) in mapping {
            if let Err(error) = self.set_substitution(key.as_ref(), value) {
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    pub fn set_field(
        &mut self,
        field: ProspectField,
        value: impl Into<String>,
    ) -> Result<(), EngineError> {
        self.substitutions.set(field.key(), value)
    }

    fn view_with(&self, side_effect: Option<SideEffect>) -> CurrentView {
        let state = self.graph.state(self.current);
        let transitions = state
            .transitions
            .iter()
            .enumerate()
            .map(|(index, transition)| TransitionView {
                index,
                label: render_template(&transition.label, &self.substitutions),
                target: transition.target,
                action: transition.action,
            })
            .collect();
        CurrentView {
            state: state.id,
            text: render_template(&state.text, &self.substitutions),
            mood: state.mood,
            transitions,
            side_effect,
            can_go_back: !self.history.is_empty(),
        }
    }
}
