impl CallSession {
    /// Leaves the idle start state for the dialing step.
    pub fn begin_call(&mut self) -> Result<CurrentView, EngineError> {
        if self.current != START_STATE {
            let error = EngineError::InvalidTransition {
                from: self.current,
                target: DIAL_STATE,
            };
            warn!(code = error.code(), "{}", error);
            return Err(error);
        }
        self.enter(DIAL_STATE, None)
    }

    /// Follows the first transition of the current state that leads to `target`.
    pub fn advance(&mut self, target: StateId) -> Result<CurrentView, EngineError> {
        let found = self
            .graph
            .state(self.current)
            .transitions
            .iter()
            .find(|transition| transition.target == target)
            .map(|transition| transition.action);
        match found {
            Some(action) => self.enter(target, action),
            None => {
                let error = EngineError::InvalidTransition {
                    from: self.current,
                    target,
                };
                warn!(code = error.code(), "{}", error);
                Err(error)
            }
        }
    }

    pub fn advance_by_name(&mut self, target: &str) -> Result<CurrentView, EngineError> {
        let target = target.parse::<StateId>().inspect_err(|error| {
            warn!(code = error.code(), "{}", error);
        })?;
        self.advance(target)
    }

    /// Follows the transition at `index` in display order.
    pub fn choose(&mut self, index: usize) -> Result<CurrentView, EngineError> {
        let transitions = &self.graph.state(self.current).transitions;
        let Some(transition) = transitions.get(index) else {
            let error = EngineError::InvalidChoiceIndex {
                index,
                max: transitions.len(),
            };
            warn!(code = error.code(), "{}", error);
            return Err(error);
        };
        let (target, action) = (transition.target, transition.action);
        self.enter(target, action)
    }

    /// Steps back to the previous state. Does nothing when there is no history.
    pub fn go_back(&mut self) -> CurrentView {
        match self.history.pop() {
            Some(previous) => {
                debug!(from = %self.current, to = %previous, "going back");
                self.current = previous;
            }
            None => debug!("go back ignored, history is empty"),
        }
        self.current_view()
    }

    fn enter(
        &mut self,
        target: StateId,
        action: Option<SideEffect>,
    ) -> Result<CurrentView, EngineError> {
        self.graph.get(target)?;
        debug!(from = %self.current, to = %target, "advancing");
        self.history.push(self.current);
        self.current = target;
        Ok(self.view_with(action))
    }
}

#[cfg(test)]
mod navigation_tests {
    use super::session_test_support::*;
    use super::*;

    #[test]
    fn begin_call_moves_to_dialing() {
        let mut session = session();
        let view = session.begin_call().expect("begin");
        assert_eq!(view.state, StateId::Dialing);
        assert_eq!(session.history(), &[StateId::Start]);
        assert!(view.can_go_back);
        let targets = view
            .transitions
            .iter()
            .map(|transition| transition.target)
            .collect::<Vec<_>>();
        assert_eq!(
            targets,
            vec![
                StateId::Hook,
                StateId::MainScriptStart,
                StateId::VoicemailOrHangup
            ]
        );
    }

    #[test]
    fn begin_call_outside_start_is_rejected() {
        let mut session = session();
        session.begin_call().expect("begin");
        let error = session.begin_call().expect_err("second begin should fail");
        assert_eq!(
            error,
            EngineError::InvalidTransition {
                from: StateId::Dialing,
                target: StateId::Dialing
            }
        );
        assert_eq!(session.history(), &[StateId::Start]);
    }

    #[test]
    fn start_has_no_transition_to_dialing() {
        let mut session = session();
        let error = session
            .advance(StateId::Dialing)
            .expect_err("dialing is entered through begin_call");
        assert_eq!(error.code(), "ENGINE_INVALID_TRANSITION");
        assert_eq!(session.current_state(), StateId::Start);
    }

    #[test]
    fn advance_then_back_restores_previous_state() {
        let mut session = session();
        session.begin_call().expect("begin");
        session.advance(StateId::Hook).expect("advance");
        session.advance(StateId::MainScriptStart).expect("advance");
        assert_eq!(
            session.history(),
            &[StateId::Start, StateId::Dialing, StateId::Hook]
        );

        let view = session.go_back();
        assert_eq!(view.state, StateId::Hook);
        assert_eq!(session.history(), &[StateId::Start, StateId::Dialing]);
    }

    #[test]
    fn invalid_advance_leaves_session_unchanged() {
        let mut session = session();
        session.begin_call().expect("begin");
        session.advance(StateId::Hook).expect("advance");
        let before_history = session.history().to_vec();
        let before_view = session.current_view();

        let error = session
            .advance(StateId::Discovery)
            .expect_err("discovery is not reachable from hook");
        assert_eq!(
            error,
            EngineError::InvalidTransition {
                from: StateId::Hook,
                target: StateId::Discovery
            }
        );
        assert_eq!(session.history(), before_history.as_slice());
        assert_eq!(session.current_view(), before_view);
    }

    #[test]
    fn advance_by_name_rejects_unknown_ids() {
        let mut session = session();
        session.begin_call().expect("begin");
        let error = session
            .advance_by_name("lobby")
            .expect_err("unknown id should fail");
        assert_eq!(
            error,
            EngineError::NotFound {
                id: "lobby".to_string()
            }
        );
        let view = session.advance_by_name("hook").expect("known id");
        assert_eq!(view.state, StateId::Hook);
    }

    #[test]
    fn choose_picks_by_display_index() {
        let mut session = session();
        session.begin_call().expect("begin");
        session.advance(StateId::Hook).expect("advance");
        let view = session.choose(3).expect("gatekeeper option");
        assert_eq!(view.state, StateId::GatekeeperIntro);

        let error = session.choose(9).expect_err("index out of range");
        assert_eq!(error, EngineError::InvalidChoiceIndex { index: 9, max: 3 });
        assert_eq!(session.current_state(), StateId::GatekeeperIntro);
    }

    #[test]
    fn go_back_on_empty_history_is_a_no_op() {
        let mut session = session();
        let view = session.go_back();
        assert_eq!(view.state, StateId::Start);
        assert!(session.history().is_empty());
        assert_eq!(view, session.current_view());
    }

    #[test]
    fn looping_back_to_start_keeps_history() {
        let mut session = session();
        session.begin_call().expect("begin");
        session.choose(0).expect("hook");
        walk(
            &mut session,
            &[StateId::GatekeeperIntro, StateId::Voicemail, StateId::Start],
        );
        assert_eq!(session.current_state(), StateId::Start);
        assert_eq!(session.history().len(), 5);

        let mut from_hook = session.clone();
        from_hook.reset();
        from_hook.begin_call().expect("begin");
        from_hook.advance(StateId::Hook).expect("hook");
        let history_at_hook = from_hook.history().len();
        walk(
            &mut from_hook,
            &[StateId::GatekeeperIntro, StateId::Voicemail, StateId::Start],
        );
        assert_eq!(from_hook.history().len() - history_at_hook, 3);
    }

    #[test]
    fn successful_call_reports_save_notes_once() {
        let mut session = session();
        session.begin_call().expect("begin");
        walk(
            &mut session,
            &[
                StateId::Hook,
                StateId::MainScriptStart,
                StateId::PathA,
                StateId::ResStruggle,
                StateId::Discovery,
                StateId::CloseForAppointment,
                StateId::AppointmentConfirmed,
                StateId::BillNo,
                StateId::BillEmailAdvice,
                StateId::CallSuccess,
            ],
        );
        let tagged = session.advance(StateId::Start).expect("start new call");
        assert_eq!(tagged.state, StateId::Start);
        assert_eq!(tagged.side_effect, Some(SideEffect::SaveNotes));
        assert_eq!(session.current_view().side_effect, None);
    }

    #[test]
    fn declined_call_ends_without_side_effect() {
        let mut session = session();
        session.begin_call().expect("begin");
        walk(
            &mut session,
            &[
                StateId::Hook,
                StateId::MainScriptStart,
                StateId::PathA,
                StateId::ResLockedIn,
                StateId::Discovery,
                StateId::ObjNoTime,
                StateId::SoftClose,
                StateId::CallEnd,
            ],
        );
        let view = session.advance(StateId::Start).expect("start over");
        assert_eq!(view.side_effect, None);
    }
}
