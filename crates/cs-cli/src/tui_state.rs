use std::time::{Duration, Instant};

use cs_core::{CurrentView, ProspectField, TransitionView, DIAL_STATE};

use crate::SearchKind;

pub(crate) const CHOICE_VIEWPORT_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Note,
    Search(SearchKind),
    Field(ProspectField),
}

#[derive(Debug)]
pub(crate) struct TuiUiState {
    pub(crate) view: CurrentView,
    pub(crate) ring_delay: Duration,
    pub(crate) ringing_until: Option<Instant>,
    pub(crate) selected_choice_index: usize,
    pub(crate) choice_scroll_offset: usize,
    pub(crate) input: Option<InputMode>,
    pub(crate) input_buffer: String,
    pub(crate) help_visible: bool,
    pub(crate) notes_visible: bool,
    pub(crate) status: String,
}

impl TuiUiState {
    pub(crate) fn new(view: CurrentView, ring_delay: Duration, now: Instant) -> Self {
        let mut ui = Self {
            view: view.clone(),
            ring_delay,
            ringing_until: None,
            selected_choice_index: 0,
            choice_scroll_offset: 0,
            input: None,
            input_buffer: String::new(),
            help_visible: false,
            notes_visible: false,
            status: "ready".to_string(),
        };
        ui.show_view(view, now);
        ui
    }

    /// Replaces the displayed step. Entering the dial state holds the options
    /// back until the ring delay has passed.
    pub(crate) fn show_view(&mut self, view: CurrentView, now: Instant) {
        self.ringing_until = (view.state == DIAL_STATE && !self.ring_delay.is_zero())
            .then(|| now + self.ring_delay);
        self.view = view;
        self.selected_choice_index = 0;
        self.choice_scroll_offset = 0;
    }

    /// Re-renders the same step, keeping the selection and any ring delay.
    pub(crate) fn refresh_view(&mut self, view: CurrentView) {
        let last = view.transitions.len().saturating_sub(1);
        self.selected_choice_index = self.selected_choice_index.min(last);
        self.choice_scroll_offset = self.choice_scroll_offset.min(self.selected_choice_index);
        self.view = view;
    }

    pub(crate) fn is_ringing(&self, now: Instant) -> bool {
        self.ringing_until.is_some_and(|until| now < until)
    }

    /// Ends the ring delay once it has elapsed. Returns whether anything changed.
    pub(crate) fn tick(&mut self, now: Instant) -> bool {
        match self.ringing_until {
            Some(until) if now >= until => {
                self.ringing_until = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn visible_choices(&self, now: Instant) -> &[TransitionView] {
        if self.is_ringing(now) {
            &[]
        } else {
            &self.view.transitions
        }
    }

    pub(crate) fn select_previous(&mut self) {
        self.selected_choice_index = self.selected_choice_index.saturating_sub(1);
        if self.selected_choice_index < self.choice_scroll_offset {
            self.choice_scroll_offset = self.selected_choice_index;
        }
    }

    pub(crate) fn select_next(&mut self) {
        let count = self.view.transitions.len();
        let last = count.saturating_sub(1);
        self.selected_choice_index = (self.selected_choice_index + 1).min(last);
        if count > CHOICE_VIEWPORT_ROWS
            && self.selected_choice_index >= self.choice_scroll_offset + CHOICE_VIEWPORT_ROWS
        {
            self.choice_scroll_offset = self.selected_choice_index - CHOICE_VIEWPORT_ROWS + 1;
        }
    }

    pub(crate) fn start_input(&mut self, mode: InputMode) {
        self.input = Some(mode);
        self.input_buffer.clear();
    }

    /// Leaves input mode and hands back what was typed.
    pub(crate) fn finish_input(&mut self) -> Option<(InputMode, String)> {
        let mode = self.input.take()?;
        Some((mode, std::mem::take(&mut self.input_buffer)))
    }
}
