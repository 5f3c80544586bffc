use std::path::Path;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use cs_core::{CallScriptError, ProspectField};
use tracing::info;

use crate::{
    build_search_url, parse_search_input, ActiveCall, InputMode, SearchKind, TuiCommandContext,
    TuiUiState,
};

/// Applies one key press. Returns `true` when the UI should quit.
pub(crate) fn handle_key(
    key: KeyEvent,
    context: &TuiCommandContext<'_>,
    call: &mut ActiveCall,
    ui: &mut TuiUiState,
    now: Instant,
) -> Result<bool, CallScriptError> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }
    if ui.input.is_some() {
        handle_input_key(key, call, ui)?;
        return Ok(false);
    }
    if key.code == KeyCode::Esc || matches!(key.code, KeyCode::Char('q')) {
        return Ok(true);
    }

    match key.code {
        KeyCode::Char('h') => ui.help_visible = !ui.help_visible,
        KeyCode::Char('t') => ui.notes_visible = !ui.notes_visible,
        KeyCode::Char('d') => {
            let view = call.session.begin_call()?;
            ui.show_view(view, now);
            ui.status = "dialing".to_string();
        }
        KeyCode::Char('b') | KeyCode::Backspace => {
            let view = call.session.go_back();
            ui.show_view(view, now);
            ui.status = "back".to_string();
        }
        KeyCode::Char('r') => {
            let view = call.restart();
            ui.show_view(view, now);
            ui.status = "restarted".to_string();
        }
        KeyCode::Char('s') => {
            call.save(Path::new(context.state_file))?;
            ui.status = format!("saved to {}", context.state_file);
        }
        KeyCode::Char('l') => {
            *call = ActiveCall::load(context.config, Path::new(context.state_file))?;
            ui.show_view(call.session.current_view(), now);
            ui.status = format!("loaded from {}", context.state_file);
        }
        KeyCode::Char('n') => {
            ui.start_input(InputMode::Note);
            ui.notes_visible = true;
        }
        KeyCode::Char('c') => {
            call.notes.clear();
            ui.notes_visible = true;
            ui.status = "notes cleared".to_string();
        }
        KeyCode::Char('/') => ui.start_input(InputMode::Search(SearchKind::Google)),
        KeyCode::Char('f') => ui.start_input(InputMode::Field(ProspectField::Name)),
        KeyCode::Up => ui.select_previous(),
        KeyCode::Down => ui.select_next(),
        KeyCode::Enter => {
            if ui.is_ringing(now) {
                ui.status = "ringing...".to_string();
                return Ok(false);
            }
            if ui.view.transitions.is_empty() {
                ui.status = "press d to dial".to_string();
                return Ok(false);
            }
            let index = ui.selected_choice_index;
            let view = call.session.choose(index)?;
            let activity = call.apply_side_effect(&view, context.config);
            ui.show_view(view, now);
            ui.status = match activity {
                Some(outcome) => format!("chose {} | notes {}", index, outcome.as_str()),
                None => format!("chose {}", index),
            };
        }
        _ => {}
    }
    Ok(false)
}

fn next_search_kind(kind: SearchKind) -> SearchKind {
    match kind {
        SearchKind::Google => SearchKind::Maps,
        SearchKind::Maps => SearchKind::Beenverified,
        SearchKind::Beenverified => SearchKind::Apollo,
        SearchKind::Apollo => SearchKind::Google,
    }
}

fn next_field(field: ProspectField) -> ProspectField {
    let all = ProspectField::ALL;
    let position = all.iter().position(|f| *f == field).unwrap_or(0);
    all[(position + 1) % all.len()]
}

fn handle_input_key(
    key: KeyEvent,
    call: &mut ActiveCall,
    ui: &mut TuiUiState,
) -> Result<(), CallScriptError> {
    match key.code {
        KeyCode::Esc => {
            ui.finish_input();
            ui.status = "cancelled".to_string();
        }
        KeyCode::Tab => match ui.input {
            Some(InputMode::Search(kind)) => {
                ui.input = Some(InputMode::Search(next_search_kind(kind)));
            }
            Some(InputMode::Field(field)) => {
                ui.input = Some(InputMode::Field(next_field(field)));
            }
            _ => {}
        },
        KeyCode::Backspace | KeyCode::Delete => {
            ui.input_buffer.pop();
        }
        KeyCode::Enter => match ui.finish_input() {
            Some((InputMode::Note, text)) => {
                if !text.trim().is_empty() {
                    call.notes.append(text.trim());
                }
                ui.status = "noted".to_string();
            }
            Some((InputMode::Search(kind), query)) => {
                ui.status = match build_search_url(kind, &parse_search_input(&query)?) {
                    Some(url) => {
                        info!(url = %url, "search link built");
                        url
                    }
                    None => "nothing to search".to_string(),
                };
            }
            Some((InputMode::Field(field), value)) => {
                let view = call.set_field(field, value.trim())?;
                ui.refresh_view(view);
                ui.status = format!("{} updated", field.as_str());
            }
            None => {}
        },
        KeyCode::Char(ch)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            ui.input_buffer.push(ch);
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tui_actions_tests {
    use super::*;
    use crate::cli_test_support::*;
    use crate::{CliConfig, ProspectArgs};
    use cs_core::StateId;
    use std::time::Duration;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    struct Harness {
        config: CliConfig,
        state_file: String,
        call: ActiveCall,
        ui: TuiUiState,
        now: Instant,
    }

    impl Harness {
        fn new(name: &str, ring_delay_ms: u64) -> Self {
            let dir = temp_path(name);
            let config = CliConfig {
                state_dir: dir.clone(),
                ring_delay_ms,
                ..CliConfig::default()
            };
            let args = ProspectArgs {
                prospect_query: Some("name=Pat&company=Acme&accountId=a1&contactId=c1".to_string()),
                ..ProspectArgs::default()
            };
            let call = ActiveCall::start(&config, &args).expect("start");
            let now = Instant::now();
            let ui = TuiUiState::new(call.session.current_view(), config.ring_delay(), now);
            Self {
                state_file: dir.join("save.json").to_string_lossy().to_string(),
                config,
                call,
                ui,
                now,
            }
        }

        fn key(&mut self, code: KeyCode) -> Result<bool, CallScriptError> {
            let context = TuiCommandContext {
                state_file: &self.state_file,
                config: &self.config,
            };
            handle_key(press(code), &context, &mut self.call, &mut self.ui, self.now)
        }

        fn keys(&mut self, codes: &[KeyCode]) {
            for code in codes {
                assert!(!self.key(*code).expect("key"));
            }
        }

        fn typed(&mut self, text: &str) {
            for ch in text.chars() {
                self.keys(&[KeyCode::Char(ch)]);
            }
        }
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let mut harness = Harness::new("tui-quit", 0);
        assert!(harness.key(KeyCode::Char('q')).expect("q"));
        assert!(harness.key(KeyCode::Esc).expect("esc"));
        let context = TuiCommandContext {
            state_file: &harness.state_file,
            config: &harness.config,
        };
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(handle_key(ctrl_c, &context, &mut harness.call, &mut harness.ui, harness.now)
            .expect("ctrl-c"));
    }

    #[test]
    fn enter_is_held_back_while_ringing() {
        let mut harness = Harness::new("tui-ringing", 3000);
        harness.keys(&[KeyCode::Char('d'), KeyCode::Enter]);
        assert_eq!(harness.ui.status, "ringing...");
        assert_eq!(harness.call.session.current_state(), StateId::Dialing);

        harness.now += Duration::from_millis(3000);
        harness.ui.tick(harness.now);
        harness.keys(&[KeyCode::Enter]);
        assert_eq!(harness.call.session.current_state(), StateId::Hook);
    }

    #[test]
    fn arrows_and_enter_choose_the_selected_transition() {
        let mut harness = Harness::new("tui-choose", 0);
        harness.keys(&[KeyCode::Enter]);
        assert_eq!(harness.ui.status, "press d to dial");
        harness.keys(&[
            KeyCode::Char('d'),
            KeyCode::Enter,
            KeyCode::Down,
            KeyCode::Down,
            KeyCode::Down,
            KeyCode::Enter,
        ]);
        assert_eq!(harness.call.session.current_state(), StateId::GatekeeperIntro);
        assert_eq!(harness.ui.view.state, StateId::GatekeeperIntro);
        assert_eq!(harness.ui.status, "chose 3");

        harness.keys(&[KeyCode::Char('b')]);
        assert_eq!(harness.call.session.current_state(), StateId::Hook);
    }

    #[test]
    fn dial_twice_reports_an_error_and_keeps_state() {
        let mut harness = Harness::new("tui-dial-twice", 0);
        harness.keys(&[KeyCode::Char('d')]);
        let error = harness.key(KeyCode::Char('d')).expect_err("second dial");
        assert_eq!(error.code, "ENGINE_INVALID_TRANSITION");
        assert_eq!(harness.call.session.current_state(), StateId::Dialing);
    }

    #[test]
    fn note_and_search_inputs() {
        let mut harness = Harness::new("tui-inputs", 0);
        harness.keys(&[KeyCode::Char('n')]);
        harness.typed("quoted q3");
        harness.keys(&[KeyCode::Backspace, KeyCode::Char('4'), KeyCode::Enter]);
        assert_eq!(harness.call.notes.text(), "quoted q4");
        assert_eq!(harness.ui.status, "noted");

        harness.keys(&[KeyCode::Char('/'), KeyCode::Tab]);
        assert_eq!(harness.ui.input, Some(InputMode::Search(SearchKind::Maps)));
        harness.typed("Acme HQ");
        harness.keys(&[KeyCode::Enter]);
        assert_eq!(harness.ui.status, "https://www.google.com/maps/search/Acme%20HQ");

        harness.keys(&[KeyCode::Char('n'), KeyCode::Char('x'), KeyCode::Esc]);
        assert_eq!(harness.ui.status, "cancelled");
        assert_eq!(harness.call.notes.text(), "quoted q4");
    }

    #[test]
    fn field_input_cycles_fields_and_updates_the_script() {
        let mut harness = Harness::new("tui-fields", 0);
        harness.keys(&[KeyCode::Char('d'), KeyCode::Enter]);
        assert_eq!(harness.ui.view.state, StateId::Hook);

        harness.keys(&[KeyCode::Char('f')]);
        assert_eq!(harness.ui.input, Some(InputMode::Field(ProspectField::Name)));
        harness.typed("Robin");
        harness.keys(&[KeyCode::Enter]);
        assert_eq!(harness.ui.status, "name updated");
        assert!(harness.ui.view.text.contains("<strong>Robin</strong>"));
        assert_eq!(harness.call.prospect.contact_name(), Some("Robin"));
        assert_eq!(harness.call.session.current_state(), StateId::Hook);

        harness.keys(&[
            KeyCode::Char('f'),
            KeyCode::Tab,
            KeyCode::Tab,
            KeyCode::Tab,
            KeyCode::Tab,
            KeyCode::Tab,
        ]);
        assert_eq!(harness.ui.input, Some(InputMode::Field(ProspectField::Pain)));
        harness.typed("high bills");
        harness.keys(&[KeyCode::Enter]);
        assert_eq!(
            harness.call.session.substitutions().lookup("PP"),
            Some("high bills")
        );

        harness.keys(&[KeyCode::Char('f'), KeyCode::Tab]);
        for _ in 0..ProspectField::ALL.len() {
            harness.keys(&[KeyCode::Tab]);
        }
        assert_eq!(harness.ui.input, Some(InputMode::Field(ProspectField::Title)));
    }

    #[test]
    fn search_input_accepts_location_options() {
        let mut harness = Harness::new("tui-search-options", 0);
        harness.keys(&[KeyCode::Char('/'), KeyCode::Tab, KeyCode::Tab, KeyCode::Tab]);
        assert_eq!(harness.ui.input, Some(InputMode::Search(SearchKind::Apollo)));
        harness.typed("Pat --location Austin");
        harness.keys(&[KeyCode::Enter]);
        assert_eq!(
            harness.ui.status,
            "https://app.apollo.io/#/people?page=1&qKeywords=Pat%20&personLocations[]=Austin"
        );

        harness.keys(&[KeyCode::Char('/')]);
        harness.typed("Pat --zip 1");
        let error = harness.key(KeyCode::Enter).expect_err("unknown option");
        assert_eq!(error.code, "CLI_SEARCH_FLAG");
        assert_eq!(harness.ui.input, None);
    }

    #[test]
    fn save_restart_and_load_keys() {
        let mut harness = Harness::new("tui-save-load", 0);
        harness.keys(&[KeyCode::Char('d'), KeyCode::Char('s')]);
        assert!(harness.ui.status.starts_with("saved to "));

        harness.call.notes.append("keep me");
        harness.keys(&[KeyCode::Char('r')]);
        assert_eq!(harness.call.session.current_state(), StateId::Start);
        assert_eq!(harness.call.notes.text(), "");

        harness.keys(&[KeyCode::Char('l')]);
        assert_eq!(harness.call.session.current_state(), StateId::Dialing);
        assert_eq!(harness.ui.view.state, StateId::Dialing);

        harness.keys(&[KeyCode::Char('c')]);
        assert!(harness.call.notes.text().starts_with("• Company: "));
    }
}
