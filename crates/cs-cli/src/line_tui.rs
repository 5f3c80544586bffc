use std::io::{self, BufRead, Write};
use std::path::Path;

use cs_core::{CallScriptError, CurrentView};

use crate::{
    build_search_url, map_tui_io, parse_search_input, plain_label, to_plain_lines, ActiveCall,
    SearchKind, TuiCommandAction, TuiCommandContext,
};

const LINE_COMMANDS: &str =
    "commands: :help :dial :back :restart :set KEY VALUE :note TEXT :notes :clear-notes :search KIND QUERY [--city C] [--state S] [--location L] :save :load :quit";

pub(crate) fn run_tui_line_mode(
    context: &TuiCommandContext<'_>,
    call: &mut ActiveCall,
) -> Result<i32, CallScriptError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_tui_line_mode_with_io(context, call, &mut reader, &mut writer)
}

pub(crate) fn run_tui_line_mode_with_io(
    context: &TuiCommandContext<'_>,
    call: &mut ActiveCall,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, CallScriptError> {
    writeln!(writer, "Call Script TUI").map_err(map_tui_io)?;
    writeln!(writer, "{}", LINE_COMMANDS).map_err(map_tui_io)?;
    let mut view = call.session.current_view();
    let mut ringing = false;

    loop {
        write_view(&view, ringing, context, writer)?;
        ringing = false;
        loop {
            let Some(raw) = prompt_input_from("> ", reader, writer)? else {
                return Ok(0);
            };
            let mut lines = Vec::new();
            let mut emit = |line: String| lines.push(line);
            let outcome = handle_tui_command(raw.trim(), context, call, &mut emit);
            for line in lines {
                writeln!(writer, "{}", line).map_err(map_tui_io)?;
            }
            let action = match outcome {
                Ok(action) => action,
                Err(error) => {
                    report_error(&error, writer)?;
                    continue;
                }
            };
            match action {
                TuiCommandAction::Continue => continue,
                TuiCommandAction::RefreshView => {
                    view = call.session.current_view();
                    break;
                }
                TuiCommandAction::Dialed => {
                    view = call.session.current_view();
                    ringing = true;
                    break;
                }
                TuiCommandAction::Quit => return Ok(0),
                TuiCommandAction::NotHandled => {}
            }

            let choice = match raw.trim().parse::<usize>() {
                Ok(choice) => choice,
                Err(_) => {
                    let error = CallScriptError::new(
                        "TUI_CHOICE_PARSE",
                        format!("Invalid choice index: {}", raw),
                    );
                    report_error(&error, writer)?;
                    continue;
                }
            };
            match call.session.choose(choice) {
                Ok(next) => {
                    if let Some(outcome) = call.apply_side_effect(&next, context.config) {
                        writeln!(writer, "notes: {}", outcome.as_str()).map_err(map_tui_io)?;
                    }
                    view = next;
                    break;
                }
                Err(error) => report_error(&CallScriptError::from(error), writer)?,
            }
        }
    }
}

/// Prints the step. With `ringing` set the options wait out the ring delay.
fn write_view(
    view: &CurrentView,
    ringing: bool,
    context: &TuiCommandContext<'_>,
    writer: &mut dyn Write,
) -> Result<(), CallScriptError> {
    writeln!(writer).map_err(map_tui_io)?;
    writeln!(writer, "[{}] ({})", view.state.as_str(), view.mood.as_str()).map_err(map_tui_io)?;
    for line in to_plain_lines(&view.text) {
        writeln!(writer, "{}", line).map_err(map_tui_io)?;
    }
    let delay = context.config.ring_delay();
    if ringing && !delay.is_zero() {
        writeln!(writer, "ringing...").map_err(map_tui_io)?;
        writer.flush().map_err(map_tui_io)?;
        std::thread::sleep(delay);
    }
    if view.transitions.is_empty() {
        writeln!(writer, "(:dial to begin the call)").map_err(map_tui_io)?;
    }
    for transition in &view.transitions {
        writeln!(
            writer,
            "  [{}] {}",
            transition.index,
            plain_label(&transition.label)
        )
        .map_err(map_tui_io)?;
    }
    Ok(())
}

fn report_error(error: &CallScriptError, writer: &mut dyn Write) -> Result<(), CallScriptError> {
    writeln!(writer, "error: {} {}", error.code, error.message).map_err(map_tui_io)
}

pub(crate) fn handle_tui_command(
    raw: &str,
    context: &TuiCommandContext<'_>,
    call: &mut ActiveCall,
    emit: &mut dyn FnMut(String),
) -> Result<TuiCommandAction, CallScriptError> {
    let (command, rest) = raw.split_once(' ').unwrap_or((raw, ""));
    let rest = rest.trim();
    match command {
        ":help" => {
            emit(LINE_COMMANDS.to_string());
            Ok(TuiCommandAction::Continue)
        }
        ":dial" => {
            call.session.begin_call()?;
            Ok(TuiCommandAction::Dialed)
        }
        ":back" => {
            call.session.go_back();
            Ok(TuiCommandAction::RefreshView)
        }
        ":restart" => {
            call.restart();
            emit("restarted".to_string());
            Ok(TuiCommandAction::RefreshView)
        }
        ":set" => {
            let (key, value) = rest.split_once(' ').unwrap_or((rest, ""));
            call.session.set_substitution(key, value.trim())?;
            emit(format!("set: {}", key));
            Ok(TuiCommandAction::RefreshView)
        }
        ":note" => {
            call.notes.append(rest);
            emit("noted".to_string());
            Ok(TuiCommandAction::Continue)
        }
        ":notes" => {
            if call.notes.is_blank() {
                emit("(no notes)".to_string());
            } else {
                for line in call.notes.text().lines() {
                    emit(line.to_string());
                }
            }
            Ok(TuiCommandAction::Continue)
        }
        ":clear-notes" => {
            call.notes.clear();
            emit("notes cleared".to_string());
            Ok(TuiCommandAction::Continue)
        }
        ":search" => {
            let (kind, query) = rest.split_once(' ').unwrap_or((rest, ""));
            let kind = SearchKind::parse(kind).ok_or_else(|| {
                CallScriptError::new(
                    "CLI_SEARCH_KIND",
                    format!("Unknown search kind: {}", kind),
                )
            })?;
            match build_search_url(kind, &parse_search_input(query)?) {
                Some(url) => emit(url),
                None => emit("nothing to search".to_string()),
            }
            Ok(TuiCommandAction::Continue)
        }
        ":save" => {
            call.save(Path::new(context.state_file))?;
            emit(format!("saved: {}", context.state_file));
            Ok(TuiCommandAction::Continue)
        }
        ":load" => {
            *call = ActiveCall::load(context.config, Path::new(context.state_file))?;
            emit(format!("loaded: {}", context.state_file));
            Ok(TuiCommandAction::RefreshView)
        }
        ":quit" => {
            emit("bye".to_string());
            Ok(TuiCommandAction::Quit)
        }
        _ => Ok(TuiCommandAction::NotHandled),
    }
}

/// Reads one line, or `None` once the input is exhausted.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, CallScriptError> {
    write!(writer, "{}", prefix).map_err(map_tui_io)?;
    writer.flush().map_err(map_tui_io)?;
    let mut input = String::new();
    let read = reader.read_line(&mut input).map_err(map_tui_io)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
