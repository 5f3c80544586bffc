use std::time::Instant;

use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::{
    plain_label, to_styled_lines, ActiveCall, InputMode, TuiUiState, CHOICE_VIEWPORT_ROWS,
};

const ELLIPSIS: &str = "…";
const KEY_TEXT: &str = "keys: up/down move | enter choose | d dial | b back | r restart | f prospect field | n note | t notes | c clear notes | / search | s save | l load | h help | q quit";
const HELP_TEXT: &str = "after dialing the options appear once the line rings. choosing \"Start New Call\" after a success saves the notes. search: tab switches google/maps/beenverified/apollo, add --city/--state/--location after the query. f edits name/title/company/industry/benefit/pain, tab switches field.";

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let chars = value.chars().collect::<Vec<_>>();
    if chars.len() <= width {
        return value.to_string();
    }
    if width == 1 {
        return ELLIPSIS.to_string();
    }
    let mut out = chars.into_iter().take(width - 1).collect::<String>();
    out.push_str(ELLIPSIS);
    out
}

fn gray(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
}

pub(crate) fn header_lines(
    ui: &TuiUiState,
    call: &ActiveCall,
    state_file: &str,
    width: usize,
) -> Vec<Line<'static>> {
    let contact = call.prospect.contact_name().unwrap_or("unknown contact");
    let company = call.prospect.account_name().unwrap_or("unknown company");
    vec![
        Line::from(truncate_to_width(
            &format!("Call Script | {} @ {}", contact, company),
            width,
        )),
        gray(truncate_to_width(
            &format!(
                "step: {} ({}) | state: {}",
                ui.view.state.as_str(),
                ui.view.mood.as_str(),
                state_file
            ),
            width,
        )),
        gray(truncate_to_width(&format!("status: {}", ui.status), width)),
    ]
}

pub(crate) fn script_lines(ui: &TuiUiState, call: &ActiveCall, now: Instant) -> Vec<Line<'static>> {
    let mut lines = to_styled_lines(&ui.view.text);
    if ui.is_ringing(now) {
        lines.push(Line::from(Span::styled(
            "ringing...".to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if ui.notes_visible {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "notes:".to_string(),
            Style::default().fg(Color::Cyan),
        )));
        if call.notes.is_blank() {
            lines.push(gray("(empty)".to_string()));
        }
        for note in call.notes.text().lines() {
            lines.push(Line::from(note.to_string()));
        }
    }
    lines
}

pub(crate) fn footer_lines(ui: &TuiUiState, now: Instant, width: usize) -> Vec<Line<'static>> {
    let choices = ui.visible_choices(now);
    let choice_text_width = width.saturating_sub(2).max(8);

    let mut lines = vec![gray("─".repeat(width))];
    let interaction_header = match ui.input {
        Some(InputMode::Note) => "note (enter to add, esc to cancel):".to_string(),
        Some(InputMode::Search(kind)) => {
            format!("search {:?} (tab switches, enter builds link):", kind).to_lowercase()
        }
        Some(InputMode::Field(field)) => {
            format!("{} (tab switches field, enter applies):", field.as_str())
        }
        None if !choices.is_empty() => "choices (up/down + enter):".to_string(),
        None => String::new(),
    };
    lines.push(Line::from(Span::styled(
        truncate_to_width(&interaction_header, width),
        Style::default().fg(Color::Cyan),
    )));

    for row_index in 0..CHOICE_VIEWPORT_ROWS {
        if ui.input.is_some() {
            let text = if row_index == 0 {
                format!("> {}", truncate_to_width(&ui.input_buffer, choice_text_width))
            } else {
                " ".to_string()
            };
            lines.push(Line::from(text));
            continue;
        }
        let absolute_index = ui.choice_scroll_offset + row_index;
        let Some(choice) = choices.get(absolute_index) else {
            lines.push(Line::from(" "));
            continue;
        };
        let selected = absolute_index == ui.selected_choice_index;
        let prefix = if selected { "> " } else { "  " };
        let style = if selected {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{}{}",
                prefix,
                truncate_to_width(&plain_label(&choice.label), choice_text_width)
            ),
            style,
        )));
    }

    let window_text = if ui.input.is_none() && choices.len() > CHOICE_VIEWPORT_ROWS {
        format!(
            "window {}-{} / {}",
            ui.choice_scroll_offset + 1,
            (ui.choice_scroll_offset + CHOICE_VIEWPORT_ROWS).min(choices.len()),
            choices.len()
        )
    } else {
        " ".to_string()
    };
    lines.push(gray(truncate_to_width(&window_text, width)));
    lines.push(Line::from(Span::styled(
        truncate_to_width(KEY_TEXT, width),
        Style::default().fg(Color::Yellow),
    )));
    if ui.help_visible {
        lines.push(Line::from(Span::styled(
            truncate_to_width(HELP_TEXT, width),
            Style::default().fg(Color::Magenta),
        )));
    }
    lines
}

pub(crate) fn render_tui(
    frame: &mut Frame<'_>,
    ui: &TuiUiState,
    call: &ActiveCall,
    state_file: &str,
    now: Instant,
) {
    let area = frame.area();
    let content_width = (area.width as usize).saturating_sub(2).max(16);

    let header = header_lines(ui, call, state_file, content_width);
    let footer = footer_lines(ui, now, content_width);
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(header.len() as u16),
        Constraint::Min(1),
        Constraint::Length(footer.len() as u16),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(header), header_area);
    frame.render_widget(
        Paragraph::new(script_lines(ui, call, now)).wrap(Wrap { trim: false }),
        body_area,
    );
    frame.render_widget(Paragraph::new(footer), footer_area);
}
