use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpanClass {
    Pause,
    Emphasis,
    Metric,
    Other,
}

impl SpanClass {
    fn parse(raw: &str) -> Self {
        match raw {
            "pause" => Self::Pause,
            "emphasis" => Self::Emphasis,
            "metric" => Self::Metric,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    pub(crate) text: String,
    pub(crate) strong: bool,
    pub(crate) class: Option<SpanClass>,
}

fn push_text(lines: &mut [Vec<Segment>], raw: &str, strong: usize, classes: &[SpanClass]) {
    if raw.is_empty() {
        return;
    }
    if let Some(current) = lines.last_mut() {
        current.push(Segment {
            text: raw.to_string(),
            strong: strong > 0,
            class: classes.last().copied(),
        });
    }
}

fn markup_regex() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| {
        Regex::new(r#"<br\s*/?>|<strong>|</strong>|<span class=['"]([a-z]+)['"]>|</span>"#)
            .expect("markup regex must compile")
    })
}

/// Splits rendered state text into lines of styled segments.
///
/// `<br>` starts a new line. Anything that is not one of the known tags stays
/// in the text verbatim.
pub(crate) fn parse_markup(text: &str) -> Vec<Vec<Segment>> {
    let mut lines = vec![Vec::new()];
    let mut strong = 0usize;
    let mut classes: Vec<SpanClass> = Vec::new();
    let mut cursor = 0usize;

    for captures in markup_regex().captures_iter(text) {
        let tag = captures
            .get(0)
            .expect("capture group 0 must exist for each regex capture");
        push_text(&mut lines, &text[cursor..tag.start()], strong, &classes);
        cursor = tag.end();

        match tag.as_str() {
            "<strong>" => strong += 1,
            "</strong>" => strong = strong.saturating_sub(1),
            "</span>" => {
                classes.pop();
            }
            raw if raw.starts_with("<br") => lines.push(Vec::new()),
            _ => {
                let class = captures.get(1).map_or("", |class| class.as_str());
                classes.push(SpanClass::parse(class));
            }
        }
    }
    push_text(&mut lines, &text[cursor..], strong, &classes);
    lines
}

pub(crate) fn to_plain_lines(text: &str) -> Vec<String> {
    parse_markup(text)
        .into_iter()
        .map(|line| line.into_iter().map(|segment| segment.text).collect())
        .collect()
}

pub(crate) fn segment_style(segment: &Segment) -> Style {
    let mut style = match segment.class {
        Some(SpanClass::Pause) => Style::default().fg(Color::DarkGray),
        Some(SpanClass::Emphasis) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC),
        Some(SpanClass::Metric) => Style::default().fg(Color::Cyan),
        Some(SpanClass::Other) | None => Style::default(),
    };
    if segment.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

pub(crate) fn to_styled_lines(text: &str) -> Vec<Line<'static>> {
    parse_markup(text)
        .into_iter()
        .map(|line| {
            Line::from(
                line.into_iter()
                    .map(|segment| {
                        let style = segment_style(&segment);
                        Span::styled(segment.text, style)
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

#[cfg(test)]
mod markup_tests {
    use super::*;

    #[test]
    fn plain_lines_strip_tags_and_split_on_breaks() {
        assert_eq!(
            to_plain_lines("Hi, is this <strong>Pat</strong>?"),
            vec!["Hi, is this Pat?".to_string()]
        );
        assert_eq!(
            to_plain_lines("One<br>Two <span class='pause'>--</span> three<br/>"),
            vec!["One".to_string(), "Two -- three".to_string(), String::new()]
        );
    }

    #[test]
    fn segments_carry_strong_and_class() {
        let lines = parse_markup("a <strong>b <span class='metric'>12%</span></strong> c");
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.len(), 4);
        assert_eq!(line[0].text, "a ");
        assert!(!line[0].strong);
        assert_eq!(line[1].text, "b ");
        assert!(line[1].strong);
        assert_eq!(line[2].class, Some(SpanClass::Metric));
        assert!(line[2].strong);
        assert_eq!(line[3].text, " c");
        assert_eq!(line[3].class, None);
    }

    #[test]
    fn unknown_tags_and_brackets_stay_verbatim() {
        assert_eq!(
            to_plain_lines("<em>x</em> [] <span class=\"other\">y</span>"),
            vec!["<em>x</em> [] y".to_string()]
        );
        let lines = parse_markup("<span class='wiggle'>y</span>");
        assert_eq!(lines[0][0].class, Some(SpanClass::Other));
    }

    #[test]
    fn styled_lines_bold_strong_text() {
        let lines = to_styled_lines("<strong>Pat</strong><br><span class='emphasis'>now</span>");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].spans[0]
            .style
            .add_modifier
            .contains(Modifier::BOLD));
        assert_eq!(lines[1].spans[0].style.fg, Some(Color::Yellow));
    }
}
