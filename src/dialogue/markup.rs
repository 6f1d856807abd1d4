//! Lightweight inline emphasis markup
//!
//! Message bodies mark emphasis with single asterisks (`*like this*`) and
//! break lines with `\n`. Hosts render the parsed form however they like.

use std::sync::OnceLock;
use regex::Regex;
use crate::utils::helpers::escape_html;

fn emphasis_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*[^*]+\*").expect("emphasis pattern is valid"))
}

/// A run of text within a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Strong(String),
}

/// Parsed message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichText {
    lines: Vec<Vec<Segment>>,
}

impl RichText {
    pub fn parse(text: &str) -> Self {
        let lines = text.split('\n').map(parse_line).collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[Vec<Segment>] {
        &self.lines
    }

    /// Text with emphasis markers removed
    pub fn to_plain(&self) -> String {
        self.render(|segment| match segment {
            Segment::Plain(text) | Segment::Strong(text) => text.clone(),
        })
    }

    /// Telegram HTML: emphasis becomes `<b>`, everything else is escaped
    pub fn to_html(&self) -> String {
        self.render(|segment| match segment {
            Segment::Plain(text) => escape_html(text),
            Segment::Strong(text) => format!("<b>{}</b>", escape_html(text)),
        })
    }

    fn render(&self, segment_fn: impl Fn(&Segment) -> String) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(&segment_fn).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn parse_line(line: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for found in emphasis_pattern().find_iter(line) {
        if found.start() > cursor {
            segments.push(Segment::Plain(line[cursor..found.start()].to_string()));
        }
        let inner = &found.as_str()[1..found.as_str().len() - 1];
        segments.push(Segment::Strong(inner.to_string()));
        cursor = found.end();
    }

    if cursor < line.len() {
        segments.push(Segment::Plain(line[cursor..].to_string()));
    }

    segments
}
