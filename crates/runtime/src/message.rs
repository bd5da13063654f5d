//! Colored chat text sent to players and the console.

use std::fmt;

/// Named chat colors understood by every client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextColor {
    Gold,
    Yellow,
    Gray,
    Green,
    Aqua,
    Red,
    White,
}

/// A run of text in one color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub color: TextColor,
    pub bold: bool,
}

impl Span {
    pub fn new(text: impl Into<String>, color: TextColor) -> Self {
        Self {
            text: text.into(),
            color,
            bold: false,
        }
    }
}

/// One chat line made of colored spans.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    spans: Vec<Span>,
}

impl Message {
    pub fn text(text: impl Into<String>, color: TextColor) -> Self {
        Self {
            spans: vec![Span::new(text, color)],
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::text(text, TextColor::Green)
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self::text(text, TextColor::Yellow)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::text(text, TextColor::Red)
    }

    /// `Distance: 123 blocks` with the number highlighted.
    pub fn distance(distance: f64) -> Self {
        Self::success("Distance: ").then(format_blocks(distance), TextColor::Yellow)
    }

    pub fn then(mut self, text: impl Into<String>, color: TextColor) -> Self {
        self.spans.push(Span::new(text, color));
        self
    }

    pub fn bold(mut self) -> Self {
        for span in &mut self.spans {
            span.bold = true;
        }
        self
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// The message with colors stripped.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

/// Distance rounded to the nearest whole block, e.g. `"50 blocks"`.
pub fn format_blocks(distance: f64) -> String {
    format!("{} blocks", distance.round() as i64)
}
