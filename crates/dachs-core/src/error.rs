//! Compilation errors with positional information and stacked notes.

use std::fmt;

use crate::position::Position;

/// A compilation error.
///
/// The first message is the primary one. Following messages are notes
/// stacked while the error propagates to callers, so that a user can see
/// which enclosing construct the failure came from.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Error)]
pub struct Error {
    pub start: Position,
    /// When set, the snippet between `start` and `end` is rendered.
    pub end: Option<Position>,
    pub messages: Vec<String>,
}

impl Error {
    /// Error with range.
    pub fn new(start: Position, end: Position, msg: impl Into<String>) -> Self {
        Self {
            start,
            end: Some(end),
            messages: vec![msg.into()],
        }
    }

    /// Error at a single point.
    pub fn at(pos: Position, msg: impl Into<String>) -> Self {
        Self {
            start: pos,
            end: None,
            messages: vec![msg.into()],
        }
    }

    /// Wrap a foreign error with range.
    pub fn with_range(start: Position, end: Position, err: impl fmt::Display) -> Self {
        Self::new(start, end, err.to_string())
    }

    /// Wrap a foreign error with position.
    pub fn with_pos(pos: Position, err: impl fmt::Display) -> Self {
        Self::at(pos, err.to_string())
    }

    /// Primary message.
    pub fn message(&self) -> &str {
        &self.messages[0]
    }

    /// Notes stacked upon the primary message.
    pub fn notes(&self) -> &[String] {
        &self.messages[1..]
    }

    /// Stack an additional message.
    pub fn note(mut self, msg: impl Into<String>) -> Self {
        self.messages.push(msg.into());
        self
    }

    /// Stack an additional message with the position it refers to.
    pub fn note_at(self, pos: &Position, msg: impl fmt::Display) -> Self {
        self.note(format!("{} (at {})", msg, pos))
    }
}

/// Stack a message on any error. A foreign error becomes an [`Error`] whose
/// primary message is the original one.
pub fn note_on(
    start: Position,
    end: Option<Position>,
    err: impl Into<Box<dyn std::error::Error>>,
    msg: impl fmt::Display,
) -> Error {
    let err = err.into();
    match err.downcast::<Error>() {
        Ok(err) => (*err).note_at(&start, msg),
        Err(err) => Error {
            start,
            end,
            messages: vec![err.to_string(), msg.to_string()],
        },
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Error: {msg} (at {pos})
        //   Note: {note1}
        //   Note: {note2}
        write!(f, "Error: {} (at {})", self.message(), self.start)?;
        for note in self.notes() {
            write!(f, "\n  Note: {}", note)?;
        }

        let Some(end) = &self.end else {
            return Ok(());
        };
        let snip = self.start.text_to(end);
        if snip.is_empty() {
            return Ok(());
        }
        write!(f, "\n\n> {}\n\n", snip.replace('\n', "\n> "))
    }
}

/// English ordinal for a positive number: `1st`, `2nd`, `3rd`, `4th`, ...
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
