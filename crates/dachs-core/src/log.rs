//! Component-scoped logging.
//!
//! Which components may log is decided by a [`LogTags`] bitset carried in a
//! [`Logger`] value. Lexer, parser and resolver receive a logger from their
//! caller; events go through `tracing` with the target `dachs`.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of compiler components whose logs are enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LogTags(u32);

impl LogTags {
    pub const NONE: LogTags = LogTags(0);
    /// Lexer and parser.
    pub const PARSING: LogTags = LogTags(1 << 0);
    /// Semantic checks.
    pub const SEMA: LogTags = LogTags(1 << 1);
    pub const ALL: LogTags = LogTags(!0);

    pub const fn contains(self, other: LogTags) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parse one component name as accepted on the command line.
    pub fn from_component(name: &str) -> Option<LogTags> {
        match name {
            "All" => Some(LogTags::ALL),
            "Parsing" => Some(LogTags::PARSING),
            "Sema" => Some(LogTags::SEMA),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        if self == LogTags::PARSING {
            "Parsing"
        } else if self == LogTags::SEMA {
            "Sema"
        } else if self == LogTags::ALL {
            "All"
        } else {
            "None"
        }
    }
}

impl BitOr for LogTags {
    type Output = LogTags;

    fn bitor(self, rhs: LogTags) -> LogTags {
        LogTags(self.0 | rhs.0)
    }
}

impl BitOrAssign for LogTags {
    fn bitor_assign(&mut self, rhs: LogTags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for LogTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logger handed to each component.
///
/// `enabled` is the set the user asked for; `tag` is the component that is
/// currently logging. A message is emitted only when both intersect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Logger {
    enabled: LogTags,
    tag: LogTags,
}

impl Logger {
    pub fn new(enabled: LogTags) -> Self {
        Self {
            enabled,
            tag: LogTags::NONE,
        }
    }

    /// Logger that never emits.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// The same enabled set, logging on behalf of `tag`.
    pub fn for_tag(self, tag: LogTags) -> Self {
        Self { tag, ..self }
    }

    pub fn enabled_tags(&self) -> LogTags {
        self.enabled
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.contains(self.tag)
    }

    pub fn log(&self, args: fmt::Arguments<'_>) {
        if self.is_enabled() {
            tracing::debug!(target: "dachs", tag = %self.tag, "{}", args);
        }
    }
}

/// `log!(logger, "format", args...)`
#[macro_export]
macro_rules! log {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log(format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_combine() {
        let tags = LogTags::PARSING | LogTags::SEMA;
        assert!(tags.contains(LogTags::PARSING));
        assert!(tags.contains(LogTags::SEMA));
        assert!(!LogTags::PARSING.contains(LogTags::SEMA));
        assert!(LogTags::ALL.contains(LogTags::SEMA));
        assert!(LogTags::NONE.is_empty());
    }

    #[test]
    fn components_from_names() {
        assert_eq!(LogTags::from_component("Parsing"), Some(LogTags::PARSING));
        assert_eq!(LogTags::from_component("Sema"), Some(LogTags::SEMA));
        assert_eq!(LogTags::from_component("All"), Some(LogTags::ALL));
        assert_eq!(LogTags::from_component("parsing"), None);
    }

    #[test]
    fn logger_enabled_only_for_matching_tag() {
        let logger = Logger::new(LogTags::PARSING);
        assert!(!logger.is_enabled());
        assert!(logger.for_tag(LogTags::PARSING).is_enabled());
        assert!(!logger.for_tag(LogTags::SEMA).is_enabled());
        assert!(!Logger::disabled().for_tag(LogTags::PARSING).is_enabled());
    }
}
