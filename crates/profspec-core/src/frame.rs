//! Call-stack frames recorded while a validation runs.

use std::fmt;

/// Token rendered for rules passed inline instead of by id.
pub const ANONYMOUS_FRAME: &str = "anonymous function";

/// One entry of the validation call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A registered rule, by id.
    Rule(String),
    /// An inline rule.
    Anonymous,
    /// An element of an array being checked by `all`.
    Index(usize),
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule(id) => f.write_str(id),
            Self::Anonymous => f.write_str(ANONYMOUS_FRAME),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}
