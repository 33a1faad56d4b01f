//! Errors raised while building a rule set.

use thiserror::Error;

use profspec_core::SpecError;

/// Error building or selecting a rule set.
#[derive(Error, Debug)]
pub enum ProfileSpecError {
    /// Registering a rule failed.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// A rule's pattern did not compile.
    #[error("invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The requested rule set does not exist.
    #[error("unknown rule set '{0}' (expected one of: profile, birthday)")]
    UnknownRuleSet(String),
}
