//! # Error Types
//!
//! Errors that escape the engine boundary. Validation problems never show
//! up here: a value that fails a rule, an unknown rule id, or a rule body
//! that errors out are all reported as an [`Outcome`](crate::Outcome).
//! What remains is misuse of the engine itself.
//!
//! ## Design
//!
//! - Registry setup errors (`AlreadyBound`) are returned from
//!   [`SpecEngine::add`](crate::SpecEngine::add) to the caller.
//! - Shape errors from the composition helpers (`NotAnArray`,
//!   `NotAnObject`) are returned to the calling rule body. A body that
//!   propagates them with `?` gets them reported as an `exception` outcome.

use thiserror::Error;

/// Error raised by engine setup or by a composition helper.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// A rule with this id is already registered.
    #[error("spec already bound: {id}")]
    AlreadyBound {
        /// The duplicated rule id.
        id: String,
    },

    /// `all` was handed something other than an array.
    #[error("expected value to be an array, found {found}")]
    NotAnArray {
        /// JSON type name of the offending value.
        found: &'static str,
    },

    /// `keys` was handed something other than an object.
    #[error("expected value to be an object, found {found}")]
    NotAnObject {
        /// JSON type name of the offending value.
        found: &'static str,
    },

    /// The engine configuration could not be parsed.
    #[error("invalid engine configuration: {0}")]
    Config(String),
}

/// Error returned by a rule body.
///
/// Boxed so that rule bodies can use `?` on any error type; the engine only
/// needs its `Display` output.
pub type RuleError = Box<dyn std::error::Error + Send + Sync>;
