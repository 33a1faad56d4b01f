//! # Validation Outcomes
//!
//! Every validation call produces an [`Outcome`]. A failure carries the
//! reason, a message, the rule path that led to it, and an optional
//! diagnostic payload.
//!
//! The serialized form is the flat JSON object consumers of the engine
//! render in reports:
//!
//! ```json
//! {"valid": false, "reason": "specfailure", "message": "...", "stack": ["struct.userprofile", "key.user"]}
//! ```

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Reason
// ---------------------------------------------------------------------------

/// Why a validation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    /// The value failed a rule predicate.
    SpecFailure,
    /// The caller asked for something the engine cannot run: an unknown
    /// rule id, a specifier of unsupported type, or a nesting deeper than
    /// the configured limit.
    SpecError,
    /// A rule body returned an error.
    Exception,
}

impl Reason {
    /// Wire name of the reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpecFailure => "specfailure",
            Self::SpecError => "specerror",
            Self::Exception => "exception",
        }
    }

    /// Message used when a failure is built with an empty one.
    fn default_message(&self) -> &'static str {
        match self {
            Self::SpecFailure => "value does not satisfy spec",
            Self::SpecError => "spec could not be evaluated",
            Self::Exception => "exception running spec rule",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Failure
// ---------------------------------------------------------------------------

/// Diagnostic payload attached to some failures.
///
/// Serializes as `{"specId": ...}` or `{"exception": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FailureData {
    /// The specifier that could not be resolved.
    #[serde(rename = "specId")]
    SpecId(Value),
    /// Display text of the error a rule body returned.
    #[serde(rename = "exception")]
    Exception(String),
}

/// Details of a failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// Failure category.
    pub reason: Reason,
    /// Human-readable description. Never empty.
    pub message: String,
    /// Rule path from the root call to the failure point.
    pub stack: Vec<String>,
    /// Optional diagnostic payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<FailureData>,
}

impl Failure {
    /// Build a failure. An empty message is replaced with the reason's
    /// default text.
    pub fn new(reason: Reason, message: impl Into<String>, stack: Vec<String>) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = reason.default_message().to_string();
        }
        Self {
            reason,
            message,
            stack,
            data: None,
        }
    }

    /// Attach a diagnostic payload.
    pub fn with_data(mut self, data: FailureData) -> Self {
        self.data = Some(data);
        self
    }

    /// The stack rendered as a single path, e.g. `struct.userprofile > key.user`.
    pub fn path(&self, separator: &str) -> String {
        self.stack.join(separator)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stack.is_empty() {
            write!(f, "{}: {}", self.reason, self.message)
        } else {
            write!(
                f,
                "{}: {} (at {})",
                self.reason,
                self.message,
                self.stack.join(" > ")
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of validating one value against one spec.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The value satisfies the spec.
    Valid,
    /// The value does not satisfy the spec, or the spec could not run.
    Invalid(Failure),
}

impl Outcome {
    /// The canonical success outcome.
    pub fn success() -> Self {
        Self::Valid
    }

    /// Build a failure outcome.
    pub fn failure(reason: Reason, message: impl Into<String>, stack: Vec<String>) -> Self {
        Self::Invalid(Failure::new(reason, message, stack))
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Failure details, if any.
    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Valid => None,
            Self::Invalid(failure) => Some(failure),
        }
    }

    pub fn into_failure(self) -> Option<Failure> {
        match self {
            Self::Valid => None,
            Self::Invalid(failure) => Some(failure),
        }
    }

    pub fn reason(&self) -> Option<Reason> {
        self.as_failure().map(|f| f.reason)
    }

    pub fn message(&self) -> Option<&str> {
        self.as_failure().map(|f| f.message.as_str())
    }

    /// Failure stack, empty for a valid outcome.
    pub fn stack(&self) -> &[String] {
        self.as_failure().map(|f| f.stack.as_slice()).unwrap_or(&[])
    }

    pub fn data(&self) -> Option<&FailureData> {
        self.as_failure().and_then(|f| f.data.as_ref())
    }
}

impl From<Failure> for Outcome {
    fn from(failure: Failure) -> Self {
        Self::Invalid(failure)
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("valid", &true)?;
                map.end()
            }
            Self::Invalid(failure) => {
                let len = if failure.data.is_some() { 5 } else { 4 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("valid", &false)?;
                map.serialize_entry("reason", &failure.reason)?;
                map.serialize_entry("message", &failure.message)?;
                map.serialize_entry("stack", &failure.stack)?;
                if let Some(data) = &failure.data {
                    map.serialize_entry("data", data)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_serializes_as_valid_only() {
        let value = serde_json::to_value(Outcome::success()).unwrap();
        assert_eq!(value, json!({"valid": true}));
    }

    #[test]
    fn failure_serializes_flat() {
        let outcome = Outcome::failure(
            Reason::SpecFailure,
            "not a string",
            vec!["key.user".into(), "key.username".into()],
        );
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({
                "valid": false,
                "reason": "specfailure",
                "message": "not a string",
                "stack": ["key.user", "key.username"],
            })
        );
    }

    #[test]
    fn failure_data_serializes_under_its_key() {
        let outcome: Outcome = Failure::new(Reason::SpecError, "Invalid spec id: nope", vec![])
            .with_data(FailureData::SpecId(json!("nope")))
            .into();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["reason"], "specerror");
        assert_eq!(value["data"], json!({"specId": "nope"}));
    }

    #[test]
    fn empty_message_is_replaced() {
        let failure = Failure::new(Reason::Exception, "", vec![]);
        assert!(!failure.message.is_empty());
    }

    #[test]
    fn accessors_on_valid_outcome() {
        let outcome = Outcome::Valid;
        assert!(outcome.is_valid());
        assert!(outcome.reason().is_none());
        assert!(outcome.message().is_none());
        assert!(outcome.stack().is_empty());
    }

    #[test]
    fn display_includes_path() {
        let failure = Failure::new(
            Reason::SpecFailure,
            "not a string",
            vec!["a".into(), "b".into()],
        );
        assert_eq!(failure.to_string(), "specfailure: not a string (at a > b)");
    }
}
