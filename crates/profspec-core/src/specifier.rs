//! # Specifiers
//!
//! A [`Specifier`] names the rule a value is validated against: a registered
//! rule by id, or an inline rule passed as a closure. Specifiers can also be
//! read out of JSON data, in which case anything other than a string is kept
//! as [`Specifier::Unsupported`] and rejected by dispatch with a `specerror`.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::registry::RuleResult;
use crate::scope::Scope;

/// Body of an inline rule.
pub type InlineRule<'f> = dyn Fn(&mut Scope<'_>, &Value) -> RuleResult + 'f;

/// What to validate a value against.
#[derive(Clone)]
pub enum Specifier<'s> {
    /// A registered rule id.
    Id(Cow<'s, str>),
    /// An inline rule, recorded on the stack as `anonymous function`.
    Inline(&'s InlineRule<'s>),
    /// A specifier read from data that is neither a string nor a rule.
    Unsupported(&'s Value),
}

impl<'s> Specifier<'s> {
    /// Wrap a closure or function as an inline specifier.
    pub fn inline<F>(rule: &'s F) -> Self
    where
        F: Fn(&mut Scope<'_>, &Value) -> RuleResult + 's,
    {
        Self::Inline(rule)
    }

    /// Read a specifier out of JSON data.
    pub fn from_json(value: &'s Value) -> Self {
        match value {
            Value::String(id) => Self::Id(Cow::Borrowed(id.as_str())),
            other => Self::Unsupported(other),
        }
    }
}

impl fmt::Debug for Specifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => f.debug_tuple("Id").field(id).finish(),
            Self::Inline(_) => f.write_str("Inline(..)"),
            Self::Unsupported(value) => f.debug_tuple("Unsupported").field(value).finish(),
        }
    }
}

impl<'s> From<&'s str> for Specifier<'s> {
    fn from(id: &'s str) -> Self {
        Self::Id(Cow::Borrowed(id))
    }
}

impl From<String> for Specifier<'static> {
    fn from(id: String) -> Self {
        Self::Id(Cow::Owned(id))
    }
}

impl<'s> From<&'s String> for Specifier<'s> {
    fn from(id: &'s String) -> Self {
        Self::Id(Cow::Borrowed(id.as_str()))
    }
}

impl<'s> From<&'s Value> for Specifier<'s> {
    fn from(value: &'s Value) -> Self {
        Self::from_json(value)
    }
}

/// One item of an `and` composition.
#[derive(Debug, Clone)]
pub struct Clause<'c> {
    pub value: &'c Value,
    pub spec: Specifier<'c>,
}

static NULL: Value = Value::Null;

impl<'c> Clause<'c> {
    pub fn new(value: &'c Value, spec: impl Into<Specifier<'c>>) -> Self {
        Self {
            value,
            spec: spec.into(),
        }
    }

    /// Read a clause from a `{"value": ..., "spec": ...}` object.
    ///
    /// A missing `value` reads as `null`. A missing `spec` reads as an
    /// unsupported specifier, as does anything that is not an object.
    pub fn from_json(item: &'c Value) -> Self {
        Self {
            value: item.get("value").unwrap_or(&NULL),
            spec: item
                .get("spec")
                .map_or(Specifier::Unsupported(&NULL), Specifier::from_json),
        }
    }
}

/// JSON type name of a value, as used in engine messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_string_becomes_id() {
        let value = json!("core.username");
        match Specifier::from_json(&value) {
            Specifier::Id(id) => assert_eq!(id, "core.username"),
            other => panic!("expected id, got {other:?}"),
        }
    }

    #[test]
    fn json_non_string_is_unsupported() {
        let value = json!(42);
        assert!(matches!(
            Specifier::from_json(&value),
            Specifier::Unsupported(v) if v == &json!(42)
        ));
    }

    #[test]
    fn clause_from_json_object() {
        let item = json!({"spec": "age", "value": 25});
        let clause = Clause::from_json(&item);
        assert_eq!(clause.value, &json!(25));
        assert!(matches!(clause.spec, Specifier::Id(ref id) if id == "age"));
    }

    #[test]
    fn clause_from_json_defaults() {
        let item = json!({"spec": "age"});
        assert!(Clause::from_json(&item).value.is_null());

        let item = json!({"value": 1});
        assert!(matches!(
            Clause::from_json(&item).spec,
            Specifier::Unsupported(v) if v.is_null()
        ));

        let item = json!("age");
        let clause = Clause::from_json(&item);
        assert!(clause.value.is_null());
        assert!(matches!(clause.spec, Specifier::Unsupported(_)));
    }

    #[test]
    fn type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!(1.5)), "number");
        assert_eq!(json_type_name(&json!("x")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
