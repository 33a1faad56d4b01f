//! # Spec Engine
//!
//! Owns a rule [`Registry`] and the call stack of the validation in
//! progress. Rules are registered once with [`SpecEngine::add`]; values are
//! checked with [`SpecEngine::validate`], which starts from an empty stack
//! every time.
//!
//! `validate` takes `&mut self`: one engine runs one validation at a time,
//! and nested validations go through the [`Scope`] handed to rule bodies.

use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::SpecError;
use crate::frame::Frame;
use crate::outcome::{Outcome, Reason};
use crate::registry::{Registry, Rule};
use crate::scope::Scope;
use crate::specifier::Specifier;

/// A registry of named rules plus the state of the running validation.
#[derive(Debug, Default)]
pub struct SpecEngine {
    rules: Registry,
    stack: Vec<Frame>,
    config: EngineConfig,
}

impl SpecEngine {
    /// Create an engine with no rules and the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with no rules and the given configuration.
    ///
    /// Fails with [`SpecError::Config`] when `max_depth` is zero or above
    /// [`MAX_DEPTH_LIMIT`](crate::MAX_DEPTH_LIMIT).
    pub fn with_config(config: EngineConfig) -> Result<Self, SpecError> {
        config.validate()?;
        Ok(Self {
            rules: Registry::new(),
            stack: Vec::new(),
            config,
        })
    }

    /// Register a rule. A rule id can only be bound once.
    pub fn add(&mut self, rule: Rule) -> Result<(), SpecError> {
        let id = rule.id().to_string();
        self.rules.insert(rule)?;
        tracing::debug!(spec = %id, "registered spec rule");
        Ok(())
    }

    /// Validate `value` against a rule id or an inline rule.
    ///
    /// The call stack is cleared first, and is empty again when this
    /// returns.
    pub fn validate<'s>(&mut self, value: &Value, spec: impl Into<Specifier<'s>>) -> Outcome {
        self.stack.clear();
        let outcome = Scope::new(&self.rules, &mut self.stack, &self.config).validate(value, spec);
        debug_assert!(self.stack.is_empty());
        outcome
    }

    /// Clear the call stack. The registry is left alone.
    pub fn reset(&mut self) {
        self.stack.clear();
    }

    /// The canonical success outcome.
    pub fn success(&self) -> Outcome {
        Outcome::success()
    }

    /// A `specfailure` outcome at the current stack position.
    pub fn failure(&self, message: impl Into<String>) -> Outcome {
        Outcome::failure(Reason::SpecFailure, message, self.trace())
    }

    /// Current call stack, rendered.
    pub fn trace(&self) -> Vec<String> {
        self.stack.iter().map(ToString::to_string).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains(id)
    }

    /// Registered rule ids in sorted order.
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.ids().collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureData;
    use serde_json::json;

    #[test]
    fn duplicate_add_fails_and_keeps_first_rule() {
        let mut engine = SpecEngine::new();
        engine
            .add(Rule::new("age", |scope, _| Ok(scope.success())))
            .unwrap();
        let err = engine
            .add(Rule::new("age", |scope, _| Ok(scope.failure("second"))))
            .unwrap_err();
        assert_eq!(err.to_string(), "spec already bound: age");
        assert!(engine.validate(&json!(1), "age").is_valid());
    }

    #[test]
    fn unknown_id_is_a_spec_error() {
        let mut engine = SpecEngine::new();
        let outcome = engine.validate(&json!(1), "unknown-id");
        let failure = outcome.as_failure().unwrap();
        assert_eq!(failure.reason, Reason::SpecError);
        assert_eq!(failure.message, "Invalid spec id: unknown-id");
        assert!(failure.stack.is_empty());
        assert_eq!(failure.data, Some(FailureData::SpecId(json!("unknown-id"))));
    }

    #[test]
    fn unsupported_specifier_is_a_spec_error() {
        let mut engine = SpecEngine::new();
        let spec = json!({"id": "age"});
        let outcome = engine.validate(&json!(1), &spec);
        assert_eq!(outcome.reason(), Some(Reason::SpecError));
        assert_eq!(outcome.message(), Some("Invalid type for spec id: object"));
        assert_eq!(outcome.data(), Some(&FailureData::SpecId(spec.clone())));
    }

    #[test]
    fn rule_error_becomes_exception() {
        let mut engine = SpecEngine::new();
        engine
            .add(Rule::new("bad-rule", |_, _| Err("boom".into())))
            .unwrap();
        let outcome = engine.validate(&json!("x"), "bad-rule");
        let failure = outcome.as_failure().unwrap();
        assert_eq!(failure.reason, Reason::Exception);
        assert_eq!(failure.message, "exception running spec rule: boom");
        assert_eq!(failure.stack, vec!["bad-rule".to_string()]);
        assert_eq!(failure.data, Some(FailureData::Exception("boom".into())));
        assert!(engine.trace().is_empty());
    }

    #[test]
    fn unknown_nested_id_does_not_unwind_the_parent() {
        let mut engine = SpecEngine::new();
        engine
            .add(Rule::new("outer", |scope, value| {
                let missing = scope.validate(value, "missing");
                assert_eq!(scope.trace(), vec!["outer".to_string()]);
                Ok(missing)
            }))
            .unwrap();
        let outcome = engine.validate(&json!(null), "outer");
        assert_eq!(outcome.stack(), ["outer"]);
        assert_eq!(outcome.message(), Some("Invalid spec id: missing"));
    }

    #[test]
    fn self_recursive_rule_hits_depth_limit() {
        let mut engine = SpecEngine::with_config(EngineConfig { max_depth: 5 }).unwrap();
        engine
            .add(Rule::new("loop", |scope, value| Ok(scope.validate(value, "loop"))))
            .unwrap();
        let outcome = engine.validate(&json!(0), "loop");
        assert_eq!(outcome.reason(), Some(Reason::SpecError));
        assert_eq!(outcome.message(), Some("maximum spec depth exceeded: 5"));
        assert_eq!(outcome.stack().len(), 5);
        assert!(engine.trace().is_empty());
    }

    #[test]
    fn with_config_rejects_depth_above_limit() {
        let err = SpecEngine::with_config(EngineConfig {
            max_depth: crate::MAX_DEPTH_LIMIT + 1,
        })
        .unwrap_err();
        assert!(matches!(err, SpecError::Config(_)));
        assert!(SpecEngine::with_config(EngineConfig { max_depth: 0 }).is_err());
    }

    #[test]
    fn self_recursion_at_depth_limit_reports_instead_of_overflowing() {
        let mut engine = SpecEngine::with_config(EngineConfig {
            max_depth: crate::MAX_DEPTH_LIMIT,
        })
        .unwrap();
        engine
            .add(Rule::new("loop", |scope, value| Ok(scope.validate(value, "loop"))))
            .unwrap();
        let outcome = engine.validate(&json!(0), "loop");
        assert_eq!(
            outcome.message(),
            Some("maximum spec depth exceeded: 512")
        );
        assert_eq!(outcome.stack().len(), crate::MAX_DEPTH_LIMIT);
    }

    #[test]
    fn inline_specifier_at_top_level() {
        fn even(scope: &mut Scope<'_>, value: &Value) -> crate::RuleResult {
            match value.as_i64() {
                Some(n) if n % 2 == 0 => Ok(scope.success()),
                _ => Ok(scope.failure("not an even number")),
            }
        }

        let mut engine = SpecEngine::new();
        assert!(engine.validate(&json!(4), Specifier::inline(&even)).is_valid());
        let outcome = engine.validate(&json!(3), Specifier::inline(&even));
        assert_eq!(outcome.stack(), ["anonymous function"]);
    }

    #[test]
    fn engine_failure_uses_empty_stack_after_reset() {
        let mut engine = SpecEngine::new();
        engine.reset();
        let outcome = engine.failure("m");
        assert_eq!(outcome.message(), Some("m"));
        assert_eq!(outcome.reason(), Some(Reason::SpecFailure));
        assert!(outcome.stack().is_empty());
    }

    #[test]
    fn rule_ids_are_listed_sorted() {
        let mut engine = SpecEngine::new();
        for id in ["b", "a", "c"] {
            engine
                .add(Rule::new(id, |scope, _| Ok(scope.success())))
                .unwrap();
        }
        assert_eq!(engine.rule_ids(), vec!["a", "b", "c"]);
        assert_eq!(engine.len(), 3);
        assert!(engine.contains("b"));
    }
}
