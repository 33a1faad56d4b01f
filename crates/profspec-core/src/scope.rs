//! # Evaluation Scope
//!
//! The helper API handed to every rule body. A [`Scope`] borrows the
//! engine's registry, call stack, and configuration for the duration of one
//! top-level validation, and is passed explicitly as the first argument of
//! each rule body.
//!
//! ## Dispatch
//!
//! [`Scope::validate`] resolves a specifier and runs the rule:
//!
//! 1. Unknown id or unsupported specifier: `specerror`, nothing pushed.
//! 2. Depth limit reached: `specerror`, nothing pushed.
//! 3. Otherwise push the rule's frame, run the body, and pop the frame
//!    again whatever the body returned. An `Err` from the body becomes an
//!    `exception` outcome whose stack still includes the failing rule.
//!
//! ## Composition
//!
//! - [`Scope::and`] runs clauses in order and returns the first failure
//!   unchanged.
//! - [`Scope::keys`] checks required keys, then validates each present key
//!   against the `key.<name>` rule.
//! - [`Scope::all`] runs a per-item check over an array with the element
//!   index on the stack.

use std::borrow::Cow;

use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::SpecError;
use crate::frame::Frame;
use crate::outcome::{Failure, FailureData, Outcome, Reason};
use crate::registry::{Registry, RuleResult};
use crate::specifier::{json_type_name, Clause, Specifier};

/// Prefix of the rule ids `keys` validates object members against.
pub const KEY_RULE_PREFIX: &str = "key.";

/// Evaluation context for one validation run.
pub struct Scope<'e> {
    rules: &'e Registry,
    stack: &'e mut Vec<Frame>,
    config: &'e EngineConfig,
}

impl<'e> Scope<'e> {
    pub(crate) fn new(
        rules: &'e Registry,
        stack: &'e mut Vec<Frame>,
        config: &'e EngineConfig,
    ) -> Self {
        Self {
            rules,
            stack,
            config,
        }
    }

    /// The canonical success outcome.
    pub fn success(&self) -> Outcome {
        Outcome::success()
    }

    /// A `specfailure` outcome at the current stack position.
    pub fn failure(&self, message: impl Into<String>) -> Outcome {
        Outcome::failure(Reason::SpecFailure, message, self.trace())
    }

    /// Snapshot of the current call stack.
    pub fn trace(&self) -> Vec<String> {
        self.stack.iter().map(ToString::to_string).collect()
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Validate a nested value. Unlike the engine entry point this keeps the
    /// current stack, so failures report the full path.
    pub fn validate<'s>(&mut self, value: &Value, spec: impl Into<Specifier<'s>>) -> Outcome {
        self.dispatch(value, spec.into())
    }

    fn dispatch(&mut self, value: &Value, spec: Specifier<'_>) -> Outcome {
        let rules = self.rules;
        match spec {
            Specifier::Id(id) => match rules.get(&id) {
                Some(rule) => self.run(Frame::Rule(id.into_owned()), |scope| {
                    (rule.body())(scope, value)
                }),
                None => {
                    tracing::debug!(spec = %id, "unknown spec id");
                    Failure::new(
                        Reason::SpecError,
                        format!("Invalid spec id: {id}"),
                        self.trace(),
                    )
                    .with_data(FailureData::SpecId(Value::String(id.into_owned())))
                    .into()
                }
            },
            Specifier::Inline(rule) => self.run(Frame::Anonymous, |scope| rule(scope, value)),
            Specifier::Unsupported(spec) => Failure::new(
                Reason::SpecError,
                format!("Invalid type for spec id: {}", json_type_name(spec)),
                self.trace(),
            )
            .with_data(FailureData::SpecId(spec.clone()))
            .into(),
        }
    }

    /// Push `frame`, run `body`, pop `frame`.
    fn run<F>(&mut self, frame: Frame, body: F) -> Outcome
    where
        F: FnOnce(&mut Scope<'e>) -> RuleResult,
    {
        if self.stack.len() >= self.config.max_depth {
            tracing::warn!(
                spec = %frame,
                max_depth = self.config.max_depth,
                "spec nesting limit reached"
            );
            return Outcome::failure(
                Reason::SpecError,
                format!("maximum spec depth exceeded: {}", self.config.max_depth),
                self.trace(),
            );
        }

        tracing::trace!(spec = %frame, depth = self.stack.len(), "entering spec rule");
        self.stack.push(frame);

        let outcome = match body(self) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(stack = ?self.trace(), error = %e, "spec rule raised an error");
                Failure::new(
                    Reason::Exception,
                    format!("exception running spec rule: {e}"),
                    self.trace(),
                )
                .with_data(FailureData::Exception(e.to_string()))
                .into()
            }
        };

        self.stack.pop();

        if let Some(failure) = outcome.as_failure() {
            tracing::debug!(
                reason = %failure.reason,
                message = %failure.message,
                "spec rule failed"
            );
        }
        outcome
    }

    /// Validate every clause in order. Returns the first failing outcome
    /// exactly as produced, or success if all pass (including none).
    pub fn and<'c, I>(&mut self, clauses: I) -> Outcome
    where
        I: IntoIterator<Item = Clause<'c>>,
    {
        for clause in clauses {
            let outcome = self.dispatch(clause.value, clause.spec);
            if !outcome.is_valid() {
                return outcome;
            }
        }
        self.success()
    }

    /// Data-driven `and`: `items` is a JSON array of `{"value": ..., "spec": ...}`
    /// objects.
    pub fn and_value(&mut self, items: &Value) -> Outcome {
        let Some(items) = items.as_array() else {
            return self.failure("not an array");
        };
        self.and(items.iter().map(Clause::from_json))
    }

    /// Check that `value` is an object carrying every required key, then
    /// validate each required key, and each optional key that is present,
    /// against the rule `key.<name>`.
    ///
    /// A missing required key fails before any member is validated. The
    /// first missing key in `required` order is reported. An array has no
    /// named keys, so it fails on its first required key like an empty
    /// object; any other non-object is a [`SpecError::NotAnObject`].
    pub fn keys(
        &mut self,
        value: &Value,
        required: &[&str],
        optional: &[&str],
    ) -> Result<Outcome, SpecError> {
        let object = match value {
            Value::Object(object) => Some(object),
            Value::Array(_) => None,
            other => {
                return Err(SpecError::NotAnObject {
                    found: json_type_name(other),
                })
            }
        };
        let member = |key: &str| object.and_then(|object| object.get(key));

        if let Some(missing) = required.iter().find(|key| member(**key).is_none()) {
            return Ok(self.failure(format!("required field not on object: {missing}")));
        }

        let clauses = required
            .iter()
            .chain(optional.iter())
            .filter_map(|key| member(*key).map(|member| (*key, member)))
            .map(|(key, member)| Clause {
                value: member,
                spec: Specifier::Id(Cow::Owned(format!("{KEY_RULE_PREFIX}{key}"))),
            });

        Ok(self.and(clauses))
    }

    /// Run `each` over the elements of an array, with the element index on
    /// the stack. Stops at the first failure. An empty array is valid.
    ///
    /// An `Err` from `each` is reported as an `exception` outcome naming the
    /// element index.
    pub fn all<F>(&mut self, value: &Value, mut each: F) -> Result<Outcome, SpecError>
    where
        F: FnMut(&mut Scope<'e>, &Value) -> RuleResult,
    {
        let items = value.as_array().ok_or(SpecError::NotAnArray {
            found: json_type_name(value),
        })?;

        for (index, item) in items.iter().enumerate() {
            self.stack.push(Frame::Index(index));
            let outcome = match each(self, item) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(index, error = %e, "array item check raised an error");
                    Failure::new(
                        Reason::Exception,
                        format!("exception evaluating array in all: {index} : {e}"),
                        self.trace(),
                    )
                    .with_data(FailureData::Exception(e.to_string()))
                    .into()
                }
            };
            self.stack.pop();

            if !outcome.is_valid() {
                return Ok(outcome);
            }
        }

        Ok(self.success())
    }
}
