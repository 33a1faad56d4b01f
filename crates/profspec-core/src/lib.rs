//! # profspec-core — Spec Engine
//!
//! A small validation engine for JSON values, modeled after clojure specs.
//! Rules are registered under string ids; a value is validated by naming
//! the root rule, and rules compose by validating parts of the value
//! against other rules.
//!
//! ```
//! use profspec_core::{Reason, Rule, SpecEngine};
//! use serde_json::json;
//!
//! let mut engine = SpecEngine::new();
//! engine
//!     .add(Rule::new("age", |scope, value| {
//!         let Some(age) = value.as_f64() else {
//!             return Ok(scope.failure("not a number"));
//!         };
//!         if age < 0.0 {
//!             return Ok(scope.failure("must be greater than 0"));
//!         }
//!         Ok(scope.success())
//!     }))
//!     .unwrap();
//!
//! assert!(engine.validate(&json!(25), "age").is_valid());
//! assert_eq!(engine.validate(&json!("old"), "age").reason(), Some(Reason::SpecFailure));
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Explicit registry.** Each [`SpecEngine`] owns its rules. There is no
//!    global rule table.
//!
//! 2. **Explicit scope.** Rule bodies receive a [`Scope`] carrying the helper
//!    API (`success`, `failure`, `validate`, `and`, `keys`, `all`).
//!
//! 3. **Outcomes, not panics.** Every validation yields an [`Outcome`].
//!    Errors returned by rule bodies are converted to `exception` outcomes
//!    at the dispatch boundary.
//!
//! 4. **Traced failures.** Every failure records the rule path from the
//!    root call to the point of failure.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod outcome;
pub mod registry;
pub mod scope;
pub mod specifier;

// Re-export primary types for ergonomic imports.
pub use config::{EngineConfig, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
pub use engine::SpecEngine;
pub use error::{RuleError, SpecError};
pub use frame::{Frame, ANONYMOUS_FRAME};
pub use outcome::{Failure, FailureData, Outcome, Reason};
pub use registry::{Registry, Rule, RuleBody, RuleResult};
pub use scope::{Scope, KEY_RULE_PREFIX};
pub use specifier::{json_type_name, Clause, InlineRule, Specifier};
