//! # Birthday Rules
//!
//! A compact demonstration rule set: a `struct.birthday` document is an
//! object whose every member is checked against `key.<name>`, combined with
//! a data-driven `logic.and` rule.
//!
//! ```json
//! {"city": "Oakland", "date": "2017-12-26T00:00:00Z"}
//! ```

use chrono::DateTime;
use serde_json::{json, Value};

use profspec_core::{Clause, EngineConfig, Rule, SpecEngine};

use crate::error::ProfileSpecError;

/// Root rule for a birthday document.
pub const BIRTHDAY_SPEC: &str = "struct.birthday";

/// Oldest accepted age.
pub const MAX_AGE: f64 = 200.0;

/// Build an engine loaded with the birthday rule set.
pub fn birthday_engine(config: EngineConfig) -> Result<SpecEngine, ProfileSpecError> {
    let mut engine = SpecEngine::with_config(config)?;
    register_birthday_rules(&mut engine)?;
    tracing::debug!(rules = engine.len(), "built birthday rule set");
    Ok(engine)
}

/// Register the birthday rule set on an existing engine.
pub fn register_birthday_rules(engine: &mut SpecEngine) -> Result<(), ProfileSpecError> {
    engine.add(Rule::new("age", |scope, value| {
        let Some(age) = value.as_f64() else {
            return Ok(scope.failure("not a number"));
        };
        if age < 0.0 {
            return Ok(scope.failure("must be greater than 0"));
        }
        if age > MAX_AGE {
            return Ok(scope.failure(
                "it is highly unlikely that an individual will live to 200 years",
            ));
        }
        Ok(scope.success())
    }))?;

    engine.add(Rule::new("core.timestamp", |scope, value| {
        let Some(text) = value.as_str() else {
            return Ok(scope.failure("not a string"));
        };
        if DateTime::parse_from_rfc3339(text).is_err() {
            return Ok(scope.failure("not a valid date format"));
        }
        Ok(scope.success())
    }))?;

    engine.add(Rule::new("core.city", |scope, value| {
        let Some(city) = value.as_str() else {
            return Ok(scope.failure("not a string"));
        };
        if city.is_empty() {
            return Ok(scope.failure("there is no empty-named city"));
        }
        Ok(scope.success())
    }))?;

    engine.add(Rule::new("key.city", |scope, value| {
        Ok(scope.validate(value, "core.city"))
    }))?;

    engine.add(Rule::new("key.date", |scope, value| {
        Ok(scope.validate(value, "core.timestamp"))
    }))?;

    // Unlike `Scope::and`, rewraps the first failure with the item index.
    engine.add(Rule::new("logic.and", |scope, value| {
        let Some(items) = value.as_array() else {
            return Ok(scope.failure("not an array"));
        };
        for (i, item) in items.iter().enumerate() {
            let clause = Clause::from_json(item);
            let outcome = scope.validate(clause.value, clause.spec);
            if let Some(message) = outcome.message() {
                return Ok(scope.failure(format!("array element invalid : {i} : {message}")));
            }
        }
        Ok(scope.success())
    }))?;

    engine.add(Rule::new(BIRTHDAY_SPEC, |scope, value| {
        let Some(object) = value.as_object() else {
            return Ok(scope.failure("not a non-null object"));
        };
        let items: Vec<Value> = object
            .iter()
            .map(|(key, member)| json!({"spec": format!("key.{key}"), "value": member}))
            .collect();
        Ok(scope.validate(&Value::Array(items), "logic.and"))
    }))?;

    Ok(())
}
