//! # Rule Registry
//!
//! Named rules owned by one engine. Ids are unique; a registered rule is
//! never replaced or removed. Iteration is sorted by id so rule listings
//! are deterministic.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::{RuleError, SpecError};
use crate::outcome::Outcome;
use crate::scope::Scope;

/// What a rule body returns: an outcome, or an error the engine reports as
/// an `exception` outcome.
pub type RuleResult = Result<Outcome, RuleError>;

/// Boxed body of a registered rule.
pub type RuleBody = Box<dyn Fn(&mut Scope<'_>, &Value) -> RuleResult + Send + Sync>;

/// A named validation rule.
pub struct Rule {
    id: String,
    body: RuleBody,
}

impl Rule {
    /// Create a rule from an id and a body.
    ///
    /// The body receives the evaluation [`Scope`] (the helper API) and the
    /// value under test.
    pub fn new<F>(id: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Scope<'_>, &Value) -> RuleResult + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            body: Box::new(body),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn body(&self) -> &RuleBody {
        &self.body
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Mapping from rule id to rule.
#[derive(Debug, Default)]
pub struct Registry {
    rules: BTreeMap<String, Rule>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule. Fails if the id is already bound.
    pub fn insert(&mut self, rule: Rule) -> Result<(), SpecError> {
        if self.rules.contains_key(rule.id()) {
            return Err(SpecError::AlreadyBound {
                id: rule.id().to_string(),
            });
        }
        self.rules.insert(rule.id().to_string(), rule);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing(id: &str) -> Rule {
        Rule::new(id, |scope, _value| Ok(scope.success()))
    }

    #[test]
    fn insert_and_lookup() {
        let mut registry = Registry::new();
        registry.insert(passing("core.username")).unwrap();
        assert!(registry.contains("core.username"));
        assert_eq!(registry.get("core.username").unwrap().id(), "core.username");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut registry = Registry::new();
        registry.insert(passing("age")).unwrap();
        let err = registry.insert(passing("age")).unwrap_err();
        assert_eq!(err, SpecError::AlreadyBound { id: "age".into() });
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ids_are_sorted() {
        let mut registry = Registry::new();
        for id in ["key.zip", "core.city", "key.city"] {
            registry.insert(passing(id)).unwrap();
        }
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["core.city", "key.city", "key.zip"]);
    }

    #[test]
    fn debug_omits_body() {
        let rule = passing("age");
        assert!(format!("{rule:?}").contains("\"age\""));
    }
}
