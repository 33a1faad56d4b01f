//! # User Profile Rules
//!
//! The rule set for user profile documents:
//!
//! ```json
//! {
//!   "user": {"username": "...", "realname": "..."},
//!   "profile": {
//!     "userdata": {"organization": "...", "jobTitle": "...", ...},
//!     "synced": {"gravatarHash": "..."},
//!     "preferences": {},
//!     "metadata": {}
//!   }
//! }
//! ```
//!
//! Rule ids follow three namespaces:
//!
//! - `core.*` — checks on scalar values (strings, vocabulary terms, numbers).
//! - `key.*` — the rule applied to an object member of the same name by
//!   [`Scope::keys`](profspec_core::Scope::keys).
//! - `struct.*` — root rules for whole documents.
//!
//! ## Text lengths
//!
//! The [`MIN_TEXT_LEN`]/[`MAX_TEXT_LEN`] bounds count Unicode scalar values
//! (`chars`), not bytes or UTF-16 code units. A name made of astral-plane
//! characters such as emoji is therefore measured by what a reader sees:
//! `"😀😀"` has length 2 here, where a UTF-16 count would give 4.

use regex::Regex;
use serde_json::Value;

use profspec_core::{Clause, EngineConfig, Outcome, Rule, RuleResult, Scope, SpecEngine, Specifier};

use crate::error::ProfileSpecError;
use crate::vocabulary::{self, JOB_TITLES, RESEARCH_INTERESTS};

/// Shortest accepted name-like string, in characters.
pub const MIN_TEXT_LEN: usize = 2;
/// Longest accepted name-like string, in characters.
pub const MAX_TEXT_LEN: usize = 100;

/// Root rule for a complete profile document.
pub const USER_PROFILE_SPEC: &str = "struct.userprofile";

/// Fields required on `profile.userdata`.
pub const USERDATA_REQUIRED: &[&str] = &[
    "organization",
    "jobTitle",
    "city",
    "state",
    "zip",
    "country",
    "researchInterests",
];

/// Fields checked on `profile.userdata` when present.
pub const USERDATA_OPTIONAL: &[&str] = &[
    "department",
    "affiliations",
    "primaryFundingSource",
    "avatarOption",
    "gravatarDefault",
    "researchStatement",
];

/// Fields required on each entry of `userdata.affiliations`.
pub const AFFILIATION_KEYS: &[&str] = &["title", "organization", "started", "ended"];

/// Build an engine loaded with the profile rule set.
pub fn profile_engine(config: EngineConfig) -> Result<SpecEngine, ProfileSpecError> {
    let mut engine = SpecEngine::with_config(config)?;
    register_profile_rules(&mut engine)?;
    tracing::debug!(rules = engine.len(), "built profile rule set");
    Ok(engine)
}

/// Register the profile rule set on an existing engine.
pub fn register_profile_rules(engine: &mut SpecEngine) -> Result<(), ProfileSpecError> {
    register_core_rules(engine)?;
    register_key_rules(engine)?;
    register_struct_rules(engine)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// core.*
// ---------------------------------------------------------------------------

fn register_core_rules(engine: &mut SpecEngine) -> Result<(), ProfileSpecError> {
    let leading_digit = Regex::new(r"^[0-9]")?;
    let username_chars = Regex::new(r"^[a-zA-Z0-9_]+$")?;

    engine.add(Rule::new("core.username", move |scope, value| {
        let text = match bounded_text(scope, value) {
            Ok(text) => text,
            Err(outcome) => return Ok(outcome),
        };
        if leading_digit.is_match(text) {
            return Ok(scope.failure("may not start with a number"));
        }
        if !username_chars.is_match(text) {
            return Ok(scope.failure(
                "contains invalid characters: only a-z, A-Z, 0-9, and _ allowed",
            ));
        }
        Ok(scope.success())
    }))?;

    engine.add(Rule::new("core.realname", |scope, value| {
        Ok(bounded_text(scope, value).err().unwrap_or_else(Outcome::success))
    }))?;

    engine.add(Rule::new("core.medstring", |scope, value| {
        Ok(bounded_text(scope, value).err().unwrap_or_else(Outcome::success))
    }))?;

    engine.add(Rule::new("core.job-title", |scope, value| {
        let Some(title) = value.as_str() else {
            return Ok(scope.failure("not a string"));
        };
        if !vocabulary::contains(JOB_TITLES, title) {
            return Ok(scope.failure("not in list of job titles"));
        }
        Ok(scope.success())
    }))?;

    engine.add(Rule::new("core.even-number", |scope, value| {
        match value.as_f64() {
            Some(n) if n % 2.0 == 0.0 => Ok(scope.success()),
            _ => Ok(scope.failure("not an even number")),
        }
    }))?;

    Ok(())
}

/// A string of `MIN_TEXT_LEN..=MAX_TEXT_LEN` characters, or the failure
/// explaining why not.
fn bounded_text<'v>(scope: &Scope<'_>, value: &'v Value) -> Result<&'v str, Outcome> {
    let Some(text) = value.as_str() else {
        return Err(scope.failure("not a string"));
    };
    let len = text.chars().count();
    if len < MIN_TEXT_LEN {
        return Err(scope.failure(format!("must be at least {MIN_TEXT_LEN} characters long")));
    }
    if len > MAX_TEXT_LEN {
        return Err(scope.failure(format!(
            "may not be more than {MAX_TEXT_LEN} characters long"
        )));
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// key.*
// ---------------------------------------------------------------------------

fn register_key_rules(engine: &mut SpecEngine) -> Result<(), ProfileSpecError> {
    engine.add(alias("key.username", "core.username"))?;
    engine.add(alias("key.realname", "core.realname"))?;
    engine.add(alias("key.jobTitle", "core.job-title"))?;
    for key in [
        "organization",
        "department",
        "city",
        "zip",
        "state",
        "country",
    ] {
        engine.add(alias(format!("key.{key}"), "core.medstring"))?;
    }

    engine.add(Rule::new("key.researchInterests", |scope, value| {
        let known = value
            .as_str()
            .is_some_and(|v| vocabulary::contains(RESEARCH_INTERESTS, v));
        if !known {
            return Ok(scope.failure("not in list of research interests"));
        }
        Ok(scope.success())
    }))?;

    engine.add(Rule::new("key.affiliations", |scope, value| {
        Ok(scope.all(value, |scope, item| {
            Ok(scope.keys(item, AFFILIATION_KEYS, &[])?)
        })?)
    }))?;

    for key in [
        "primaryFundingSource",
        "researchStatement",
        "avatarOption",
        "gravatarDefault",
        "gravatarHash",
        "title",
        "started",
        "ended",
        "preferences",
        "metadata",
    ] {
        engine.add(accept_any(format!("key.{key}")))?;
    }

    engine.add(Rule::new("key.user", |scope, value| {
        if let Some(rejected) = non_object(scope, value) {
            return Ok(rejected);
        }
        Ok(scope.keys(value, &["username", "realname"], &[])?)
    }))?;

    engine.add(Rule::new("key.profile", |scope, value| {
        if let Some(rejected) = non_object(scope, value) {
            return Ok(rejected);
        }
        Ok(scope.keys(value, &["userdata", "synced", "preferences", "metadata"], &[])?)
    }))?;

    engine.add(Rule::new("key.userdata", |scope, value| {
        if let Some(rejected) = non_object(scope, value) {
            return Ok(rejected);
        }
        Ok(scope.keys(value, USERDATA_REQUIRED, USERDATA_OPTIONAL)?)
    }))?;

    // No object check: a scalar surfaces as an exception outcome, an array
    // as a missing `gravatarHash`.
    engine.add(Rule::new("key.synced", |scope, value| {
        Ok(scope.keys(value, &["gravatarHash"], &[])?)
    }))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// struct.*
// ---------------------------------------------------------------------------

fn register_struct_rules(engine: &mut SpecEngine) -> Result<(), ProfileSpecError> {
    engine.add(Rule::new(USER_PROFILE_SPEC, |scope, value| {
        if let Some(rejected) = non_object(scope, value) {
            return Ok(rejected);
        }
        Ok(scope.keys(value, &["user", "profile"], &[])?)
    }))?;

    engine.add(Rule::new("struct.test", |scope, value| {
        Ok(scope.and([
            Clause::new(value, "core.even-number"),
            Clause::new(value, Specifier::inline(&greater_than_hundred)),
        ]))
    }))?;

    Ok(())
}

fn greater_than_hundred(scope: &mut Scope<'_>, value: &Value) -> RuleResult {
    if value.as_f64().is_some_and(|n| n > 100.0) {
        Ok(scope.success())
    } else {
        Ok(scope.failure("must be greater than 100"))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A rule that delegates to another rule.
fn alias(id: impl Into<String>, target: &'static str) -> Rule {
    Rule::new(id, move |scope, value| Ok(scope.validate(value, target)))
}

/// A rule that accepts any value.
fn accept_any(id: impl Into<String>) -> Rule {
    Rule::new(id, |scope, _value| Ok(scope.success()))
}

fn non_object(scope: &Scope<'_>, value: &Value) -> Option<Outcome> {
    if value.is_object() {
        None
    } else {
        Some(scope.failure("not a non-null object"))
    }
}
