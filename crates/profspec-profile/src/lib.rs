//! # profspec-profile — Rule Sets
//!
//! Rule sets for the profspec engine, and the harness that reports on them.
//!
//! ## Rule Sets
//!
//! - [`profile`] — user profile documents (`struct.userprofile`) and their
//!   parts: usernames, real names, job titles, research interests,
//!   affiliations.
//! - [`birthday`] — a small demonstration set (`struct.birthday`) built on
//!   a data-driven `logic.and` rule.
//!
//! ## Harness (`harness`)
//!
//! Runs named cases against a rule set and renders status/title/path/message
//! rows, plus throughput rows timed on each set's sample documents.
//!
//! ## Crate Policy
//!
//! - Depends only on `profspec-core` internally.
//! - Rule messages are user-facing text; change them only together with
//!   the tests that pin them.

use std::fmt;
use std::str::FromStr;

pub mod birthday;
pub mod error;
pub mod harness;
pub mod profile;
pub mod vocabulary;

pub use birthday::{birthday_engine, register_birthday_rules, BIRTHDAY_SPEC};
pub use error::ProfileSpecError;
pub use harness::{
    benchmark, expect, report, run_birthday_suite, run_cases, run_profile_suite, sample_birthday,
    sample_profile, time_validation, Case, Check, ReportRow, Status, PATH_SEPARATOR,
};
pub use profile::{profile_engine, register_profile_rules, USER_PROFILE_SPEC};

use profspec_core::{EngineConfig, SpecEngine};

/// The rule sets shipped with this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleSet {
    #[default]
    Profile,
    Birthday,
}

impl RuleSet {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Birthday => "birthday",
        }
    }

    /// Root rule of the set.
    pub fn root_spec(&self) -> &'static str {
        match self {
            Self::Profile => USER_PROFILE_SPEC,
            Self::Birthday => BIRTHDAY_SPEC,
        }
    }

    /// Build an engine loaded with this rule set.
    pub fn build(&self, config: EngineConfig) -> Result<SpecEngine, ProfileSpecError> {
        match self {
            Self::Profile => profile_engine(config),
            Self::Birthday => birthday_engine(config),
        }
    }

    /// Run the built-in cases for this rule set.
    pub fn run_suite(&self, config: EngineConfig) -> Result<Vec<ReportRow>, ProfileSpecError> {
        match self {
            Self::Profile => run_profile_suite(config),
            Self::Birthday => run_birthday_suite(config),
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleSet {
    type Err = ProfileSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile" => Ok(Self::Profile),
            "birthday" => Ok(Self::Birthday),
            other => Err(ProfileSpecError::UnknownRuleSet(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_set_round_trips_through_its_name() {
        for set in [RuleSet::Profile, RuleSet::Birthday] {
            assert_eq!(set.name().parse::<RuleSet>().unwrap(), set);
        }
    }

    #[test]
    fn unknown_rule_set_is_rejected() {
        let err = "zone".parse::<RuleSet>().unwrap_err();
        assert!(err.to_string().contains("zone"));
    }

    #[test]
    fn built_engine_knows_its_root_rule() {
        for set in [RuleSet::Profile, RuleSet::Birthday] {
            let engine = set.build(EngineConfig::default()).unwrap();
            assert!(engine.contains(set.root_spec()));
        }
    }
}
