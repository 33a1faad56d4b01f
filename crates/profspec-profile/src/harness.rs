//! # Expectation Harness
//!
//! Runs named validation cases against a rule set and turns each one into
//! a [`ReportRow`] (status, title, path, message) for display in a report
//! table.
//!
//! - [`expect`] runs one validation and applies a predicate to its outcome.
//! - [`report`] turns the resulting [`Check`] into a row.
//! - [`run_profile_suite`] and [`run_birthday_suite`] run the built-in
//!   cases for each rule set.
//! - [`benchmark`] times repeated validation of a rule set's sample
//!   documents and reports throughput rows.

use std::time::Instant;

use serde::Serialize;
use serde_json::{json, Value};

use profspec_core::{EngineConfig, Outcome, Reason, SpecEngine};

use crate::birthday::{birthday_engine, BIRTHDAY_SPEC};
use crate::error::ProfileSpecError;
use crate::profile::{profile_engine, USER_PROFILE_SPEC};
use crate::RuleSet;

/// Separator used when rendering a failure stack as a path.
pub const PATH_SEPARATOR: &str = " > ";

// ---------------------------------------------------------------------------
// Checks and rows
// ---------------------------------------------------------------------------

/// Row status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Fail,
    Perf,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Fail => "fail",
            Self::Perf => "perf",
        }
    }
}

/// Result of one expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub pass: bool,
    /// Failure stack of the outcome, set when the expectation failed.
    pub path: String,
    /// Outcome message, set when the expectation failed.
    pub message: String,
}

/// One line of the report table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub status: Status,
    pub title: String,
    pub path: String,
    pub message: String,
}

/// Run `generator` and check its outcome with `test`.
pub fn expect<G, T>(generator: G, test: T) -> Check
where
    G: FnOnce() -> Outcome,
    T: FnOnce(&Outcome) -> bool,
{
    let outcome = generator();
    if test(&outcome) {
        return Check {
            pass: true,
            path: String::new(),
            message: String::new(),
        };
    }
    match outcome.as_failure() {
        Some(failure) => Check {
            pass: false,
            path: failure.path(PATH_SEPARATOR),
            message: failure.message.clone(),
        },
        None => Check {
            pass: false,
            path: String::new(),
            message: "expected the value to be rejected".to_string(),
        },
    }
}

/// Turn a check into a report row.
pub fn report(title: impl Into<String>, check: Check) -> ReportRow {
    let status = if check.pass { Status::Ok } else { Status::Fail };
    ReportRow {
        status,
        title: title.into(),
        path: check.path,
        message: check.message,
    }
}

// ---------------------------------------------------------------------------
// Cases
// ---------------------------------------------------------------------------

/// A named validation with its expected verdict.
#[derive(Debug, Clone)]
pub struct Case {
    pub title: &'static str,
    pub spec: &'static str,
    pub value: Value,
    pub expect_valid: bool,
    /// When set, a rejection only counts if it has this reason.
    pub expect_reason: Option<Reason>,
}

impl Case {
    pub fn valid(title: &'static str, spec: &'static str, value: Value) -> Self {
        Self {
            title,
            spec,
            value,
            expect_valid: true,
            expect_reason: None,
        }
    }

    pub fn invalid(title: &'static str, spec: &'static str, value: Value, reason: Reason) -> Self {
        Self {
            title,
            spec,
            value,
            expect_valid: false,
            expect_reason: Some(reason),
        }
    }

    /// Whether `outcome` is the verdict this case expects.
    pub fn accepts(&self, outcome: &Outcome) -> bool {
        if outcome.is_valid() != self.expect_valid {
            return false;
        }
        match self.expect_reason {
            Some(reason) => outcome.reason() == Some(reason),
            None => true,
        }
    }
}

/// Run each case against `engine`.
pub fn run_cases(engine: &mut SpecEngine, cases: &[Case]) -> Vec<ReportRow> {
    cases
        .iter()
        .map(|case| {
            engine.reset();
            let check = expect(
                || engine.validate(&case.value, case.spec),
                |outcome| case.accepts(outcome),
            );
            if !check.pass {
                tracing::info!(title = case.title, message = %check.message, "case failed");
            }
            report(case.title, check)
        })
        .collect()
}

/// A complete, valid profile document.
pub fn sample_profile() -> Value {
    json!({
        "user": {
            "username": "eapearson",
            "realname": "Erik Pearson"
        },
        "profile": {
            "userdata": {
                "jobTitle": "CEO",
                "organization": "LBNL",
                "department": "KBase",
                "affiliations": [{
                    "title": "Web Developer",
                    "organization": "LBNL",
                    "started": "2014",
                    "ended": null
                }],
                "city": "xx",
                "state": "xx",
                "zip": "xx",
                "country": "xx",
                "researchInterests": "annotation",
                "primaryFundingSource": "xx",
                "researchStatement": "xx",
                "avatarOption": "xx",
                "gravatarDefault": "xx"
            },
            "synced": {
                "gravatarHash": "xx"
            },
            "preferences": {},
            "metadata": {}
        }
    })
}

/// A valid birthday document.
pub fn sample_birthday() -> Value {
    json!({"city": "Oakland", "date": "2017-12-26T00:00:00Z"})
}

/// Built-in cases for the profile rule set.
pub fn profile_cases() -> Vec<Case> {
    let mut bad_job = sample_profile();
    bad_job["profile"]["userdata"]["jobTitle"] = json!("Wizard");

    let mut missing_synced = sample_profile();
    if let Some(profile) = missing_synced["profile"].as_object_mut() {
        profile.remove("synced");
    }

    use Reason::SpecFailure;

    vec![
        Case::valid("An even number > 100", "struct.test", json!(102)),
        Case::invalid("An odd number > 100", "struct.test", json!(99), SpecFailure),
        Case::invalid("An even number <= 100", "struct.test", json!(98), SpecFailure),
        Case::valid("A valid username", "core.username", json!("mickey_mouse")),
        Case::invalid(
            "An invalid username",
            "core.username",
            json!("mickey mouse"),
            SpecFailure,
        ),
        Case::valid("A valid profile", USER_PROFILE_SPEC, sample_profile()),
        Case::invalid("An empty profile", USER_PROFILE_SPEC, json!({}), SpecFailure),
        Case::invalid(
            "A profile with an unknown job title",
            USER_PROFILE_SPEC,
            bad_job,
            SpecFailure,
        ),
        Case::invalid(
            "A profile without synced data",
            USER_PROFILE_SPEC,
            missing_synced,
            SpecFailure,
        ),
        Case::invalid(
            "A profile validated against a missing rule",
            "struct.userprofiles",
            sample_profile(),
            Reason::SpecError,
        ),
    ]
}

/// Built-in cases for the birthday rule set.
pub fn birthday_cases() -> Vec<Case> {
    use Reason::SpecFailure;

    vec![
        Case::valid("A valid age", "age", json!(25)),
        Case::invalid("An age of negative one, should fail", "age", json!(-1), SpecFailure),
        Case::invalid("An age of 300, should fail", "age", json!(300), SpecFailure),
        Case::invalid("An age that is not a number", "age", json!("old"), SpecFailure),
        Case::valid("A valid birthday", BIRTHDAY_SPEC, sample_birthday()),
        Case::invalid(
            "A birthday in an empty-named city",
            BIRTHDAY_SPEC,
            json!({"city": "", "date": "2017-12-26T00:00:00Z"}),
            SpecFailure,
        ),
        Case::invalid(
            "A birthday with an unknown field",
            BIRTHDAY_SPEC,
            json!({"city": "Oakland", "place": "home"}),
            SpecFailure,
        ),
    ]
}

/// Run the profile cases on a fresh profile engine.
pub fn run_profile_suite(config: EngineConfig) -> Result<Vec<ReportRow>, ProfileSpecError> {
    let mut engine = profile_engine(config)?;
    Ok(run_cases(&mut engine, &profile_cases()))
}

/// Run the birthday cases on a fresh birthday engine.
pub fn run_birthday_suite(config: EngineConfig) -> Result<Vec<ReportRow>, ProfileSpecError> {
    let mut engine = birthday_engine(config)?;
    Ok(run_cases(&mut engine, &birthday_cases()))
}

/// Validate `value` against `spec` `iterations` times and report throughput.
pub fn time_validation(
    engine: &mut SpecEngine,
    title: &str,
    spec: &str,
    value: &Value,
    iterations: u32,
) -> ReportRow {
    let start = Instant::now();
    let mut failures = 0u32;
    for _ in 0..iterations {
        if !engine.validate(value, spec).is_valid() {
            failures += 1;
        }
    }
    let elapsed = start.elapsed().as_secs_f64();
    let ops = if elapsed > 0.0 {
        f64::from(iterations) / elapsed
    } else {
        0.0
    };
    if failures > 0 {
        tracing::warn!(spec, failures, "sample failed validation during benchmark");
    }
    ReportRow {
        status: Status::Perf,
        title: title.to_string(),
        path: String::new(),
        message: format!("Ops / sec: {ops:.0}"),
    }
}

/// Throughput rows for `rule_set`, each timed over `iterations` validations
/// on one engine.
///
/// - profile: the sample profile against `struct.userprofile`.
/// - birthday: a single `age` check, then the sample birthday against
///   `struct.birthday`.
pub fn benchmark(
    rule_set: RuleSet,
    config: EngineConfig,
    iterations: u32,
) -> Result<Vec<ReportRow>, ProfileSpecError> {
    let mut engine = rule_set.build(config)?;
    let rows = match rule_set {
        RuleSet::Profile => vec![time_validation(
            &mut engine,
            "Performance for profile validation",
            USER_PROFILE_SPEC,
            &sample_profile(),
            iterations,
        )],
        RuleSet::Birthday => vec![
            time_validation(
                &mut engine,
                "Performance for single validation",
                "age",
                &json!(25),
                iterations,
            ),
            time_validation(
                &mut engine,
                "Performance for birthday validation with single spec engine",
                BIRTHDAY_SPEC,
                &sample_birthday(),
                iterations,
            ),
        ],
    };
    Ok(rows)
}
