//! # Validate Subcommand
//!
//! Validates one document against a rule of a rule set and prints the
//! outcome as JSON.
//!
//! ```text
//! $ profspec validate --rule struct.userprofile profile.json
//! {
//!   "valid": false,
//!   "reason": "specfailure",
//!   "message": "required field not on object: user",
//!   "stack": ["struct.userprofile"]
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use profspec_core::{EngineConfig, Outcome};
use profspec_profile::RuleSet;

use crate::load_document;

/// Arguments for the `profspec validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Rule to validate against. Defaults to the root rule of the set.
    #[arg(long)]
    pub rule: Option<String>,

    /// Rule set to load (profile or birthday).
    #[arg(long = "set", default_value = "profile")]
    pub rule_set: RuleSet,

    /// Print the outcome on a single line.
    #[arg(long)]
    pub compact: bool,

    /// Document to validate (.json, .yaml or .yml).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the document is valid, 1 when it is not.
pub fn run_validate(args: &ValidateArgs, config: &EngineConfig) -> Result<u8> {
    let outcome = validate_path(&args.path, args.rule_set, args.rule.as_deref(), config)?;

    let rendered = if args.compact {
        serde_json::to_string(&outcome)
    } else {
        serde_json::to_string_pretty(&outcome)
    }
    .context("failed to render outcome")?;
    println!("{rendered}");

    Ok(if outcome.is_valid() { 0 } else { 1 })
}

/// Load `path` and validate it against `rule`, or the set's root rule.
pub fn validate_path(
    path: &Path,
    rule_set: RuleSet,
    rule: Option<&str>,
    config: &EngineConfig,
) -> Result<Outcome> {
    let document = load_document(path)?;
    let mut engine = rule_set
        .build(config.clone())
        .with_context(|| format!("failed to build the {rule_set} rule set"))?;

    let rule = rule.unwrap_or(rule_set.root_spec());
    tracing::info!(path = %path.display(), rule, set = %rule_set, "validating document");

    let outcome = engine.validate(&document, rule);
    match outcome.as_failure() {
        None => tracing::info!(path = %path.display(), "document is valid"),
        Some(failure) => tracing::info!(path = %path.display(), %failure, "document is invalid"),
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use profspec_core::Reason;
    use profspec_profile::sample_profile;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn sample_profile_file_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "profile.json", &sample_profile().to_string());
        let outcome =
            validate_path(&path, RuleSet::Profile, None, &EngineConfig::default()).unwrap();
        assert!(outcome.is_valid());
    }

    #[test]
    fn empty_profile_reports_missing_user() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "profile.yaml", "{}\n");
        let outcome =
            validate_path(&path, RuleSet::Profile, None, &EngineConfig::default()).unwrap();
        assert_eq!(outcome.message(), Some("required field not on object: user"));
    }

    #[test]
    fn explicit_rule_overrides_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "age.json", "300");
        let outcome = validate_path(
            &path,
            RuleSet::Birthday,
            Some("age"),
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(outcome.reason(), Some(Reason::SpecFailure));
    }

    #[test]
    fn unknown_rule_is_a_spec_error_not_an_operational_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "doc.json", "{}");
        let outcome = validate_path(
            &path,
            RuleSet::Profile,
            Some("struct.nothing"),
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(outcome.reason(), Some(Reason::SpecError));
    }

    #[test]
    fn run_validate_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.json", &sample_profile().to_string());
        let bad = write(dir.path(), "bad.json", "{}");
        let args = |path: PathBuf| ValidateArgs {
            rule: None,
            rule_set: RuleSet::Profile,
            compact: true,
            path,
        };
        let config = EngineConfig::default();
        assert_eq!(run_validate(&args(good), &config).unwrap(), 0);
        assert_eq!(run_validate(&args(bad), &config).unwrap(), 1);
    }

    #[test]
    fn missing_file_is_an_operational_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(validate_path(&path, RuleSet::Profile, None, &EngineConfig::default()).is_err());
    }
}
