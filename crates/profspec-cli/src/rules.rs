//! # Rules Subcommand
//!
//! Lists the rule ids a rule set registers, one per line, in sorted order.

use anyhow::{Context, Result};
use clap::Args;

use profspec_core::EngineConfig;
use profspec_profile::RuleSet;

/// Arguments for the `profspec rules` subcommand.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Rule set to list (profile or birthday).
    #[arg(long = "set", default_value = "profile")]
    pub rule_set: RuleSet,
}

/// Execute the rules subcommand.
pub fn run_rules(args: &RulesArgs, config: &EngineConfig) -> Result<u8> {
    for id in rule_ids(args.rule_set, config)? {
        println!("{id}");
    }
    Ok(0)
}

/// Sorted ids of every rule in `rule_set`.
pub fn rule_ids(rule_set: RuleSet, config: &EngineConfig) -> Result<Vec<String>> {
    let engine = rule_set
        .build(config.clone())
        .with_context(|| format!("failed to build the {rule_set} rule set"))?;
    Ok(engine.rule_ids().into_iter().map(str::to_string).collect())
}
