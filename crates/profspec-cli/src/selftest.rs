//! # Selftest Subcommand
//!
//! Runs the built-in cases of a rule set and prints one aligned row per
//! case. With `--bench N`, appends the set's throughput rows, each measured
//! over `N` validations of a sample document.
//!
//! ```text
//! $ profspec selftest --set birthday
//! STATUS  TITLE                                 PATH                        MESSAGE
//! ok      A valid age
//! ok      An age of negative one, should fail
//! ...
//! ```

use anyhow::{Context, Result};
use clap::Args;

use profspec_core::EngineConfig;
use profspec_profile::{benchmark, ReportRow, RuleSet, Status};

/// Arguments for the `profspec selftest` subcommand.
#[derive(Args, Debug)]
pub struct SelftestArgs {
    /// Rule set whose cases to run (profile or birthday).
    #[arg(long = "set", default_value = "profile")]
    pub rule_set: RuleSet,

    /// Also time this many validations of the set's sample documents.
    #[arg(long, value_name = "ITERATIONS")]
    pub bench: Option<u32>,

    /// Emit the rows as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Execute the selftest subcommand.
///
/// Returns exit code: 0 when every case behaves as expected, 1 otherwise.
pub fn run_selftest(args: &SelftestArgs, config: &EngineConfig) -> Result<u8> {
    let rows = collect_rows(args, config)?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&rows).context("failed to render report")?;
        println!("{rendered}");
    } else {
        print!("{}", render_table(&rows));
    }

    let failed = rows.iter().filter(|r| r.status == Status::Fail).count();
    if failed > 0 {
        tracing::warn!(failed, set = %args.rule_set, "selftest cases failed");
        return Ok(1);
    }
    Ok(0)
}

fn collect_rows(args: &SelftestArgs, config: &EngineConfig) -> Result<Vec<ReportRow>> {
    let mut rows = args
        .rule_set
        .run_suite(config.clone())
        .with_context(|| format!("failed to run the {} cases", args.rule_set))?;

    if let Some(iterations) = args.bench {
        let perf = benchmark(args.rule_set, config.clone(), iterations)
            .with_context(|| format!("failed to benchmark the {} rule set", args.rule_set))?;
        rows.extend(perf);
    }
    Ok(rows)
}

/// Render rows as a left-aligned table with a header line.
pub fn render_table(rows: &[ReportRow]) -> String {
    const HEADERS: [&str; 4] = ["STATUS", "TITLE", "PATH", "MESSAGE"];

    let mut widths = HEADERS.map(str::len);
    for row in rows {
        widths[0] = widths[0].max(row.status.as_str().len());
        widths[1] = widths[1].max(row.title.chars().count());
        widths[2] = widths[2].max(row.path.chars().count());
    }

    let mut out = String::new();
    let mut line = |cells: [&str; 4]| {
        let text = format!(
            "{:<w0$}  {:<w1$}  {:<w2$}  {}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        );
        out.push_str(text.trim_end());
        out.push('\n');
    };

    line(HEADERS);
    for row in rows {
        line([row.status.as_str(), &row.title, &row.path, &row.message]);
    }
    out
}
