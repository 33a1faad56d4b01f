//! # profspec-cli — Command-Line Interface
//!
//! Provides the `profspec` binary on top of the spec engine and the
//! shipped rule sets.
//!
//! ## Subcommands
//!
//! - `profspec validate` — validate a JSON/YAML document against a rule.
//! - `profspec rules` — list the rules of a rule set.
//! - `profspec selftest` — run the built-in cases and print the report.
//!
//! ```bash
//! profspec validate --rule struct.userprofile profile.json
//! profspec rules --set birthday
//! profspec selftest --bench 10000
//! ```
//!
//! ## Logging
//!
//! Logs go to stderr. `-v` raises the level from `warn` to `info`, `-vv`
//! to `debug`, `-vvv` to `trace`; `--log-json` switches to one JSON object
//! per line.
//!
//! ## Exit Codes
//!
//! `0` success, `1` validation failure, `2` operational error.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from handler logic.
//! - Handlers delegate validation to `profspec-core` and rule sets to
//!   `profspec-profile`.

pub mod rules;
pub mod selftest;
pub mod validate;

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use profspec_core::EngineConfig;

/// Log level directive for a `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global tracing subscriber, writing to stderr.
pub fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::new(log_level(verbose));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load the engine configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    EngineConfig::from_yaml_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Load a document as JSON, choosing the parser from the file extension.
///
/// `.yaml` and `.yml` files are parsed as YAML; `.json` files and files
/// without an extension as JSON.
pub fn load_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
            .with_context(|| format!("invalid YAML in {}", path.display())),
        Some("json") | None => serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON in {}", path.display())),
        Some(other) => bail!(
            "unsupported document type '.{other}' for {} (expected .json, .yaml or .yml)",
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(2), "debug");
        assert_eq!(log_level(3), "trace");
        assert_eq!(log_level(9), "trace");
    }

    #[test]
    fn json_log_lines_are_objects() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Sink(Arc<Mutex<Vec<u8>>>);

        impl Write for Sink {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let sink = Sink::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(log_level(1)))
            .with_target(false)
            .with_writer(move || writer.clone())
            .json()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(rule = "struct.userprofile", "validating document");
            tracing::debug!("hidden at info");
        });

        let bytes = sink.0.lock().unwrap().clone();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let line: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["fields"]["rule"], "struct.userprofile");
    }

    #[test]
    fn missing_config_path_gives_defaults() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profspec.yaml");
        std::fs::write(&path, "max_depth: 12\n").unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().max_depth, 12);
    }

    #[test]
    fn bad_config_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profspec.yaml");
        std::fs::write(&path, "depth: 12\n").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("profspec.yaml"));
    }

    #[test]
    fn json_and_yaml_documents_load_alike() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("doc.json");
        let yaml_path = dir.path().join("doc.yml");
        std::fs::write(&json_path, r#"{"city": "Oakland", "n": 2}"#).unwrap();
        std::fs::write(&yaml_path, "city: Oakland\nn: 2\n").unwrap();
        let expected = json!({"city": "Oakland", "n": 2});
        assert_eq!(load_document(&json_path).unwrap(), expected);
        assert_eq!(load_document(&yaml_path).unwrap(), expected);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.toml");
        std::fs::write(&path, "city = 'Oakland'").unwrap();
        assert!(load_document(&path).is_err());
    }
}
