//! # Engine Configuration
//!
//! Tunables for a [`SpecEngine`](crate::SpecEngine). Every field has a
//! default, so an empty document is a valid configuration.
//!
//! ```yaml
//! max_depth: 64
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Default bound on the validation call stack.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Largest accepted `max_depth`. Each frame costs several native stack
/// frames, so deeper limits would overflow a default-sized thread stack
/// before the depth guard could report.
pub const MAX_DEPTH_LIMIT: usize = 512;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum number of frames on the call stack. A dispatch that would
    /// go deeper yields a `specerror` outcome.
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Parse a YAML configuration document.
    pub fn from_yaml_str(text: &str) -> Result<Self, SpecError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| SpecError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that `max_depth` lies in `1..=MAX_DEPTH_LIMIT`.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.max_depth == 0 {
            return Err(SpecError::Config("max_depth must be at least 1".into()));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(SpecError::Config(format!(
                "max_depth must be at most {MAX_DEPTH_LIMIT}, got {}",
                self.max_depth
            )));
        }
        Ok(())
    }
}
