//! Engine configuration
//!
//! Loaded from TOML, every field optional:
//!
//! ```toml
//! strict_consistency = false
//! query_limit = 10000
//! ```

use diagstore_core::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default cap on rows returned by revision window queries
pub const DEFAULT_QUERY_LIMIT: usize = 10_000;

/// Tunables for the range inserter, repair pass, and reader
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Abort an insert with `Error::Consistency` when a name's stored rows
    /// do not form a partition, instead of proceeding on the repaired view
    #[serde(default)]
    pub strict_consistency: bool,

    /// Maximum rows returned by `diagnostics_between`
    #[serde(default = "default_query_limit")]
    pub query_limit: usize,
}

fn default_query_limit() -> usize {
    DEFAULT_QUERY_LIMIT
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_consistency: false,
            query_limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict consistency handling
    pub fn strict_consistency(mut self, strict: bool) -> Self {
        self.strict_consistency = strict;
        self
    }

    /// Set the revision window query cap
    pub fn query_limit(mut self, limit: usize) -> Self {
        self.query_limit = limit;
        self
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("reading {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.query_limit == 0 {
            return Err(Error::Config("query_limit must be at least 1".into()));
        }
        Ok(())
    }
}
