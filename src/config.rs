//! Resolver configuration.
//!
//! ```toml
//! # orgtract.toml
//! max_variation = 2
//! cache_mode = "memo"
//! workers = 4
//! interactive = false
//! ```

use crate::cache::CacheMode;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the resolver needs to know, passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Inclusive bound on containing labels for an alias merge; `<= 0` disables merging.
    pub max_variation: i64,
    /// Duplicate detection before extraction.
    pub cache_mode: CacheMode,
    /// Extraction threads. Values above 1 bypass the cache.
    pub workers: usize,
    /// Ask the operator about ambiguous candidate sets.
    pub interactive: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_variation: 0,
            cache_mode: CacheMode::Adjacent,
            workers: 1,
            interactive: true,
        }
    }
}

impl ResolverConfig {
    /// Parse from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| Error::config(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Reject settings that make a run impossible.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::config("workers must be at least 1"));
        }
        Ok(())
    }

    /// Set `max_variation`.
    #[must_use]
    pub fn with_max_variation(mut self, max_variation: i64) -> Self {
        self.max_variation = max_variation;
        self
    }

    /// Set the cache mode.
    #[must_use]
    pub fn with_cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// Set the number of extraction workers.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Enable or disable operator prompts.
    #[must_use]
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ResolverConfig::default();
        assert_eq!(c.max_variation, 0);
        assert_eq!(c.cache_mode, CacheMode::Adjacent);
        assert_eq!(c.workers, 1);
        assert!(c.interactive);
    }

    #[test]
    fn partial_toml() {
        let c = ResolverConfig::from_toml_str("max_variation = 3\ncache_mode = \"memo\"").unwrap();
        assert_eq!(c.max_variation, 3);
        assert_eq!(c.cache_mode, CacheMode::Memo);
        assert_eq!(c.workers, 1);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ResolverConfig::from_toml_str("max_variation = \"two\"").is_err());
        assert!(ResolverConfig::from_toml_str("workers = 0").unwrap_err().is_fatal());
        assert!(ResolverConfig::from_toml_str("cache_mode = \"lru\"").is_err());
        assert!(ResolverConfig::from_toml_str("max_variaton = 2").is_err());
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orgtract.toml");
        std::fs::write(&path, "workers = 2\ninteractive = false\n").unwrap();
        let c = ResolverConfig::from_toml_file(&path).unwrap();
        assert_eq!(c.workers, 2);
        assert!(!c.interactive);
        assert!(ResolverConfig::from_toml_file(dir.path().join("missing.toml")).is_err());
    }
}
