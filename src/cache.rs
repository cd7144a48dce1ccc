//! Reuse of labels across records with identical canonical text.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How repeated canonical texts are detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// Compare with the previous record in sorted order only.
    #[default]
    Adjacent,
    /// Remember every resolved canonical text.
    Memo,
}

impl CacheMode {
    /// Lowercase name as used in configuration files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adjacent => "adjacent",
            Self::Memo => "memo",
        }
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adjacent" => Ok(Self::Adjacent),
            "memo" => Ok(Self::Memo),
            other => Err(Error::config(format!(
                "unknown cache mode '{}' (expected adjacent or memo)",
                other
            ))),
        }
    }
}

/// Label cache consulted before each extractor call.
///
/// In [`CacheMode::Adjacent`] a record reuses the label of the record visited
/// just before it, provided both share the same canonical text and that
/// record was labelled. Records must be visited in sorted canonical order for
/// this to catch every duplicate; ties that are not adjacent are missed.
///
/// ```rust
/// use orgtract::{CacheMode, ResolutionCache};
///
/// let mut cache = ResolutionCache::new(CacheMode::Adjacent);
/// assert_eq!(cache.lookup("ACME LTD"), None);
/// cache.store("ACME LTD", Some("ACME LTD"));
/// assert_eq!(cache.lookup("ACME LTD").as_deref(), Some("ACME LTD"));
/// cache.store("BETA", None);
/// assert_eq!(cache.lookup("ACME LTD"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    mode: CacheMode,
    previous: Option<(String, Option<String>)>,
    memo: HashMap<String, String>,
    hits: usize,
}

impl ResolutionCache {
    /// Empty cache.
    #[must_use]
    pub fn new(mode: CacheMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    /// Label to reuse for `canonical`, if any.
    pub fn lookup(&mut self, canonical: &str) -> Option<String> {
        let hit = match self.mode {
            CacheMode::Adjacent => match &self.previous {
                Some((text, Some(label))) if text == canonical => Some(label.clone()),
                _ => None,
            },
            CacheMode::Memo => self.memo.get(canonical).cloned(),
        };
        if hit.is_some() {
            self.hits += 1;
        }
        hit
    }

    /// Remember the outcome for the record just visited.
    pub fn store(&mut self, canonical: &str, label: Option<&str>) {
        match self.mode {
            CacheMode::Adjacent => {
                self.previous = Some((canonical.to_string(), label.map(str::to_string)));
            }
            CacheMode::Memo => {
                if let Some(label) = label {
                    self.memo
                        .entry(canonical.to_string())
                        .or_insert_with(|| label.to_string());
                }
            }
        }
    }

    /// Lookups answered from the cache.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }
}
