//! Explorer configuration
//!
//! Loaded from a JSON file. Every field is optional and falls back to
//! [`ExplorerConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::navigation::{ConformanceState, FilterOption, SortOption};
use crate::results::VersionItem;

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "CONFORMANCE_EXPLORER_CONFIG";

/// Upstream repository browsed by source links
pub const DEFAULT_TEST262_REPO_URL: &str = "https://github.com/tc39/test262/tree";

/// Configuration for the conformance explorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExplorerConfig {
    /// Published result sets, oldest first
    pub versions: Vec<VersionItem>,
    /// Tag opened when none is given; the last version otherwise
    pub default_version: Option<String>,
    pub test262_repo_url: String,
    pub default_sort: SortOption,
    pub default_filter: FilterOption,
    /// Where the interactive browser persists its command history
    pub history_file: Option<PathBuf>,
    pub prompt: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            versions: Vec::new(),
            default_version: None,
            test262_repo_url: DEFAULT_TEST262_REPO_URL.to_string(),
            default_sort: SortOption::default(),
            default_filter: FilterOption::default(),
            history_file: home_dir().map(|h| h.join(".conformance_explorer_history")),
            prompt: "test262> ".to_string(),
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

impl ExplorerConfig {
    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("invalid {}: {}", path.display(), e)))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), versions = config.versions.len(), "loaded configuration");
        Ok(config)
    }

    /// Load from `explicit`, else from `CONFORMANCE_EXPLORER_CONFIG`, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        for (i, version) in self.versions.iter().enumerate() {
            if version.tag_name.is_empty() {
                return Err(Error::Config(format!("version #{} has an empty tagName", i)));
            }
            if self.versions[..i].iter().any(|v| v.tag_name == version.tag_name) {
                return Err(Error::Config(format!("version '{}' is listed twice", version.tag_name)));
            }
        }
        if let Some(ref tag) = self.default_version {
            self.version(tag)?;
        }
        Ok(())
    }

    /// Look up a configured version by tag
    pub fn version(&self, tag: &str) -> Result<&VersionItem> {
        self.versions
            .iter()
            .find(|v| v.tag_name == tag)
            .ok_or_else(|| Error::UnknownVersion(tag.to_string()))
    }

    /// Version opened when the user names none
    pub fn initial_version(&self) -> Result<&VersionItem> {
        match self.default_version {
            Some(ref tag) => self.version(tag),
            None => self
                .versions
                .last()
                .ok_or_else(|| Error::Config("no versions configured".to_string())),
        }
    }

    /// Root state of `version` with the configured default options
    pub fn initial_state(&self, version: &VersionItem) -> ConformanceState {
        ConformanceState::initial(version.clone())
            .with_sort(self.default_sort)
            .with_filter(self.default_filter)
    }
}
