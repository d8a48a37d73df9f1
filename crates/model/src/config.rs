//! Harvester configuration.
//!
//! The configuration is an immutable value: loaded once per process from a
//! YAML file, validated, then passed by reference to every component that
//! needs it. Workers load it again independently in their own process.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{HarvestError, Result};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "harvester.yml";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Seconds to wait between harvesting cycles
    #[serde(default = "default_cycle_sleep")]
    pub cycle_sleep_secs: u64,

    /// Seconds between two drains of the worker result channels
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Skip unknown filter names with a warning instead of refusing to start
    #[serde(default)]
    pub lenient_filters: bool,

    /// What the selection engine does with a candidate it cannot afford
    #[serde(default)]
    pub on_unaffordable: UnaffordablePolicy,

    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

/// Policy for a candidate whose cost exceeds the remaining budget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnaffordablePolicy {
    /// Stop the whole cycle at the first unaffordable candidate
    #[default]
    Halt,
    /// Skip it and keep looking for cheaper candidates
    Skip,
}

/// One giveaway site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,

    #[serde(default = "default_true")]
    pub enable: bool,

    /// Ordered filter tokens: `name` or `name=argument`
    #[serde(default)]
    pub filters: Vec<String>,

    /// Text that only appears on the account page when logged in
    #[serde(default = "default_session_marker")]
    pub session_marker: String,

    /// Snapshot document backing this site
    pub snapshot: PathBuf,

    /// Filters always applied for this site, before the configured ones
    #[serde(default = "default_required_filters")]
    pub required_filters: Vec<String>,

    /// Filters this site never applies
    #[serde(default)]
    pub disabled_filters: Vec<String>,

    /// Filters the site applies on its side; the pipeline skips them
    #[serde(default)]
    pub internal_filters: Vec<String>,
}

impl SiteConfig {
    /// A site with default filter policy and the given snapshot
    pub fn new(name: impl Into<String>, snapshot: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            enable: true,
            filters: Vec::new(),
            session_marker: default_session_marker(),
            snapshot: snapshot.into(),
            required_filters: default_required_filters(),
            disabled_filters: Vec::new(),
            internal_filters: Vec::new(),
        }
    }
}

fn default_cycle_sleep() -> u64 {
    3600
}
fn default_poll_interval() -> u64 {
    60
}
fn default_true() -> bool {
    true
}
fn default_session_marker() -> String {
    "nav__avatar-inner-wrap".into()
}
fn default_required_filters() -> Vec<String> {
    vec!["entered".into(), "level".into(), "library".into()]
}

impl AppConfig {
    /// Read and parse a YAML configuration file.
    ///
    /// Structural validation runs here. Filter chains are checked at
    /// startup against the filter registry, which this crate does not know.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content).map_err(|e| match e {
            HarvestError::Parse { reason, .. } => HarvestError::Parse {
                file: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        config.resolve_paths(path.parent().unwrap_or_else(|| Path::new(".")));
        Ok(config)
    }

    /// Parse configuration from YAML text and validate it
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(content).map_err(|e| HarvestError::Parse {
                file: "config".to_string(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cycle_sleep_secs == 0 {
            return Err(HarvestError::Config(
                "cycle_sleep_secs must be > 0".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(HarvestError::Config(
                "poll_interval_secs must be > 0".to_string(),
            ));
        }
        if self.poll_interval_secs > self.cycle_sleep_secs {
            return Err(HarvestError::Config(format!(
                "poll_interval_secs ({}) exceeds cycle_sleep_secs ({})",
                self.poll_interval_secs, self.cycle_sleep_secs
            )));
        }

        let mut seen = HashSet::new();
        for site in &self.sites {
            if site.name.trim().is_empty() {
                return Err(HarvestError::Config("site with empty name".to_string()));
            }
            if !seen.insert(site.name.as_str()) {
                return Err(HarvestError::Config(format!(
                    "site '{}' configured twice",
                    site.name
                )));
            }
        }
        Ok(())
    }

    pub fn cycle_sleep(&self) -> Duration {
        Duration::from_secs(self.cycle_sleep_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn site(&self, name: &str) -> Result<&SiteConfig> {
        self.sites
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| HarvestError::UnknownSite(name.to_string()))
    }

    pub fn enabled_sites(&self) -> impl Iterator<Item = &SiteConfig> {
        self.sites.iter().filter(|s| s.enable)
    }

    /// Make relative snapshot paths relative to the config file's directory
    fn resolve_paths(&mut self, base: &Path) {
        for site in &mut self.sites {
            if site.snapshot.is_relative() {
                site.snapshot = base.join(&site.snapshot);
            }
        }
    }
}
