//! costboard settings
//!
//! Read from `<config_dir>/costboard/config.toml` unless a path is given.
//!
//! ```toml
//! default_units = "EUR"
//! top_items_limit = 10
//!
//! [[routes]]
//! path_prefix = "/explorer"
//! required = ["aws", "ocp"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use costboard_types::DEFAULT_UNITS;

use crate::access::{AccessGate, RouteRule, RouteTable};
use crate::analytics::ReportAggregator;
use crate::error::{CoreError, RouteTableError};

/// Default number of ranked groups before "Others"
pub const DEFAULT_TOP_ITEMS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Units label for reports that carry none
    pub default_units: String,
    /// Groups listed by `top` before the rest are folded into "Others"
    pub top_items_limit: usize,
    /// Replaces the built-in route table when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<RouteRule>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_units: DEFAULT_UNITS.to_string(),
            top_items_limit: DEFAULT_TOP_ITEMS_LIMIT,
            routes: None,
        }
    }
}

impl Settings {
    /// `<config_dir>/costboard/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("costboard").join("config.toml"))
    }

    /// Parse and validate settings; `path` is only used in errors
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, CoreError> {
        let settings: Settings = toml::from_str(content).map_err(|e| CoreError::TomlParse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
            source: e,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path`; the file must exist
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let settings = Self::from_toml_str(&content, path)?;
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Load from `path`, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Resolve settings for the CLI
    ///
    /// An explicit path must exist; the default location may be absent.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, CoreError> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) => Self::load_or_default(&path),
                None => Ok(Self::default()),
            },
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.default_units.trim().is_empty() {
            return Err(CoreError::InvalidConfig {
                message: "default_units must not be empty".to_string(),
            });
        }
        if self.top_items_limit == 0 {
            return Err(CoreError::InvalidConfig {
                message: "top_items_limit must be at least 1".to_string(),
            });
        }
        self.route_table()?;
        Ok(())
    }

    /// Configured route table, or the built-in one
    pub fn route_table(&self) -> Result<RouteTable, RouteTableError> {
        match &self.routes {
            Some(rules) => RouteTable::new(rules.clone()),
            None => Ok(RouteTable::default()),
        }
    }

    pub fn access_gate(&self) -> Result<AccessGate, RouteTableError> {
        self.route_table().map(AccessGate::new)
    }

    pub fn aggregator(&self) -> ReportAggregator {
        ReportAggregator::with_default_units(self.default_units.clone())
    }
}
