//! Survey configuration
//!
//! Remote bins are described by explicit values handed to the store
//! constructors. The defaults are the placeholder sentinels, which keep the
//! whole system in local-only mode until real bin ids are supplied.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default document store endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.jsonbin.io/v3/b";

/// Placeholder id of the responses bin
pub const PLACEHOLDER_BIN_ID: &str = "YOUR_BIN_ID";

/// Placeholder id of the visit statistics bin
pub const PLACEHOLDER_VISIT_BIN_ID: &str = "YOUR_VISIT_BIN_ID";

/// Placeholder API key
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

/// Default local data directory
pub const DEFAULT_DATA_DIR: &str = "survey-data";

/// One remote document (bin)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinConfig {
    /// Store endpoint, without trailing slash
    pub base_url: String,
    /// Opaque bin identifier
    pub bin_id: String,
    /// Master key sent as `X-Master-Key`
    pub api_key: String,
}

impl BinConfig {
    /// Create bin config against the default endpoint
    #[inline]
    #[must_use]
    pub fn new(bin_id: impl Into<String>) -> Self {
        Self {
            bin_id: bin_id.into(),
            ..Self::default()
        }
    }

    /// With endpoint
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Placeholder-configured visit bin
    #[must_use]
    pub fn visits_placeholder() -> Self {
        Self::new(PLACEHOLDER_VISIT_BIN_ID)
    }

    /// Whether the bin points at a real document
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.bin_id.is_empty()
            && self.bin_id != PLACEHOLDER_BIN_ID
            && self.bin_id != PLACEHOLDER_VISIT_BIN_ID
    }

    /// Key to authenticate with, unless unset or still the placeholder
    #[must_use]
    pub fn master_key(&self) -> Option<&str> {
        let key = self.api_key.as_str();
        (!key.is_empty() && key != PLACEHOLDER_API_KEY).then_some(key)
    }

    /// `GET` target for the latest document version
    #[must_use]
    pub fn latest_url(&self) -> String {
        format!("{}/latest", self.document_url())
    }

    /// `PUT` target for the document
    #[must_use]
    pub fn document_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.bin_id)
    }
}

impl Default for BinConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bin_id: PLACEHOLDER_BIN_ID.to_string(),
            api_key: PLACEHOLDER_API_KEY.to_string(),
        }
    }
}

/// Full survey configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Bin holding the response array
    pub responses: BinConfig,
    /// Bin holding the PV/UV counters
    pub visits: BinConfig,
    /// Directory of the local storage file
    pub data_dir: PathBuf,
}

impl SurveyConfig {
    /// Create default (local-only) configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// - `ConfigError::Parse` if the text does not match the schema
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from an optional TOML file, then apply environment overrides
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - `ConfigError::Parse` if it is not valid
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply `SURVEY_*` overrides from a variable lookup
    ///
    /// `SURVEY_BASE_URL` and `SURVEY_API_KEY` apply to both bins.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup("SURVEY_BASE_URL") {
            self.responses.base_url.clone_from(&base_url);
            self.visits.base_url = base_url;
        }
        if let Some(api_key) = lookup("SURVEY_API_KEY") {
            self.responses.api_key.clone_from(&api_key);
            self.visits.api_key = api_key;
        }
        if let Some(bin_id) = lookup("SURVEY_BIN_ID") {
            self.responses.bin_id = bin_id;
        }
        if let Some(bin_id) = lookup("SURVEY_VISIT_BIN_ID") {
            self.visits.bin_id = bin_id;
        }
        if let Some(data_dir) = lookup("SURVEY_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }
        self
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            responses: BinConfig::default(),
            visits: BinConfig::visits_placeholder(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}
