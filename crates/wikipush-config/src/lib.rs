//! Sync manifest parsing for wikipush.
//!
//! Each sync root carries a `settings.json` manifest naming the destination
//! Confluence space plus optional publishing options. The manifest is read
//! and validated before any remote operation is attempted.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Manifest filename expected in the sync root.
pub const SETTINGS_FILENAME: &str = "settings.json";

/// Sync manifest for one markdown directory.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Confluence destination settings.
    pub confluence: ConfluenceSettings,
}

/// Confluence destination settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfluenceSettings {
    /// Destination space key (required).
    pub space: String,
    /// Confluence base URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Prefix applied to every page title.
    #[serde(default, rename = "pagePrefix")]
    pub page_prefix: Option<String>,
    /// Anchor page id under which root items are nested.
    #[serde(default, rename = "pageId")]
    pub page_id: Option<String>,
}

impl Settings {
    /// Load and validate `settings.json` from a sync root directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the manifest is absent,
    /// [`ConfigError::Parse`] if it is not valid JSON for the expected
    /// shape, and [`ConfigError::MissingField`] if `confluence.space`
    /// is empty.
    pub fn load(sync_root: &Path) -> Result<Self, ConfigError> {
        let path = sync_root.join(SETTINGS_FILENAME);
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let content = std::fs::read_to_string(&path)?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;

        Ok(settings)
    }

    /// Validate required fields.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.confluence.space.trim().is_empty() {
            return Err(ConfigError::MissingField("confluence.space"));
        }
        Ok(())
    }

    /// Title prefix, empty when not configured.
    #[must_use]
    pub fn page_prefix(&self) -> &str {
        self.confluence.page_prefix.as_deref().unwrap_or("")
    }

    /// Anchor page id for root items, if configured.
    #[must_use]
    pub fn parent_page_id(&self) -> Option<&str> {
        self.confluence.page_id.as_deref()
    }
}

/// Manifest error.
#[derive(Debug)]
pub enum ConfigError {
    /// Manifest file not found.
    NotFound(PathBuf),
    /// IO error.
    Io(std::io::Error),
    /// JSON parsing error.
    Parse(serde_json::Error),
    /// Required field missing or empty.
    MissingField(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Manifest not found: {}", path.display()),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Parse(err) => write!(f, "Invalid settings.json: {err}"),
            Self::MissingField(field) => write!(f, "settings.json is missing {field}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
