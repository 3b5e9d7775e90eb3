//! Persisted user settings
//!
//! Settings are stored as pretty-printed JSON. A missing file means
//! defaults; a present but invalid file is an error.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::client::validate_city_id;
use crate::error::{OdiError, Result};
use crate::types::Strategy;

/// Default city: İzmir
pub const DEFAULT_CITY_ID: &str = "35";

/// Default refresh interval for front ends that poll
pub const DEFAULT_REFRESH_INTERVAL_MINUTES: u32 = 3;

/// User settings for the finder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderSettings {
    /// getodi.com username; the password is never persisted
    pub username: String,
    /// Restaurant names to track, in scan order
    pub restaurants: Vec<String>,
    /// City plate code
    pub city_id: String,
    /// Availability layout to detect
    pub strategy: Strategy,
    /// Minutes between checks, for front ends that poll
    pub refresh_interval_minutes: u32,
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self {
            username: String::new(),
            restaurants: Vec::new(),
            city_id: DEFAULT_CITY_ID.to_string(),
            strategy: Strategy::default(),
            refresh_interval_minutes: DEFAULT_REFRESH_INTERVAL_MINUTES,
        }
    }
}

impl FinderSettings {
    /// Load settings from a JSON file, or defaults if the file does not exist.
    ///
    /// # Errors
    /// * `OdiError::Settings` if the file cannot be read, parsed or validated
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "settings file missing, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| OdiError::Settings(format!("cannot read {}: {}", path.display(), e)))?;
        let settings: Self = serde_json::from_str(&content)
            .map_err(|e| OdiError::Settings(format!("cannot parse {}: {}", path.display(), e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate and write settings as pretty JSON, creating parent directories.
    ///
    /// # Errors
    /// * `OdiError::Settings` if validation or writing fails
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.validate()?;

        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                OdiError::Settings(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| OdiError::Settings(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| OdiError::Settings(format!("cannot write {}: {}", path.display(), e)))
    }

    /// Check the city id and refresh interval.
    pub fn validate(&self) -> Result<()> {
        validate_city_id(&self.city_id)
            .map_err(|e| OdiError::Settings(e.to_string()))?;

        if self.refresh_interval_minutes == 0 {
            return Err(OdiError::Settings(
                "refresh interval must be at least 1 minute".to_string(),
            ));
        }

        Ok(())
    }

    /// Replace the restaurant list from free-form text.
    pub fn set_restaurants(&mut self, text: &str) {
        self.restaurants = parse_restaurant_list(text);
    }
}

/// Parse a restaurant list typed by the user.
///
/// Names are separated by newlines or commas. Blank entries are dropped, as
/// are case-insensitive duplicates (the first spelling is kept).
///
/// # Example
/// ```
/// use odi_core::settings::parse_restaurant_list;
///
/// let names = parse_restaurant_list("Pizza Place, Cafe X\n\npizza place");
/// assert_eq!(names, vec!["Pizza Place", "Cafe X"]);
/// ```
pub fn parse_restaurant_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_lowercase()))
        .map(str::to_string)
        .collect()
}
