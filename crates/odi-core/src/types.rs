//! Data types for odiFinder
//!
//! This module contains the core data structures shared by the parser,
//! the HTTP client and front ends. Reported types implement Serialize and
//! Deserialize for JSON output and persisted settings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Detection strategy used to decide whether a listing is claimable.
///
/// The listings page has signalled availability in three different ways over
/// time. Exactly one strategy runs per check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Look for an enabled "Askıdan Ücretsiz Al" button
    #[default]
    Button,
    /// Read the number after "Bu menüyü askıdan al"
    Counter,
    /// Read the "N askıda" counter inside the price widget
    PriceWidget,
}

impl Strategy {
    /// All strategies, in the order the site introduced them (newest first).
    pub const ALL: [Strategy; 3] = [Strategy::Button, Strategy::Counter, Strategy::PriceWidget];

    /// Identifier used in settings files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Button => "button",
            Strategy::Counter => "counter",
            Strategy::PriceWidget => "price-widget",
        }
    }

    /// Text used when a listing has no meal name
    pub fn missing_meal_text(&self) -> &'static str {
        match self {
            Strategy::Button => "No meal name available.",
            Strategy::Counter | Strategy::PriceWidget => "No description available.",
        }
    }

    /// Text used when a listing has no location/details
    pub fn missing_location_text(&self) -> &'static str {
        match self {
            Strategy::Button => "No location available.",
            Strategy::Counter | Strategy::PriceWidget => "No details available.",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "button" => Ok(Strategy::Button),
            "counter" => Ok(Strategy::Counter),
            "price-widget" | "price_widget" | "price" => Ok(Strategy::PriceWidget),
            other => Err(format!(
                "unknown strategy '{}', expected one of: button, counter, price-widget",
                other
            )),
        }
    }
}

/// Classifier output for a single listing block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityVerdict {
    /// Nothing to claim right now
    NotAvailable,
    /// Claimable; `count` is set only by strategies that read a number
    Available { count: Option<u32> },
}

/// A claimable meal found on the listings page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    /// Display name: menu title, else restaurant name, else the matched target
    pub restaurant_name: String,
    /// Meal name or description, with a fallback text when empty
    pub meal_name: String,
    /// Location or details, with a fallback text when empty
    pub location: String,
    /// Number of suspended meals, when the strategy reads one
    pub suspended_count: Option<u32>,
    /// Configured target name that produced this record
    pub matched_target: String,
    /// Capture time of the check
    pub timestamp: DateTime<Utc>,
}

/// Sign-in credentials for getodi.com
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
