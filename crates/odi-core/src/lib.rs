//! odiFinder Core Library
//!
//! This crate detects claimable suspended meals ("askıda yemek") on the
//! getodi.com student listings page.
//!
//! # Features
//! - Split the listings page into per-restaurant blocks
//! - Three availability strategies, one per layout the site has used
//! - De-duplicated results, one record per tracked restaurant
//! - Session-keeping, rate-limited HTTP client
//! - JSON-persisted user settings

pub mod availability;
pub mod client;
pub mod error;
pub mod finder;
pub mod parser;
pub mod settings;
pub mod types;

// Re-export main types for convenience
pub use availability::{assemble, check_availability};
pub use client::{ClientConfig, OdiClient, RateLimiter};
pub use error::{OdiError, Result};
pub use finder::MealFinder;
pub use settings::{parse_restaurant_list, FinderSettings};
pub use types::{AvailabilityVerdict, Credentials, MealRecord, Strategy};
