//! HTML parsers for getodi.com pages
//!
//! This module contains the listings page segmenter and one classifier per
//! availability layout the site has used:
//! - `listing`: Split the listings page into per-restaurant blocks
//! - `button`: Enabled "Askıdan Ücretsiz Al" button
//! - `counter`: "Bu menüyü askıdan al <N>" phrase
//! - `price`: "<N> askıda" label in the price widget

pub mod button;
pub mod counter;
pub mod listing;
pub mod price;

// Re-export main parsing functions
pub use counter::extract_counter;
pub use listing::{parse_document, parse_listings, ListingBlock};
pub use price::extract_suspended_count;
