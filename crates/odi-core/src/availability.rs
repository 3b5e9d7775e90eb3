//! Availability detection over a listings page
//!
//! Combines the segmenter with the configured classifier and assembles one
//! `MealRecord` per target restaurant that is currently claimable.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::parser::{button, counter, parse_document, parse_listings, price, ListingBlock};
use crate::types::{AvailabilityVerdict, MealRecord, Strategy};

impl Strategy {
    /// Classify one listing block with this strategy.
    pub fn classify(&self, block: &ListingBlock) -> AvailabilityVerdict {
        match self {
            Strategy::Button => button::classify(block),
            Strategy::Counter => counter::classify(block),
            Strategy::PriceWidget => price::classify(block),
        }
    }
}

/// Check a listings page for claimable meals at the target restaurants.
///
/// Each target is matched case-insensitively against the restaurant name,
/// menu title and details of every listing, in document order. The first
/// listing that matches and classifies as available produces the target's
/// record; later listings are not evaluated for that target.
///
/// # Arguments
/// * `html` - Raw HTML of the listings page
/// * `targets` - Restaurant names to look for; order sets scan precedence
/// * `strategy` - Availability layout to detect
/// * `city_id` - City the page was fetched for (diagnostics only)
///
/// # Returns
/// * `Ok(Vec<MealRecord>)` with at most one record per target
/// * `Err(OdiError::ParseError)` if the document cannot be parsed
///
/// # Example
/// ```
/// use odi_core::{check_availability, Strategy};
///
/// let html = r#"<div class="menu-box">
///     <div class="menu-title">Pizza Place</div>
///     <span>Bu menüyü askıdan al 3</span>
/// </div>"#;
///
/// let records = check_availability(html, &["pizza"], Strategy::Counter, "35").unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].suspended_count, Some(3));
/// ```
pub fn check_availability<S: AsRef<str>>(
    html: &str,
    targets: &[S],
    strategy: Strategy,
    city_id: &str,
) -> Result<Vec<MealRecord>> {
    let document = parse_document(html)?;
    let blocks = parse_listings(&document)?;

    let records = assemble(&blocks, targets, strategy, Utc::now());

    tracing::info!(
        city_id,
        %strategy,
        listings = blocks.len(),
        found = records.len(),
        "availability check complete"
    );

    Ok(records)
}

/// Build the result list from already segmented listings.
///
/// All records share `timestamp`, so two calls with the same inputs and
/// timestamp produce identical output.
pub fn assemble<S: AsRef<str>>(
    blocks: &[ListingBlock],
    targets: &[S],
    strategy: Strategy,
    timestamp: DateTime<Utc>,
) -> Vec<MealRecord> {
    let mut records = Vec::new();

    for target in normalize_targets(targets) {
        let matched = blocks
            .iter()
            .filter(|block| block.matches_target(target))
            .find_map(|block| match strategy.classify(block) {
                AvailabilityVerdict::Available { count } => Some((block, count)),
                AvailabilityVerdict::NotAvailable => {
                    tracing::debug!(target, listing = %block.menu_title, "listing not available");
                    None
                }
            });

        if let Some((block, count)) = matched {
            records.push(build_record(block, target, strategy, count, timestamp));
        }
    }

    records
}

/// Trim targets and drop blanks and case-insensitive duplicates, keeping order.
///
/// A blank target would match every listing.
fn normalize_targets<S: AsRef<str>>(targets: &[S]) -> Vec<&str> {
    let mut seen = HashSet::new();
    targets
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect()
}

fn build_record(
    block: &ListingBlock,
    target: &str,
    strategy: Strategy,
    count: Option<u32>,
    timestamp: DateTime<Utc>,
) -> MealRecord {
    let restaurant_name = [block.menu_title.as_str(), block.restaurant_name.as_str(), target]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or(target)
        .to_string();

    MealRecord {
        restaurant_name,
        meal_name: non_empty_or(&block.restaurant_name, strategy.missing_meal_text()),
        location: non_empty_or(&block.details, strategy.missing_location_text()),
        suspended_count: count,
        matched_target: target.to_string(),
        timestamp,
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
