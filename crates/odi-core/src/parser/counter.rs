//! Inline counter phrase detection
//!
//! Earlier site layout: each listing rendered "Bu menüyü askıdan al <N>" where
//! N is the number of suspended meals left.

use crate::types::AvailabilityVerdict;

use super::listing::ListingBlock;

/// "claim this menu from the suspended pool", followed by the count
const COUNTER_PATTERN: &str = r"bu menüyü askıdan al\s*(\d+)";

/// Classify a listing by the number after the claim phrase.
///
/// Zero suspended meals is never reported as available.
pub fn classify(block: &ListingBlock) -> AvailabilityVerdict {
    let count = match extract_counter(&block.spaced_text) {
        Some(count) => count,
        None => return AvailabilityVerdict::NotAvailable,
    };

    tracing::debug!(listing = %block.menu_title, count, "read inline counter");

    if count > 0 {
        AvailabilityVerdict::Available { count: Some(count) }
    } else {
        AvailabilityVerdict::NotAvailable
    }
}

/// Extract the counter from space-preserved listing text.
///
/// Returns `None` when the phrase is absent. Digits that do not fit a `u32`
/// are logged and read as zero.
pub fn extract_counter(text: &str) -> Option<u32> {
    let re = regex_lite::Regex::new(COUNTER_PATTERN).ok()?;
    let lowered = text.to_lowercase();
    let caps = re.captures(&lowered)?;
    let digits = caps.get(1)?.as_str();

    Some(digits.parse().unwrap_or_else(|e| {
        tracing::warn!(digits, error = %e, "could not parse suspended meal counter, using 0");
        0
    }))
}
