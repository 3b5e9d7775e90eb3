//! Price widget counter detection
//!
//! Oldest site layout: the price box of each listing carried a "N askıda"
//! label. The page was served with a mismatched encoding, so the label often
//! reads "N askÄ±da" and both spellings must match.

use scraper::ElementRef;

use crate::types::AvailabilityVerdict;

use super::listing::{flatten_text, ListingBlock};

const PRICE_WIDGET_SELECTOR: &str = "div.menu-price";
const PRICE_TEXT_SELECTOR: &str = "span.price-text";

/// Count followed by "askıda", in its mis-encoded and correct spellings
const SUSPENDED_PATTERN: &str = r"(?i)(\d+)\s*ask(?:Ä±|ı)da";

/// Classify a listing by the counter in its price widget.
///
/// This strategy reports counts rather than gating on them: every listing it
/// sees is `Available`, with a count of zero when the widget is missing.
pub fn classify(block: &ListingBlock) -> AvailabilityVerdict {
    let count = price_text(&block.element)
        .map(|text| extract_suspended_count(&text))
        .unwrap_or_else(|| {
            tracing::debug!(listing = %block.menu_title, "price widget missing, count defaults to 0");
            0
        });

    AvailabilityVerdict::Available { count: Some(count) }
}

fn price_text(listing: &ElementRef) -> Option<String> {
    let widget_selector = scraper::Selector::parse(PRICE_WIDGET_SELECTOR).ok()?;
    let text_selector = scraper::Selector::parse(PRICE_TEXT_SELECTOR).ok()?;

    let widget = listing.select(&widget_selector).next()?;
    let text = widget.select(&text_selector).next()?;
    Some(flatten_text(&text))
}

/// Extract the suspended meal count from a price widget label.
///
/// Labels without a count, or with digits that do not fit a `u32`, read as zero.
pub fn extract_suspended_count(text: &str) -> u32 {
    let re = match regex_lite::Regex::new(SUSPENDED_PATTERN) {
        Ok(re) => re,
        Err(_) => return 0,
    };

    let digits = match re.captures(text).and_then(|caps| caps.get(1)) {
        Some(m) => m.as_str(),
        None => return 0,
    };

    digits.parse().unwrap_or_else(|e| {
        tracing::warn!(digits, error = %e, "could not parse price widget counter, using 0");
        0
    })
}
