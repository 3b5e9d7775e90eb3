//! Free-claim button detection
//!
//! Current site layout: a listing is claimable when it carries an enabled
//! "Askıdan Ücretsiz Al" control and no "out of meals" notice.

use scraper::{ElementRef, Selector};

use crate::types::AvailabilityVerdict;

use super::listing::{flatten_text, ListingBlock};

/// Notices shown when the restaurant has no suspended meals left
const EXHAUSTION_PHRASES: [&str; 2] = ["askıda yemek kalmadı", "askıda yemek yok"];

/// Words that must both appear in the claim control's text
const REQUIRED_WORDS: [&str; 2] = ["askıdan", "ücretsiz"];

/// Words on a claim control that mean it cannot be used
const NEGATIVE_WORDS: [&str; 2] = ["yok", "bitti"];

/// Elements that may act as the claim control
const CANDIDATE_SELECTOR: &str = "button, a, div";

/// Classify a listing by the state of its free-claim button.
pub fn classify(block: &ListingBlock) -> AvailabilityVerdict {
    let text = block.raw_text.to_lowercase();
    if let Some(phrase) = EXHAUSTION_PHRASES.iter().find(|p| text.contains(**p)) {
        tracing::debug!(listing = %block.menu_title, phrase, "listing reports no meals left");
        return AvailabilityVerdict::NotAvailable;
    }

    match find_claim_button(&block.element) {
        Some(button) => {
            tracing::debug!(
                listing = %block.menu_title,
                tag = button.value().name(),
                "found enabled free-claim button"
            );
            AvailabilityVerdict::Available { count: None }
        }
        None => AvailabilityVerdict::NotAvailable,
    }
}

/// Find the first enabled claim control inside a listing.
///
/// Wrappers that contain another claim control are skipped so the label
/// decides which element is inspected, but a disabled enclosing control
/// still switches off everything inside it.
fn find_claim_button<'a>(listing: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(CANDIDATE_SELECTOR).ok()?;

    listing.select(&selector).find(|el| {
        is_claim_control(el)
            && !el.select(&selector).any(|inner| is_claim_control(&inner))
            && !is_disabled(el)
            && !has_disabled_ancestor(el, listing)
    })
}

fn is_claim_control(element: &ElementRef) -> bool {
    let text = flatten_text(element).to_lowercase();
    REQUIRED_WORDS.iter().all(|word| text.contains(word))
}

/// Whether an enclosing control between `element` and the listing is disabled.
fn has_disabled_ancestor(element: &ElementRef, listing: &ElementRef) -> bool {
    element
        .ancestors()
        .take_while(|node| node.id() != listing.id())
        .filter_map(ElementRef::wrap)
        .filter(|ancestor| matches!(ancestor.value().name(), "button" | "a" | "div"))
        .any(|ancestor| is_claim_control(&ancestor) && has_disabled_markup(&ancestor))
}

/// Whether a claim control is switched off by markup or by its label.
fn is_disabled(element: &ElementRef) -> bool {
    if has_disabled_markup(element) {
        return true;
    }

    let text = flatten_text(element).to_lowercase();
    NEGATIVE_WORDS.iter().any(|word| text.contains(word))
}

fn has_disabled_markup(element: &ElementRef) -> bool {
    let value = element.value();

    value.attr("disabled").is_some()
        || value.classes().any(|class| class == "disabled")
        || value
            .attr("onclick")
            .is_some_and(|handler| handler.contains("return false"))
}
