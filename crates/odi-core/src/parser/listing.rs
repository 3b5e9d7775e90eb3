//! Listings page segmenter for getodi.com
//!
//! Splits the student listings page into one `ListingBlock` per restaurant
//! ("menu box") and extracts the text views the classifiers work on.

use scraper::{ElementRef, Html, Selector};

use crate::error::{OdiError, Result};

/// Container of a single restaurant listing
const MENU_BOX_SELECTOR: &str = "div.menu-box";
const RESTAURANT_SELECTOR: &str = "div.menu-restaurant";
const TITLE_SELECTOR: &str = "div.menu-title";
const DETAILS_SELECTOR: &str = "div.menu-details";

/// One restaurant's fragment of the listings page.
///
/// Borrows from the parsed document, so it lives only as long as the check
/// that created it.
#[derive(Debug, Clone)]
pub struct ListingBlock<'a> {
    /// The `div.menu-box` element itself
    pub element: ElementRef<'a>,
    /// Text of `div.menu-restaurant`, empty if missing
    pub restaurant_name: String,
    /// Text of `div.menu-title`, empty if missing
    pub menu_title: String,
    /// Text of `div.menu-details`, empty if missing
    pub details: String,
    /// All text nodes trimmed and concatenated without separators
    pub raw_text: String,
    /// All text nodes joined by single spaces
    pub spaced_text: String,
}

impl<'a> ListingBlock<'a> {
    /// Lower-cased text the target names are matched against.
    pub fn searchable_text(&self) -> String {
        format!("{} {} {}", self.restaurant_name, self.menu_title, self.details).to_lowercase()
    }

    /// Case-insensitive substring match of a target name.
    pub fn matches_target(&self, target: &str) -> bool {
        self.searchable_text().contains(&target.to_lowercase())
    }
}

/// Parse raw HTML into a document.
///
/// html5ever recovers from malformed markup, so the only input rejected here
/// is one with nothing to parse.
///
/// # Errors
/// * `OdiError::ParseError` if the input is empty or whitespace-only
pub fn parse_document(html: &str) -> Result<Html> {
    if html.trim().is_empty() {
        return Err(OdiError::ParseError("empty document".to_string()));
    }
    Ok(Html::parse_document(html))
}

/// Extract all listing blocks from a parsed listings page, in document order.
///
/// A page without any menu boxes yields an empty list.
///
/// # Errors
/// * `OdiError::ParseError` if a selector fails to compile
pub fn parse_listings(document: &Html) -> Result<Vec<ListingBlock<'_>>> {
    let box_selector = compile(MENU_BOX_SELECTOR)?;
    let restaurant_selector = compile(RESTAURANT_SELECTOR)?;
    let title_selector = compile(TITLE_SELECTOR)?;
    let details_selector = compile(DETAILS_SELECTOR)?;

    let blocks = document
        .select(&box_selector)
        .map(|element| ListingBlock {
            element,
            restaurant_name: first_text(&element, &restaurant_selector),
            menu_title: first_text(&element, &title_selector),
            details: first_text(&element, &details_selector),
            raw_text: flatten_text(&element),
            spaced_text: spaced_text(&element),
        })
        .collect();

    Ok(blocks)
}

/// Compile a CSS selector, mapping failures to `ParseError`.
pub(crate) fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| OdiError::ParseError(format!("Invalid selector '{}': {:?}", selector, e)))
}

/// Trimmed text nodes of an element concatenated without separators.
pub(crate) fn flatten_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Text nodes of an element joined by single spaces, whitespace-normalized.
pub(crate) fn spaced_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|el| flatten_text(&el))
        .unwrap_or_default()
}
