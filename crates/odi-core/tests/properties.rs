//! Property tests for the availability engine.

use chrono::Utc;
use proptest::prelude::*;

use odi_core::parser::{parse_document, parse_listings};
use odi_core::Strategy as Layout;
use odi_core::{assemble, check_availability};

fn layouts() -> impl Strategy<Value = Layout> {
    prop_oneof![
        Just(Layout::Button),
        Just(Layout::Counter),
        Just(Layout::PriceWidget),
    ]
}

/// A listing whose availability markup depends on `count`.
fn listing(title: &str, count: u32) -> String {
    format!(
        r#"<div class="menu-box">
            <div class="menu-restaurant">Günün Menüsü</div>
            <div class="menu-title">{title}</div>
            <div class="menu-details">Konak</div>
            <span>Bu menüyü askıdan al {count}</span>
            <div class="menu-price"><span class="price-text">{count} askıda</span></div>
            {button}
        </div>"#,
        title = title,
        count = count,
        button = if count > 0 {
            r#"<a class="btn" href="/claim">Askıdan Ücretsiz Al</a>"#
        } else {
            r#"<button class="btn disabled">Askıdan Ücretsiz Al</button>"#
        },
    )
}

fn page(listings: &[(String, u32)]) -> String {
    let body: String = listings.iter().map(|(t, c)| listing(t, *c)).collect();
    format!("<html><body>{}</body></html>", body)
}

fn titles() -> impl Strategy<Value = Vec<(String, u32)>> {
    prop::collection::vec(("[A-Z][a-z]{2,8} [A-Z][a-z]{2,8}", 0u32..5), 0..6)
}

proptest! {
    #[test]
    fn pages_without_listings_give_no_records(
        text in "[a-zA-Z ]{0,40}",
        strategy in layouts(),
        target in "[a-z]{1,10}",
    ) {
        let html = format!("<html><body><p>{}</p></body></html>", text);
        let records = check_availability(&html, &[target], strategy, "35").unwrap();
        prop_assert!(records.is_empty());
    }

    #[test]
    fn absent_targets_give_no_records(
        listings in titles(),
        strategy in layouts(),
    ) {
        let html = page(&listings);
        // Digits never appear in titles, restaurant names or details.
        let records = check_availability(&html, &["0000"], strategy, "35").unwrap();
        prop_assert!(records.is_empty());
    }

    #[test]
    fn at_most_one_record_per_target(
        listings in titles(),
        strategy in layouts(),
    ) {
        let html = page(&listings);
        let targets: Vec<String> = listings.iter().map(|(t, _)| t.clone()).collect();
        let records = check_availability(&html, &targets, strategy, "35").unwrap();

        let mut seen = std::collections::HashSet::new();
        for record in &records {
            prop_assert!(seen.insert(record.matched_target.to_lowercase()));
        }
    }

    #[test]
    fn repeated_checks_are_identical(
        listings in titles(),
        strategy in layouts(),
    ) {
        let html = page(&listings);
        let document = parse_document(&html).unwrap();
        let blocks = parse_listings(&document).unwrap();
        let targets = ["menüsü", "konak"];
        let now = Utc::now();

        let first = assemble(&blocks, &targets, strategy, now);
        let second = assemble(&blocks, &targets, strategy, now);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn gating_strategies_never_report_zero(listings in titles()) {
        let html = page(&listings);
        let records = check_availability(&html, &["konak"], Layout::Counter, "35").unwrap();
        for record in &records {
            prop_assert!(record.suspended_count.unwrap_or(0) > 0);
        }

        let any_available = listings.iter().any(|(_, c)| *c > 0);
        let records = check_availability(&html, &["konak"], Layout::Button, "35").unwrap();
        prop_assert_eq!(records.len(), usize::from(any_available));
    }

    #[test]
    fn price_widget_reports_first_listing_count(listings in titles()) {
        let html = page(&listings);
        let records = check_availability(&html, &["konak"], Layout::PriceWidget, "35").unwrap();

        match listings.first() {
            Some((_, count)) => {
                prop_assert_eq!(records.len(), 1);
                prop_assert_eq!(records[0].suspended_count, Some(*count));
            }
            None => prop_assert!(records.is_empty()),
        }
    }
}
