// Tests for page rendering in every report format

use hqdeals_core::page::{self, PageView};
use hqdeals_core::report::{
    ReportFormat, generate_html_report, generate_json_report, generate_markdown_report,
    generate_report, generate_text_report, save_report,
};
use hqdeals_core::{DealsState, OfferTicket};
use hqdeals_fetch::{Category, CategoryManifest, Offer};
use scraper::{Html, Selector};

// ============================================================================
// Fixtures
// ============================================================================

fn manifest() -> CategoryManifest {
    CategoryManifest {
        timestamp: 1_718_000_000_000,
        directory: "2024-06-10".to_string(),
        categories: vec![
            Category {
                value: "electronics".to_string(),
                label: "Elektronik".to_string(),
            },
            Category {
                value: "kitchen".to_string(),
                label: "Küche".to_string(),
            },
        ],
    }
}

fn offer(asin: &str, title: &str, rating: f64, current: f64, original: f64) -> Offer {
    serde_json::from_value(serde_json::json!({
        "title": title,
        "asin": asin,
        "reviews": { "rating": rating, "count": 42 },
        "price": { "current": current, "original": original },
        "image": format!("https://img.example/{}.jpg", asin),
        "link": { "ref": format!("https://shop.example/dp/{}", asin), "rel": "Amazon" }
    }))
    .unwrap()
}

fn loaded_state() -> DealsState {
    let mut state = DealsState::new();
    let ticket: OfferTicket = state.apply_manifest(Ok(manifest())).unwrap();
    state.apply_offers(
        &ticket,
        Ok(vec![
            offer("B001", "Kopfhörer <Pro>", 3.6, 75.0, 100.0),
            offer("B002", "Wasserkocher", 4.5, 50.0, 50.0),
        ]),
    );
    state
}

fn view(state: &DealsState) -> PageView {
    PageView::from_state(state, "https://hqdeals.github.io/")
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("html"), Some(ReportFormat::Html));
    assert_eq!(ReportFormat::from_str("json"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("markdown"), Some(ReportFormat::Markdown));
    assert_eq!(ReportFormat::from_str("md"), Some(ReportFormat::Markdown));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert_eq!(ReportFormat::from_str("HTML"), Some(ReportFormat::Html));
    assert_eq!(ReportFormat::from_str("Json"), Some(ReportFormat::Json));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert!(ReportFormat::from_str("pdf").is_none());
    assert!(ReportFormat::from_str("").is_none());
}

// ============================================================================
// Page View Tests
// ============================================================================

#[test]
fn test_page_view_marks_selected_category() {
    let state = loaded_state();
    let view = view(&state);

    assert_eq!(view.categories.len(), 2);
    assert!(view.categories[0].selected);
    assert!(!view.categories[1].selected);
    assert_eq!(view.selected_label(), Some("Elektronik"));
    assert_eq!(view.offers.len(), 2);
    assert!(!view.loading);
}

// ============================================================================
// HTML Report Tests
// ============================================================================

#[test]
fn test_html_report_renders_offer_cards() {
    let state = loaded_state();
    let html = generate_html_report(&view(&state)).unwrap();
    let document = Html::parse_document(&html);

    let cards = Selector::parse(".offer-card").unwrap();
    assert_eq!(document.select(&cards).count(), 2);

    let discounts: Vec<String> = document
        .select(&Selector::parse(".discount").unwrap())
        .map(|e| e.text().collect())
        .collect();
    assert_eq!(discounts, vec!["-25%", "-0%"]);

    let first_card = document.select(&cards).next().unwrap();
    let filled = Selector::parse(".star.filled").unwrap();
    let all_stars = Selector::parse(".star").unwrap();
    assert_eq!(first_card.select(&filled).count(), 4);
    assert_eq!(first_card.select(&all_stars).count(), 5);

    let button = Selector::parse("a.offer-button").unwrap();
    let link = first_card.select(&button).next().unwrap();
    assert_eq!(link.value().attr("href"), Some("https://shop.example/dp/B001"));
    assert_eq!(link.value().attr("rel"), Some("noopener noreferrer"));
    assert_eq!(link.text().collect::<String>(), "Auf Amazon ansehen");
}

#[test]
fn test_html_report_escapes_titles() {
    let state = loaded_state();
    let html = generate_html_report(&view(&state)).unwrap();

    assert!(!html.contains("<Pro>"));
    let document = Html::parse_document(&html);
    let title = document
        .select(&Selector::parse(".offer-content h3").unwrap())
        .next()
        .unwrap();
    assert_eq!(title.text().collect::<String>(), "Kopfhörer <Pro>");
}

#[test]
fn test_html_report_selector_and_description() {
    let state = loaded_state();
    let html = generate_html_report(&view(&state)).unwrap();
    let document = Html::parse_document(&html);

    let options: Vec<_> = document
        .select(&Selector::parse("#category option").unwrap())
        .collect();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].value().attr("value"), Some("electronics"));
    assert!(options[0].value().attr("selected").is_some());
    assert!(options[1].value().attr("selected").is_none());

    let updated = document
        .select(&Selector::parse(".last-updated").unwrap())
        .next()
        .unwrap()
        .text()
        .collect::<String>();
    assert!(updated.starts_with(page::LAST_UPDATED));
    assert!(updated.contains("2024"));
}

#[test]
fn test_html_report_while_loading() {
    let mut state = loaded_state();
    state.select_category("kitchen").unwrap();
    let html = generate_html_report(&view(&state)).unwrap();
    let document = Html::parse_document(&html);

    assert_eq!(
        document
            .select(&Selector::parse(".offer-card").unwrap())
            .count(),
        0
    );
    assert!(html.contains(page::LOADING));
}

// ============================================================================
// Text / Markdown / JSON Report Tests
// ============================================================================

#[test]
fn test_text_report_contents() {
    let state = loaded_state();
    let report = generate_text_report(&view(&state));

    assert!(report.contains(page::DESCRIPTION));
    assert!(report.contains("▸ Elektronik (electronics)"));
    assert!(report.contains("Elektronik (2)"));
    assert!(report.contains("[1] Kopfhörer <Pro>"));
    assert!(report.contains("€75.00  statt €100.00  -25%"));
    assert!(report.contains("★★★★☆ 3.6 (42)"));
    assert!(report.contains("Auf Amazon ansehen: https://shop.example/dp/B001"));
    assert!(!report.contains(page::LOADING));
}

#[test]
fn test_text_report_while_loading() {
    let state = DealsState::new();
    let report = generate_text_report(&view(&state));
    assert!(report.contains(page::LOADING));
    assert!(!report.contains("[1]"));
}

#[test]
fn test_markdown_report_table() {
    let state = loaded_state();
    let report = generate_markdown_report(&view(&state));

    assert!(report.starts_with("# [HQ Deals](https://hqdeals.github.io/)"));
    assert!(report.contains("**Elektronik** · Küche"));
    assert!(report.contains("| Kopfhörer <Pro> | €75.00 | ~~€100.00~~ | -25% |"));
    assert!(report.contains("[Auf Amazon ansehen](https://shop.example/dp/B001)"));
}

#[test]
fn test_json_report_structure() {
    let state = loaded_state();
    let json = generate_json_report(&view(&state)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let report = &value["report"];
    assert_eq!(report["metadata"]["generator"], "hqdeals");
    assert_eq!(report["manifest"]["directory"], "2024-06-10");
    assert_eq!(report["manifest"]["timestamp"], 1_718_000_000_000i64);
    assert_eq!(report["selected"], "electronics");
    assert_eq!(report["total_offers"], 2);
    assert_eq!(report["offers"][0]["discount"], "-25%");
    assert_eq!(report["offers"][0]["discount_percent"], 25);
    assert_eq!(report["offers"][0]["stars_filled"], 4);
    assert_eq!(report["offers"][1]["discount"], "-0%");
}

#[test]
fn test_generate_report_dispatch() {
    let state = loaded_state();
    let view = view(&state);

    for format in [
        ReportFormat::Text,
        ReportFormat::Html,
        ReportFormat::Json,
        ReportFormat::Markdown,
    ] {
        let report = generate_report(&view, format).unwrap();
        assert!(report.contains("Kopfh"), "{:?} report is missing offers", format);
    }
}

#[test]
fn test_save_report_writes_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("deals.html");

    save_report("<html></html>", &path)?;
    assert_eq!(std::fs::read_to_string(&path)?, "<html></html>");
    Ok(())
}
