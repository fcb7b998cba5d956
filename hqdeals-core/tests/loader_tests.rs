// Tests for the category and offer loaders against a mock deals site

use hqdeals_core::error::CoreError;
use hqdeals_core::{DealsLoader, DealsState, LoadOutcome, create_load_channel};
use hqdeals_fetch::{ClientConfig, DealsClient, FetchError};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Fixtures
// ============================================================================

const MANIFEST: &str = r#"{
    "timestamp": 1718000000000,
    "dir": "2024-06-10",
    "categories": [
        { "value": "electronics", "text": "Elektronik" },
        { "value": "kitchen", "text": "Küche" }
    ]
}"#;

fn offers_json(prefix: &str, count: usize) -> String {
    let offers: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "title": format!("{} offer {}", prefix, i),
                "asin": format!("{}-{}", prefix, i),
                "reviews": { "rating": 4.2, "count": 17 },
                "price": { "current": 75.0, "original": 100.0 },
                "image": format!("https://img.example/{}/{}.jpg", prefix, i),
                "link": { "ref": format!("https://shop.example/{}/{}", prefix, i), "rel": "Amazon" }
            })
        })
        .collect();
    serde_json::to_string(&offers).unwrap()
}

fn loader_for(server: &MockServer) -> DealsLoader {
    let client = DealsClient::new(&ClientConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    })
    .unwrap();
    DealsLoader::new(client)
}

async fn mount_manifest(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/offers/categories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_offers(server: &MockServer, category: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/offers/2024-06-10/{}.json", category)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

// ============================================================================
// Category Loader
// ============================================================================

#[tokio::test]
async fn test_first_category_selected_after_manifest_load() {
    let mock_server = MockServer::start().await;
    mount_manifest(&mock_server, MANIFEST).await;
    mount_offers(&mock_server, "electronics", offers_json("e", 3), 1).await;

    let loader = loader_for(&mock_server);
    let mut state = DealsState::new();

    let ticket = loader.load_categories(&mut state).await.unwrap();
    assert_eq!(state.selected(), Some("electronics"));

    let ticket = ticket.expect("first category needs its offers");
    assert!(loader.load_offers(&mut state, ticket).await.unwrap());
    assert_eq!(state.offers().len(), 3);
    assert!(!state.loading());
}

#[tokio::test]
async fn test_empty_manifest_never_requests_offers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/offers/categories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{ "timestamp": 1, "dir": "2024-06-10", "categories": [] }"#,
        ))
        .expect(2)
        .mount(&mock_server)
        .await;

    // Any offers request would be a failure
    Mock::given(method("GET"))
        .and(path("/offers/2024-06-10/electronics.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let loader = loader_for(&mock_server);
    let mut state = DealsState::new();

    assert!(loader.load_categories(&mut state).await.unwrap().is_none());
    assert!(state.selected().is_none());
    assert!(!state.loading());

    let result = loader.load_page(&mut DealsState::new(), None).await;
    assert!(matches!(result, Err(CoreError::NoCategories)));
}

#[tokio::test]
async fn test_manifest_failure_keeps_initial_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/offers/categories.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let loader = loader_for(&mock_server);
    let mut state = DealsState::new();

    let result = loader.load_categories(&mut state).await;
    assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
    assert!(!state.loading());
    assert!(state.manifest().categories.is_empty());
    assert_eq!(state.manifest().timestamp, 0);
}

// ============================================================================
// Offer Loader
// ============================================================================

#[tokio::test]
async fn test_switching_category_fetches_once() {
    let mock_server = MockServer::start().await;
    mount_manifest(&mock_server, MANIFEST).await;
    mount_offers(&mock_server, "electronics", offers_json("e", 2), 1).await;
    mount_offers(&mock_server, "kitchen", offers_json("k", 4), 1).await;

    let loader = loader_for(&mock_server);
    let mut state = DealsState::new();

    let first = loader.load_categories(&mut state).await.unwrap().unwrap();
    loader.load_offers(&mut state, first).await.unwrap();

    let next = state.select_category("kitchen").unwrap().unwrap();
    assert!(loader.load_offers(&mut state, next).await.unwrap());
    assert_eq!(state.offers().len(), 4);
    assert_eq!(state.offers()[0].asin, "k-0");

    // Same value again is a no-op
    assert!(state.select_category("kitchen").unwrap().is_none());
}

#[tokio::test]
async fn test_offers_failure_empties_list() {
    let mock_server = MockServer::start().await;
    mount_manifest(&mock_server, MANIFEST).await;
    mount_offers(&mock_server, "electronics", offers_json("e", 2), 1).await;

    Mock::given(method("GET"))
        .and(path("/offers/2024-06-10/kitchen.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let loader = loader_for(&mock_server);
    let mut state = DealsState::new();

    let first = loader.load_categories(&mut state).await.unwrap().unwrap();
    loader.load_offers(&mut state, first).await.unwrap();
    assert_eq!(state.offers().len(), 2);

    let next = state.select_category("kitchen").unwrap().unwrap();
    let result = loader.load_offers(&mut state, next).await;
    assert!(matches!(result, Err(FetchError::Malformed { .. })));
    assert!(state.offers().is_empty());
    assert!(!state.loading());
}

#[tokio::test]
async fn test_slow_superseded_response_is_discarded() {
    let mock_server = MockServer::start().await;
    mount_manifest(&mock_server, MANIFEST).await;

    Mock::given(method("GET"))
        .and(path("/offers/2024-06-10/electronics.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(offers_json("e", 5))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;
    mount_offers(&mock_server, "kitchen", offers_json("k", 1), 1).await;

    let loader = loader_for(&mock_server);
    let mut state = DealsState::new();
    let (tx, mut rx) = create_load_channel();

    let first = loader.load_categories(&mut state).await.unwrap().unwrap();
    loader.spawn_offers(first, tx.clone());

    let next = state.select_category("kitchen").unwrap().unwrap();
    loader.spawn_offers(next, tx.clone());
    drop(tx);

    let mut arrivals = Vec::new();
    while let Some(event) = rx.recv().await {
        if let LoadOutcome::Offers { ticket, applied } = event.apply(&mut state) {
            arrivals.push((ticket.category, applied));
        }
    }

    assert_eq!(
        arrivals,
        vec![("kitchen".to_string(), true), ("electronics".to_string(), false)]
    );
    assert_eq!(state.offers().len(), 1);
    assert_eq!(state.offers()[0].asin, "k-0");
    assert!(!state.loading());
}

#[tokio::test]
async fn test_spawned_manifest_reports_through_channel() {
    let mock_server = MockServer::start().await;
    mount_manifest(&mock_server, MANIFEST).await;

    let loader = loader_for(&mock_server);
    let mut state = DealsState::new();
    let (tx, mut rx) = create_load_channel();

    loader.spawn_manifest(tx).await.unwrap();
    let event = rx.recv().await.expect("manifest event");
    let LoadOutcome::Manifest(Some(ticket)) = event.apply(&mut state) else {
        panic!("manifest should request the first category");
    };

    assert_eq!(ticket.category, "electronics");
    assert!(state.is_current(&ticket));
    assert_eq!(state.manifest().categories.len(), 2);
}

// ============================================================================
// Page loading
// ============================================================================

#[tokio::test]
async fn test_load_page_fetches_only_requested_category() {
    let mock_server = MockServer::start().await;
    mount_manifest(&mock_server, MANIFEST).await;
    mount_offers(&mock_server, "electronics", offers_json("e", 2), 0).await;
    mount_offers(&mock_server, "kitchen", offers_json("k", 3), 1).await;

    let loader = loader_for(&mock_server);
    let mut state = DealsState::new();

    loader.load_page(&mut state, Some("kitchen")).await.unwrap();
    assert_eq!(state.selected(), Some("kitchen"));
    assert_eq!(state.offers().len(), 3);
}

#[tokio::test]
async fn test_load_page_unknown_category() {
    let mock_server = MockServer::start().await;
    mount_manifest(&mock_server, MANIFEST).await;

    let loader = loader_for(&mock_server);
    let mut state = DealsState::new();

    let result = loader.load_page(&mut state, Some("garden")).await;
    assert!(matches!(result, Err(CoreError::UnknownCategory(v)) if v == "garden"));
}

#[tokio::test]
async fn test_load_page_reports_offer_failure() {
    let mock_server = MockServer::start().await;
    mount_manifest(&mock_server, MANIFEST).await;

    Mock::given(method("GET"))
        .and(path("/offers/2024-06-10/electronics.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let loader = loader_for(&mock_server);
    let mut state = DealsState::new();

    let result = loader.load_page(&mut state, None).await;
    assert!(matches!(result, Err(CoreError::Fetch(_))));
    assert!(state.offers().is_empty());
    assert!(!state.loading());
}
