//! Integration tests for `OdiClient` and `MealFinder` against a local mock site.
//!
//! Uses `wiremock` so no real network traffic is made.

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use odi_core::{ClientConfig, Credentials, MealFinder, OdiClient, OdiError, Strategy};

fn test_client(server: &MockServer, max_retries: u32) -> OdiClient {
    OdiClient::with_config(ClientConfig {
        base_url: server.uri(),
        requests_per_second: 100.0,
        timeout_secs: 5,
        max_retries,
        retry_delay_ms: 1,
    })
    .expect("failed to build test OdiClient")
}

fn credentials() -> Credentials {
    Credentials::new("ogrenci", "parola")
}

const LISTINGS_PAGE: &str = r#"
<html><body>
    <div class="menu-box">
        <div class="menu-restaurant">Margherita Menü</div>
        <div class="menu-title">Pizza Place</div>
        <div class="menu-details">Bornova</div>
        <a class="btn" href="/claim/1">Askıdan Ücretsiz Al</a>
    </div>
    <div class="menu-box">
        <div class="menu-title">Cafe X</div>
        <button class="btn disabled">Askıdan Ücretsiz Al</button>
    </div>
</body></html>
"#;

#[tokio::test]
async fn login_succeeds_when_redirected_away_from_sign_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sign-in/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/student/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/student/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hoş geldin"))
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    client.login(&credentials()).await.expect("login should succeed");
}

#[tokio::test]
async fn login_fails_when_200_lands_on_sign_in_page() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sign-in/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<form>giriş</form>"))
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    let result = client.login(&credentials()).await;
    assert!(matches!(result, Err(OdiError::AuthFailed(_))), "got {:?}", result);
}

#[tokio::test]
async fn login_fails_on_wrong_credentials_marker() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sign-in/"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "/login/?wrong_credentials=1"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    let result = client.login(&credentials()).await;
    assert!(matches!(result, Err(OdiError::AuthFailed(_))), "got {:?}", result);
}

#[tokio::test]
async fn login_fails_on_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sign-in/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    match client.login(&credentials()).await {
        Err(OdiError::AuthFailed(msg)) => assert!(msg.contains("500")),
        other => panic!("Expected AuthFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn session_cookie_is_sent_with_listing_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sign-in/"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/student/")
                .insert_header("Set-Cookie", "sessionid=abc123; Path=/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/student/"))
        .and(query_param("city", "35"))
        .and(header("cookie", "sessionid=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTINGS_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/student/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    client.login(&credentials()).await.unwrap();

    let body = client.fetch_listings("35").await.unwrap();
    assert!(body.contains("menu-box"));
}

#[tokio::test]
async fn check_reports_available_meals() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/student/"))
        .and(query_param("city", "35"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTINGS_PAGE))
        .mount(&server)
        .await;

    let finder = MealFinder::with_client(test_client(&server, 0));
    let records = finder
        .check("35", &["Pizza Place", "Cafe X", "Burger Town"], Strategy::Button)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].restaurant_name, "Pizza Place");
    assert_eq!(records[0].meal_name, "Margherita Menü");
    assert_eq!(records[0].location, "Bornova");
}

#[tokio::test]
async fn check_surfaces_non_success_status_as_fetch_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/student/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let finder = MealFinder::with_client(test_client(&server, 0));
    match finder.check("35", &["Pizza Place"], Strategy::Button).await {
        Err(OdiError::FetchFailed { status, url }) => {
            assert_eq!(status, 404);
            assert!(url.contains("city=35"));
        }
        other => panic!("Expected FetchFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn check_rejects_empty_body_as_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/student/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("   "))
        .mount(&server)
        .await;

    let finder = MealFinder::with_client(test_client(&server, 0));
    let result = finder.check("35", &["Pizza Place"], Strategy::Button).await;
    assert!(matches!(result, Err(OdiError::ParseError(_))), "got {:?}", result);
}

#[tokio::test]
async fn fetch_retries_transient_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/student/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/student/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTINGS_PAGE))
        .mount(&server)
        .await;

    let client = test_client(&server, 3);
    let body = client.fetch_listings("35").await.unwrap();
    assert!(body.contains("Pizza Place"));
}

#[tokio::test]
async fn fetch_gives_up_after_max_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/student/"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server, 1);
    match client.fetch_listings("35").await {
        Err(OdiError::FetchFailed { status, .. }) => assert_eq!(status, 429),
        other => panic!("Expected FetchFailed, got {:?}", other),
    }
}
