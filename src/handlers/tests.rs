// Handler tests: the login page and session summary through actix
use super::{configure_services, page_data, SessionSummary};
use crate::testing::constants::{TEST_CLIENT_ID, TEST_SUBJECT};
use crate::testing::{MockTokenClient, TestFixtures};
use crate::flow::LoginPage;
use actix_web::http::StatusCode;
use actix_web::{test, App};

macro_rules! init_app {
    ($page:expr) => {{
        let page: LoginPage = $page;
        let callback_path = page.config().callback_path();
        test::init_service(
            App::new()
                .app_data(page_data(page))
                .configure(|cfg| configure_services(cfg, &callback_path)),
        )
        .await
    }};
}

fn location(response: &actix_web::dev::ServiceResponse) -> String {
    response
        .headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn test_code_completes_login_and_redirects_to_root() {
    let client = MockTokenClient::success(TestFixtures::token_bundle(TEST_SUBJECT));
    let (page, store) = TestFixtures::login_page(client.clone());
    let app = init_app!(page);

    let req = test::TestRequest::get().uri("/login?code=abc123").to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    assert_eq!(client.requests().len(), 1);
    assert_eq!(client.requests()[0].code, "abc123");
    assert_eq!(store.entries().len(), 4);
}

#[actix_web::test]
async fn test_provider_and_go_redirects_to_identity_provider() {
    let client = MockTokenClient::pending();
    let (page, store) = TestFixtures::login_page(client.clone());
    let app = init_app!(page);

    let req = test::TestRequest::get()
        .uri("/login?provider=okta&go=1")
        .to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    let target = location(&response);
    assert!(target.starts_with("https://auth.example.com/oauth2/authorize?"));
    assert!(target.contains("identity_provider=okta"));
    assert!(client.requests().is_empty());
    assert!(store.entries().is_empty());
}

#[actix_web::test]
async fn test_bare_visit_renders_sign_in_button() {
    let (page, _store) = TestFixtures::login_page(MockTokenClient::pending());
    let app = init_app!(page);

    let req = test::TestRequest::get().uri("/login").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = String::from_utf8(body.to_vec()).unwrap();

    assert!(body.contains("/login?provider=okta&amp;go=1"));
    assert!(body.contains("Sign in with Okta"));
    // Nothing to strip on a bare visit
    assert!(!body.contains("history.replaceState"));
}

#[actix_web::test]
async fn test_unrecognised_query_is_stripped_in_page() {
    let (page, _store) = TestFixtures::login_page(MockTokenClient::pending());
    let app = init_app!(page);

    let req = test::TestRequest::get().uri("/login?utm_source=mail").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = String::from_utf8(body.to_vec()).unwrap();

    assert!(body.contains("history.replaceState"));
}

#[actix_web::test]
async fn test_no_provider_renders_unknown_provider_error() {
    let (page, _store) = TestFixtures::login_page_with(
        TestFixtures::login_config_without_provider(),
        MockTokenClient::pending(),
    );
    let app = init_app!(page);

    let req = test::TestRequest::get().uri("/login").to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = test::read_body(response).await;
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("Unknown identity provider"));
}

#[actix_web::test]
async fn test_rejected_code_renders_failure_without_session() {
    let client = MockTokenClient::status(400, r#"{"error":"invalid_grant"}"#);
    let (page, store) = TestFixtures::login_page(client);
    let app = init_app!(page);

    let req = test::TestRequest::get().uri("/login?code=spent").to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(store.entries().is_empty());
}

#[actix_web::test]
async fn test_disconnect_mid_exchange_stores_nothing() {
    let client = MockTokenClient::pending();
    let (page, store) = TestFixtures::login_page(client.clone());
    let app = init_app!(page);

    let req = test::TestRequest::get().uri("/login?code=abc123").to_request();
    // Dropping the in-flight request is how actix reports a disconnect
    tokio::select! {
        biased;
        _ = test::call_service(&app, req) => panic!("exchange should still be pending"),
        () = tokio::task::yield_now() => {}
    }

    assert_eq!(client.requests().len(), 1);
    assert!(store.entries().is_empty());
}

#[actix_web::test]
async fn test_session_summary_before_and_after_login() {
    let client = MockTokenClient::success(TestFixtures::token_bundle(TEST_SUBJECT));
    let (page, _store) = TestFixtures::login_page(client);
    let app = init_app!(page);

    let req = test::TestRequest::get().uri("/auth/session").to_request();
    let summary: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["authenticated"], false);
    assert_eq!(summary["client_id"], TEST_CLIENT_ID);

    let req = test::TestRequest::get().uri("/login?code=abc123").to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/auth/session").to_request();
    let summary: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["authenticated"], true);
    assert_eq!(summary["subject"], TEST_SUBJECT);
    assert_eq!(summary["has_refresh_token"], true);
    assert_eq!(summary["access_token_expires_at"], "2030-01-01T00:00:00Z");
    // Tokens never leave the store through this endpoint
    assert!(!summary.to_string().contains("refresh-"));
}

#[actix_web::test]
async fn test_health() {
    let (page, _store) = TestFixtures::login_page(MockTokenClient::pending());
    let app = init_app!(page);

    let req = test::TestRequest::get().uri("/ping").to_request();
    let response = test::call_service(&app, req).await;
    assert!(response.status().is_success());
}

#[::core::prelude::v1::test]
fn test_summary_serialises_without_tokens() {
    let summary = SessionSummary {
        authenticated: false,
        client_id: "app".to_string(),
        subject: None,
        has_refresh_token: false,
        access_token_expires_at: None,
    };
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["access_token_expires_at"], serde_json::Value::Null);
}
