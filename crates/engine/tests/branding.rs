//! Integration tests for the theme/branding pass.
//!
//! Covers the "refresh" short-circuit, the install-and-poll path, and the
//! N-of-M settings report, all against a wiremock Shopify.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storeforge_engine::provision::{BrandingOptions, WorkflowOptions};
use storeforge_engine::{AdminRestClient, Provisioner, StoreCredentials};

const API_VERSION: &str = "2024-10";

fn api_path(rest: &str) -> String {
    format!("/admin/api/{API_VERSION}/{rest}")
}

fn test_provisioner(server: &MockServer) -> Provisioner {
    let credentials = StoreCredentials {
        shop_url: server.uri(),
        access_token: SecretString::from("shpat_test_token"),
    };
    let client =
        AdminRestClient::new(&credentials, API_VERSION).expect("failed to build test client");
    Provisioner::new(client, WorkflowOptions::immediate())
}

fn branding_options() -> BrandingOptions {
    BrandingOptions {
        brand_color: "#2563eb".to_string(),
        shop_name: Some("Pawsome Supplies".to_string()),
        shop_email: Some("hello@pawsome.example".to_string()),
        theme_zip_url: Some("https://storage.example/signed/refresh.zip?token=t".to_string()),
    }
}

fn settings_asset_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "asset": {
            "key": "config/settings_data.json",
            "value": "{\"current\": {\"colors_accent_1\": \"#000000\"}}"
        }
    }))
}

// ---------------------------------------------------------------------------
// Existing "refresh" theme short-circuits the install
// ---------------------------------------------------------------------------

#[tokio::test]
async fn existing_refresh_theme_skips_install_and_brands_it() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("themes.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "themes": [
                {"id": 100, "name": "Dawn", "role": "main"},
                {"id": 200, "name": "Summer REFRESH 2.0", "role": "unpublished"}
            ]
        })))
        .mount(&server)
        .await;

    // No install may happen.
    Mock::given(method("POST"))
        .and(path(api_path("themes.json")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    // The matched theme gets published, the other deleted.
    Mock::given(method("PUT"))
        .and(path(api_path("themes/200.json")))
        .and(body_string_contains("main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "theme": {"id": 200, "name": "Summer REFRESH 2.0", "role": "main"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("themes/100.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    // Brand stylesheet, settings read + write, shop metadata.
    Mock::given(method("PUT"))
        .and(path(api_path("themes/200/assets.json")))
        .and(body_string_contains("storeforge-brand.css"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "asset": {"key": "assets/storeforge-brand.css"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("themes/200/assets.json")))
        .and(query_param("asset[key]", "config/settings_data.json"))
        .respond_with(settings_asset_response())
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("themes/200/assets.json")))
        .and(body_string_contains("settings_data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "asset": {"key": "config/settings_data.json"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("shop.json")))
        .and(body_string_contains("Pawsome Supplies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"shop": {"id": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let provisioner = test_provisioner(&server);
    let report = provisioner.apply_branding(&branding_options()).await;

    assert!(report.theme_already_installed, "install must be skipped");
    assert_eq!(report.settings_applied, report.settings_total);
    assert!(report.settings_total >= 20, "dozens of named settings");
}

// ---------------------------------------------------------------------------
// Install path: upload ZIP, poll processing, publish
// ---------------------------------------------------------------------------

#[tokio::test]
async fn install_polls_processing_then_publishes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("themes.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "themes": [{"id": 100, "name": "Dawn", "role": "main"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("themes.json")))
        .and(body_string_contains("refresh.zip"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "theme": {"id": 300, "name": "StoreForge Refresh", "role": "unpublished", "processing": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    // First poll still processing, second poll done.
    Mock::given(method("GET"))
        .and(path(api_path("themes/300.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "theme": {"id": 300, "name": "StoreForge Refresh", "role": "unpublished", "processing": true}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("themes/300.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "theme": {"id": 300, "name": "StoreForge Refresh", "role": "unpublished", "processing": false}
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(api_path("themes/300.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "theme": {"id": 300, "name": "StoreForge Refresh", "role": "main"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("themes/100.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(api_path("themes/300/assets.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "asset": {"key": "assets/storeforge-brand.css"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("themes/300/assets.json")))
        .respond_with(settings_asset_response())
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("shop.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"shop": {"id": 1}})))
        .mount(&server)
        .await;

    let provisioner = test_provisioner(&server);
    let report = provisioner.apply_branding(&branding_options()).await;

    assert!(!report.theme_already_installed);
    assert_eq!(report.settings_applied, report.settings_total);
}

// ---------------------------------------------------------------------------
// Settings save failure reports zero applied, pass still completes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_settings_save_reports_zero_applied() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("themes.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "themes": [{"id": 400, "name": "Refresh", "role": "main"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("themes/400/assets.json")))
        .respond_with(settings_asset_response())
        .mount(&server)
        .await;
    // Every asset write is rejected (404s are not retried).
    Mock::given(method("PUT"))
        .and(path(api_path("themes/400/assets.json")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": "Not Found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("shop.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"shop": {"id": 1}})))
        .mount(&server)
        .await;

    let provisioner = test_provisioner(&server);
    let report = provisioner.apply_branding(&branding_options()).await;

    assert!(report.theme_already_installed);
    assert_eq!(report.settings_applied, 0);
    assert!(report.settings_total > 0);
}

// ---------------------------------------------------------------------------
// Theme listing failure aborts the pass quietly
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_theme_api_yields_empty_report() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("themes.json")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": "[API] Invalid API key or access token"
        })))
        .mount(&server)
        .await;

    let provisioner = test_provisioner(&server);
    let report = provisioner.apply_branding(&branding_options()).await;

    assert_eq!(report.settings_applied, 0);
    assert!(!report.theme_already_installed);
}
