//! Integration tests for the product upload workflow.
//!
//! Uses `wiremock` to stand up a local Shopify Admin API for each test so no
//! real network traffic is made. Tests are grouped by scenario: the happy
//! path, per-step degradation, the emergency image guarantee, and rate-limit
//! handling.

use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storeforge_core::{ContentSource, GeneratedProduct, Niche, UploadStatus, VariantSpec};
use storeforge_engine::provision::WorkflowOptions;
use storeforge_engine::{AdminRestClient, Provisioner, StoreCredentials};

const API_VERSION: &str = "2024-10";
const TEST_TOKEN: &str = "shpat_test_token";

fn api_path(rest: &str) -> String {
    format!("/admin/api/{API_VERSION}/{rest}")
}

/// Provisioner pointed at the mock server, all delays zeroed.
fn test_provisioner(server: &MockServer) -> Provisioner {
    let credentials = StoreCredentials {
        shop_url: server.uri(),
        access_token: SecretString::from(TEST_TOKEN),
    };
    let client =
        AdminRestClient::new(&credentials, API_VERSION).expect("failed to build test client");
    Provisioner::new(client, WorkflowOptions::immediate())
}

/// A pets product with three variants and eight allow-listed images.
fn pets_product(title: &str) -> GeneratedProduct {
    let price = Decimal::new(2495, 2);
    GeneratedProduct {
        title: title.to_string(),
        description: "<p>Comfort for every nap.</p>".to_string(),
        price,
        features: vec!["Vet approved".to_string()],
        images: (0..8)
            .map(|i| format!("https://images.unsplash.com/photo-test-{i}?w=800&q=80"))
            .collect(),
        variants: vec![
            VariantSpec {
                title: "Standard".to_string(),
                price,
                sku: "SF-PETS-00-1".to_string(),
            },
            VariantSpec {
                title: "Premium".to_string(),
                price: Decimal::new(2795, 2),
                sku: "SF-PETS-00-2".to_string(),
            },
            VariantSpec {
                title: "Deluxe".to_string(),
                price: Decimal::new(3095, 2),
                sku: "SF-PETS-00-3".to_string(),
            },
        ],
        source: ContentSource::Template,
    }
}

fn product_created_response(id: u64, default_variant_id: u64) -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({
        "product": {
            "id": id,
            "title": "Created",
            "handle": "created-1",
            "status": "active",
            "variants": [{
                "id": default_variant_id,
                "title": "Default Title",
                "price": "0.00"
            }],
            "images": []
        }
    }))
}

fn variant_response(id: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "variant": {"id": id, "title": "Standard", "price": "24.95", "sku": "SF-PETS-00-1"}
    }))
}

fn image_response(id: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "image": {"id": id, "src": "https://images.unsplash.com/photo-test?w=800", "position": 1}
    }))
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_product_runs_all_steps_and_reports_full_counts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path("products.json")))
        .and(header("X-Shopify-Access-Token", TEST_TOKEN))
        .respond_with(product_created_response(42, 900))
        .expect(1)
        .mount(&server)
        .await;

    // Default variant re-price.
    Mock::given(method("PUT"))
        .and(path(api_path("variants/900.json")))
        .and(body_string_contains("\"compare_at_price\":\"32.44\""))
        .respond_with(variant_response(900))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("products/42/images.json")))
        .respond_with(image_response(1))
        .expect(8)
        .mount(&server)
        .await;

    // Option declaration, default-variant delete, three variant creates.
    Mock::given(method("PUT"))
        .and(path(api_path("products/42.json")))
        .and(body_string_contains("Style"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"product": {
            "id": 42, "title": "Created", "handle": "created-1"
        }})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(api_path("products/42/variants/900.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("products/42/variants.json")))
        .respond_with(variant_response(901))
        .expect(3)
        .mount(&server)
        .await;

    let provisioner = test_provisioner(&server);
    let result = provisioner
        .upload_product(&Niche::new("pets"), &pets_product("Cozy Pet Bed"))
        .await;

    assert_eq!(result.status, UploadStatus::Success);
    assert_eq!(result.product_id, Some(42));
    assert_eq!(result.images_uploaded, 8);
    assert_eq!(result.variants_created, 3);
    assert!(result.error.is_none());
}

// ---------------------------------------------------------------------------
// Create failure is fatal for the product, not the batch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_create_reports_failure_and_batch_continues() {
    let server = MockServer::start().await;

    // First product's create is rejected, second succeeds.
    Mock::given(method("POST"))
        .and(path(api_path("products.json")))
        .and(body_string_contains("Doomed Widget"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": {"title": ["is invalid"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("products.json")))
        .and(body_string_contains("Healthy Widget"))
        .respond_with(product_created_response(7, 70))
        .expect(1)
        .mount(&server)
        .await;

    // Remaining steps for the surviving product.
    Mock::given(method("PUT"))
        .and(path(api_path("variants/70.json")))
        .respond_with(variant_response(70))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("products/7/images.json")))
        .respond_with(image_response(2))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("products/7.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"product": {
            "id": 7, "title": "Healthy Widget", "handle": "healthy-widget-1"
        }})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("products/7/variants/70.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("products/7/variants.json")))
        .respond_with(variant_response(71))
        .mount(&server)
        .await;

    let provisioner = test_provisioner(&server);
    let products = vec![pets_product("Doomed Widget"), pets_product("Healthy Widget")];
    let report = provisioner
        .upload_catalog(&Niche::new("pets"), &products)
        .await;

    assert_eq!(report.results.len(), 2, "a failed product must not stop the batch");
    assert_eq!(report.results[0].status, UploadStatus::Failed);
    assert!(report.results[0].error.as_deref().is_some_and(|e| e.contains("422")));
    assert_eq!(report.results[1].status, UploadStatus::Success);
    assert_eq!(report.products_added(), 1);
}

// ---------------------------------------------------------------------------
// Degraded steps keep the product SUCCESS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_variant_pricing_is_non_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path("products.json")))
        .respond_with(product_created_response(11, 110))
        .mount(&server)
        .await;

    // Re-pricing the default variant blows up.
    Mock::given(method("PUT"))
        .and(path(api_path("variants/110.json")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("products/11/images.json")))
        .respond_with(image_response(3))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("products/11.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"product": {
            "id": 11, "title": "X", "handle": "x-1"
        }})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("products/11/variants/110.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("products/11/variants.json")))
        .respond_with(variant_response(111))
        .mount(&server)
        .await;

    let provisioner = test_provisioner(&server);
    let result = provisioner
        .upload_product(&Niche::new("pets"), &pets_product("Sturdy Bed"))
        .await;

    assert_eq!(result.status, UploadStatus::Success, "pricing failure must degrade, not fail");
    assert_eq!(result.images_uploaded, 8);
}

#[tokio::test]
async fn partial_variant_failures_lower_the_count_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path("products.json")))
        .respond_with(product_created_response(12, 120))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("variants/120.json")))
        .respond_with(variant_response(120))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("products/12/images.json")))
        .respond_with(image_response(4))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("products/12.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"product": {
            "id": 12, "title": "X", "handle": "x-2"
        }})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("products/12/variants/120.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    // "Premium" is rejected; the other two land.
    Mock::given(method("POST"))
        .and(path(api_path("products/12/variants.json")))
        .and(body_string_contains("Premium"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": {"option1": ["already exists"]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("products/12/variants.json")))
        .respond_with(variant_response(121))
        .mount(&server)
        .await;

    let provisioner = test_provisioner(&server);
    let result = provisioner
        .upload_product(&Niche::new("pets"), &pets_product("Tiered Bed"))
        .await;

    assert_eq!(result.status, UploadStatus::Success);
    assert_eq!(result.variants_created, 2, "one rejected variant is skipped");
}

// ---------------------------------------------------------------------------
// Emergency image guarantee
// ---------------------------------------------------------------------------

#[tokio::test]
async fn all_images_failing_still_attaches_emergency_image() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path("products.json")))
        .respond_with(product_created_response(13, 130))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("variants/130.json")))
        .respond_with(variant_response(130))
        .mount(&server)
        .await;

    // The emergency URL is the only image the store accepts.
    Mock::given(method("POST"))
        .and(path(api_path("products/13/images.json")))
        .and(body_string_contains("photo-1523275335684"))
        .respond_with(image_response(5))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("products/13/images.json")))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": {"src": ["could not be fetched"]}
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(api_path("products/13.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"product": {
            "id": 13, "title": "X", "handle": "x-3"
        }})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("products/13/variants/130.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("products/13/variants.json")))
        .respond_with(variant_response(131))
        .mount(&server)
        .await;

    let provisioner = test_provisioner(&server);
    let result = provisioner
        .upload_product(&Niche::new("pets"), &pets_product("Imageless Bed"))
        .await;

    assert_eq!(result.status, UploadStatus::Success);
    assert_eq!(
        result.images_uploaded, 1,
        "the emergency fallback must leave at least one image"
    );
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn image_upload_honors_retry_after_and_succeeds_transparently() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path("products.json")))
        .respond_with(product_created_response(14, 140))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("variants/140.json")))
        .respond_with(variant_response(140))
        .mount(&server)
        .await;

    // First image attempt is rate limited with Retry-After: 2, then accepted.
    Mock::given(method("POST"))
        .and(path(api_path("products/14/images.json")))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "2")
                .set_body_json(json!({"errors": "Exceeded 2 calls per second"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("products/14/images.json")))
        .respond_with(image_response(6))
        .mount(&server)
        .await;

    let mut product = pets_product("Throttled Bed");
    product.images.truncate(1);
    product.variants.truncate(1); // keep the test on the image path

    let provisioner = test_provisioner(&server);
    let started = std::time::Instant::now();
    let result = provisioner
        .upload_product(&Niche::new("pets"), &product)
        .await;

    assert_eq!(result.status, UploadStatus::Success);
    assert_eq!(result.images_uploaded, 1, "retry must absorb the 429");
    assert!(
        started.elapsed() >= Duration::from_secs(2),
        "the Retry-After hint must be honored before re-attempting"
    );
}

// ---------------------------------------------------------------------------
// Image URL hygiene
// ---------------------------------------------------------------------------

#[tokio::test]
async fn disallowed_image_hosts_are_substituted_before_upload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path("products.json")))
        .respond_with(product_created_response(15, 150))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("variants/150.json")))
        .respond_with(variant_response(150))
        .mount(&server)
        .await;

    // Only the emergency substitute is ever posted; the evil host never is.
    Mock::given(method("POST"))
        .and(path(api_path("products/15/images.json")))
        .and(body_string_contains("evil.example.com"))
        .respond_with(image_response(7))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("products/15/images.json")))
        .and(body_string_contains("images.unsplash.com"))
        .respond_with(image_response(8))
        .expect(1)
        .mount(&server)
        .await;

    let mut product = pets_product("Hygienic Bed");
    product.images = vec!["https://evil.example.com/cat.jpg".to_string()];
    product.variants.truncate(1);

    let provisioner = test_provisioner(&server);
    let result = provisioner
        .upload_product(&Niche::new("pets"), &product)
        .await;

    assert_eq!(result.images_uploaded, 1);
}
