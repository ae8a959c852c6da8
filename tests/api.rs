use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use translate402::{
    config::Config,
    handlers::{router, AppState},
    services::{PaymentGate, ProofCache, SystemClock},
};

fn test_config(verify_onchain: bool, rpc_url: Option<&str>) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        payment_address: "0x1234567890AbCdEf1234567890AbCdEf12345678"
            .parse()
            .unwrap(),
        price_eth: "0.001".to_string(),
        price_wei: ethers::utils::parse_ether("0.001").unwrap(),
        chain_id: 84532,
        rpc_url: rpc_url.map(str::to_string),
        verify_onchain,
        proof_ttl: Duration::from_secs(120),
        min_confirmations: 0,
    }
}

fn app(config: Config) -> Router {
    let cache = Arc::new(ProofCache::new(config.proof_ttl, Arc::new(SystemClock)));
    let gate = Arc::new(PaymentGate::from_config(&config, cache));
    router(AppState {
        gate,
        config: Arc::new(config),
    })
}

fn post_translate(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/translate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_receipt_returns_payment_terms() {
    let config = test_config(false, None);
    // The advertised payee must be the EIP-55 checksummed form, not the
    // raw configured string.
    let checksummed = ethers::utils::to_checksum(&config.payment_address, None);
    let app = app(config);
    let response = app
        .oneshot(post_translate(json!({ "text": "hello" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let body = json_body(response).await;
    assert_eq!(body["error_code"], "PAYMENT_REQUIRED");
    assert_eq!(body["price"], "0.001");
    assert_eq!(body["currency"], "ETH");
    assert_eq!(body["chain"], "chainId:84532");
    assert_eq!(body["payment_address"], checksummed.as_str());
    assert_eq!(
        checksummed,
        "0x1234567890AbcdEF1234567890aBcdef12345678"
    );
}

#[tokio::test]
async fn empty_body_is_treated_as_no_receipt() {
    let app = app(test_config(false, None));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/translate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let body = json_body(response).await;
    assert_eq!(body["error_code"], "PAYMENT_REQUIRED");
}

#[tokio::test]
async fn well_formed_receipt_translates_in_mock_mode() {
    let app = app(test_config(false, None));
    let response = app
        .oneshot(post_translate(json!({
            "text": "hello",
            "payment_receipt": { "transactionHash": "0xabc123" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["result"], "Terjemahan: hello (Translated via x402)");
}

#[tokio::test]
async fn malformed_receipt_is_rejected() {
    let app = app(test_config(false, None));
    let response = app
        .oneshot(post_translate(json!({
            "text": "hello",
            "payment_receipt": { "transactionHash": "not-a-hash" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let body = json_body(response).await;
    assert_eq!(body["error_code"], "PAYMENT_REJECTED");
    assert_eq!(body["error"], "Payment invalid or not yet confirmed");
}

#[tokio::test]
async fn health_reports_effective_mode() {
    let app = app(test_config(false, None));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["verify_onchain"], false);
    assert_eq!(body["price_eth"], "0.001");
}

#[tokio::test]
async fn onchain_without_rpc_url_downgrades_to_mock() {
    let config = test_config(true, None);
    let cache = Arc::new(ProofCache::new(config.proof_ttl, Arc::new(SystemClock)));
    let gate = PaymentGate::from_config(&config, cache);
    assert!(!gate.verifies_onchain());
}

#[tokio::test]
async fn onchain_with_unparseable_rpc_url_downgrades_to_mock() {
    let config = test_config(true, Some("not a url"));
    let cache = Arc::new(ProofCache::new(config.proof_ttl, Arc::new(SystemClock)));
    let gate = PaymentGate::from_config(&config, cache);
    assert!(!gate.verifies_onchain());
}
