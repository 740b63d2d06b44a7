//! # Integration Tests for ziot-api
//!
//! Exercises the full router: registration determinism, the ordered
//! verify pipeline (including the commitment-mismatch short-circuit),
//! revocation idempotence, behavior-guard revocation, readiness gating,
//! and error body shapes.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use ziot_api::config::AppConfig;
use ziot_api::state::AppState;
use ziot_core::{Commitment, DeviceId};
use ziot_crypto::{verify_credential, HasherHandle, PoseidonHasher};
use ziot_ledger::{NoopLedger, Notarizer};
use ziot_registry::DeviceRegistry;
use ziot_zkp::{Groth16Verifier, PermissiveVerifier, Proof, ProofVerifier};

/// BN254 G2 generator coordinates, used to shape structurally valid
/// proofs for tests that never reach the pairing check.
const G2_X0: &str =
    "10857046999023057135944570762232829481370756359578518086990519993285655852781";
const G2_X1: &str =
    "11559732032986387107991004021392285783925812861821192530917403151452391805634";
const G2_Y0: &str =
    "8495653923123431417604973247489272438418190587263600148770280649306958101930";
const G2_Y1: &str =
    "4082367875863433681332203403145435568316851327593401208105741076214120093531";

/// A proof built from curve generators: on-curve, in-subgroup, and
/// guaranteed to fail a real pairing check.
fn shaped_proof() -> Proof {
    Proof {
        a: ["1".to_string(), "2".to_string()],
        b: [
            [G2_X0.to_string(), G2_X1.to_string()],
            [G2_Y0.to_string(), G2_Y1.to_string()],
        ],
        c: ["1".to_string(), "2".to_string()],
    }
}

/// Verifier wrapper that counts invocations, for short-circuit
/// assertions.
struct CountingVerifier {
    inner: PermissiveVerifier,
    calls: AtomicU32,
}

impl CountingVerifier {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: PermissiveVerifier,
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProofVerifier for CountingVerifier {
    fn verify(&self, proof: &Proof, public_signals: &[String]) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(proof, public_signals)
    }
}

fn ready_hasher() -> HasherHandle {
    let handle = HasherHandle::new();
    handle.install(PoseidonHasher::init().unwrap());
    handle
}

fn test_state(verifier: Arc<dyn ProofVerifier>, hasher: HasherHandle) -> AppState {
    AppState::new(
        AppConfig::default(),
        DeviceRegistry::in_memory(),
        verifier,
        hasher,
        Notarizer::new(Arc::new(NoopLedger)),
        None,
    )
}

/// Helper: build the test app with a permissive verifier and a ready
/// hasher.
fn test_app() -> axum::Router {
    ziot_api::app(test_state(Arc::new(PermissiveVerifier), ready_hasher()))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &axum::Router, device_id: &str, secret: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/devices/register",
            serde_json::json!({ "deviceId": device_id, "secret": secret }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn liveness_probe() {
    let response = test_app().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn legacy_health_route() {
    let response = test_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn readiness_reports_ready_with_installed_hasher() {
    let response = test_app().oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readiness_reports_503_during_warmup() {
    let app = ziot_api::app(test_state(Arc::new(PermissiveVerifier), HasherHandle::new()));
    let response = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// -- Registration -------------------------------------------------------------

#[tokio::test]
async fn register_returns_commitment() {
    let app = test_app();
    let body = register(&app, "dev1", "hunter2").await;
    assert_eq!(body["success"], true);
    let commitment = body["commitment"].as_str().unwrap();
    assert!(!commitment.is_empty());
    assert!(commitment.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn registration_is_deterministic_per_secret() {
    let app = test_app();
    let first = register(&app, "dev1", "hunter2").await;
    let second = register(&app, "dev2", "hunter2").await;
    let third = register(&app, "dev3", "different").await;
    assert_eq!(first["commitment"], second["commitment"]);
    assert_ne!(first["commitment"], third["commitment"]);
}

#[tokio::test]
async fn reregistration_replaces_commitment() {
    let app = test_app();
    let first = register(&app, "dev1", "old-secret").await;
    let second = register(&app, "dev1", "new-secret").await;
    assert_ne!(first["commitment"], second["commitment"]);

    let response = app.oneshot(get("/v1/devices/dev1")).await.unwrap();
    let record = body_json(response).await;
    assert_eq!(record["commitment"], second["commitment"]);
    assert_eq!(record["status"], "ACTIVE");
}

#[tokio::test]
async fn register_empty_device_id_is_422() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/devices/register",
            serde_json::json!({ "deviceId": "", "secret": "s" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn register_missing_secret_is_422() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/devices/register",
            serde_json::json!({ "deviceId": "dev1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn register_during_warmup_is_503_not_ready() {
    let app = ziot_api::app(test_state(Arc::new(PermissiveVerifier), HasherHandle::new()));
    let response = app
        .oneshot(post_json(
            "/v1/devices/register",
            serde_json::json!({ "deviceId": "dev1", "secret": "s" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_READY");
}

// -- Verification pipeline ----------------------------------------------------

#[tokio::test]
async fn verify_during_warmup_is_503_not_ready() {
    let state = test_state(Arc::new(PermissiveVerifier), HasherHandle::new());
    // Seed an active record directly so the warm-up gate is what answers,
    // not the unknown-device or proof checks.
    let device_id = DeviceId::new("dev1").unwrap();
    let commitment = Commitment::new("12345").unwrap();
    state.registry.register(&device_id, &commitment).await.unwrap();
    let app = ziot_api::app(state);

    let response = app
        .oneshot(post_json(
            "/v1/devices/verify",
            serde_json::json!({
                "deviceId": "dev1",
                "proof": shaped_proof(),
                "publicSignals": ["12345"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_READY");
}

#[tokio::test]
async fn verify_unknown_device_is_404() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/devices/verify",
            serde_json::json!({
                "deviceId": "ghost",
                "proof": shaped_proof(),
                "publicSignals": ["1"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn commitment_mismatch_short_circuits_the_verifier() {
    let counting = CountingVerifier::new();
    let app = ziot_api::app(test_state(counting.clone(), ready_hasher()));
    register(&app, "dev1", "hunter2").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/devices/verify",
            serde_json::json!({
                "deviceId": "dev1",
                "proof": shaped_proof(),
                "publicSignals": ["12345"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Commitment mismatch"));
    assert_eq!(counting.calls(), 0, "verifier must not run on mismatch");

    // A failed attempt must not touch the device's status.
    let record = body_json(app.oneshot(get("/v1/devices/dev1")).await.unwrap()).await;
    assert_eq!(record["status"], "ACTIVE");
}

#[tokio::test]
async fn empty_public_signals_is_a_mismatch() {
    let counting = CountingVerifier::new();
    let app = ziot_api::app(test_state(counting.clone(), ready_hasher()));
    register(&app, "dev1", "hunter2").await;

    let response = app
        .oneshot(post_json(
            "/v1/devices/verify",
            serde_json::json!({
                "deviceId": "dev1",
                "proof": shaped_proof(),
                "publicSignals": [],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(counting.calls(), 0);
}

#[tokio::test]
async fn matching_commitment_reaches_the_verifier_and_succeeds() {
    let counting = CountingVerifier::new();
    let app = ziot_api::app(test_state(counting.clone(), ready_hasher()));
    let registered = register(&app, "dev1", "hunter2").await;
    let commitment = registered["commitment"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/devices/verify",
            serde_json::json!({
                "deviceId": "dev1",
                "proof": shaped_proof(),
                "publicSignals": [commitment],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(counting.calls(), 1);

    // Success stamps last_seen.
    let record = body_json(app.oneshot(get("/v1/devices/dev1")).await.unwrap()).await;
    assert!(!record["last_seen"].is_null());
}

#[tokio::test]
async fn malformed_proof_is_401_invalid_proof() {
    let app = test_app();
    let registered = register(&app, "dev1", "hunter2").await;
    let commitment = registered["commitment"].as_str().unwrap();

    let mut proof = shaped_proof();
    proof.a[0] = "not-a-number".to_string();
    let response = app
        .oneshot(post_json(
            "/v1/devices/verify",
            serde_json::json!({
                "deviceId": "dev1",
                "proof": proof,
                "publicSignals": [commitment],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid ZK Proof"));
}

/// End-to-end with the real proof system: register, prove with the
/// actual circuit, verify, and check the issued credential.
#[tokio::test]
async fn full_groth16_round_trip_issues_a_credential() {
    let hasher = PoseidonHasher::init().unwrap();
    let mut rng = rand_core::OsRng;
    let artifacts = ziot_zkp::setup(&hasher, &mut rng).unwrap();
    let bundle = ziot_zkp::prove(&hasher, &artifacts.proving_key, "device-secret", &mut rng).unwrap();
    let verifier = Groth16Verifier::new(artifacts.verifying_key);

    let handle = HasherHandle::new();
    handle.install(hasher);
    let state = test_state(Arc::new(verifier), handle);
    let issuer_key = state.issuer.verifying_key();
    let app = ziot_api::app(state);

    let registered = register(&app, "dev1", "device-secret").await;
    assert_eq!(
        registered["commitment"].as_str().unwrap(),
        bundle.public_signals[0],
        "prover and authority must derive the same commitment"
    );

    let response = app
        .oneshot(post_json(
            "/v1/devices/verify",
            serde_json::json!({
                "deviceId": "dev1",
                "proof": bundle.proof,
                "publicSignals": bundle.public_signals,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let token = body["token"].as_str().unwrap();
    let claims = verify_credential(token, &issuer_key, chrono::Utc::now()).unwrap();
    assert_eq!(claims.device_id.as_str(), "dev1");
}

// -- Revocation ---------------------------------------------------------------

#[tokio::test]
async fn revoked_device_fails_verify_with_403() {
    let app = test_app();
    let registered = register(&app, "dev1", "hunter2").await;
    let commitment = registered["commitment"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/devices/revoke",
            serde_json::json!({ "deviceId": "dev1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "REVOKED");

    let response = app
        .oneshot(post_json(
            "/v1/devices/verify",
            serde_json::json!({
                "deviceId": "dev1",
                "proof": shaped_proof(),
                "publicSignals": [commitment],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "DEVICE_NOT_ACTIVE");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("REVOKED"));
}

#[tokio::test]
async fn revoke_is_idempotent() {
    let app = test_app();
    register(&app, "dev1", "hunter2").await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/v1/devices/revoke",
                serde_json::json!({ "deviceId": "dev1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "REVOKED");
    }
}

#[tokio::test]
async fn revoke_unknown_device_is_404() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/devices/revoke",
            serde_json::json!({ "deviceId": "ghost" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reregistration_resurrects_a_revoked_device() {
    let app = test_app();
    register(&app, "dev1", "hunter2").await;
    app.clone()
        .oneshot(post_json(
            "/v1/devices/revoke",
            serde_json::json!({ "deviceId": "dev1" }),
        ))
        .await
        .unwrap();

    register(&app, "dev1", "new-secret").await;
    let record = body_json(app.oneshot(get("/v1/devices/dev1")).await.unwrap()).await;
    assert_eq!(record["status"], "ACTIVE");
}

// -- Behavior guard -----------------------------------------------------------

#[tokio::test]
async fn telemetry_flood_revokes_the_device() {
    let app = test_app();
    register(&app, "dev1", "hunter2").await;

    let mut last_status = String::new();
    for _ in 0..11 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/v1/telemetry",
                serde_json::json!({ "deviceId": "dev1", "payloadSize": 64, "metricValue": 21.5 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        last_status = body_json(response).await["status"]
            .as_str()
            .unwrap()
            .to_string();
    }
    assert_eq!(last_status, "ANOMALY_DETECTED");

    let record = body_json(app.oneshot(get("/v1/devices/dev1")).await.unwrap()).await;
    assert_eq!(record["status"], "REVOKED");
}

#[tokio::test]
async fn oversized_payload_revokes_on_first_event() {
    let app = test_app();
    register(&app, "dev1", "hunter2").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/telemetry",
            serde_json::json!({ "deviceId": "dev1", "payloadSize": 4096, "metricValue": 0.0 }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["status"], "ANOMALY_DETECTED");

    let record = body_json(app.oneshot(get("/v1/devices/dev1")).await.unwrap()).await;
    assert_eq!(record["status"], "REVOKED");
}

#[tokio::test]
async fn normal_telemetry_is_ok_and_leaves_device_active() {
    let app = test_app();
    register(&app, "dev1", "hunter2").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/telemetry",
            serde_json::json!({ "deviceId": "dev1", "payloadSize": 64, "metricValue": 21.5 }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["status"], "OK");

    let record = body_json(app.oneshot(get("/v1/devices/dev1")).await.unwrap()).await;
    assert_eq!(record["status"], "ACTIVE");
}

#[tokio::test]
async fn telemetry_missing_metric_value_is_422() {
    let app = test_app();
    register(&app, "dev1", "hunter2").await;

    let response = app
        .oneshot(post_json(
            "/v1/telemetry",
            serde_json::json!({ "deviceId": "dev1", "payloadSize": 64 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn anomaly_for_unknown_device_still_reports_anomaly() {
    let app = test_app();
    let response = app
        .oneshot(post_json(
            "/v1/telemetry",
            serde_json::json!({ "deviceId": "ghost", "payloadSize": 4096, "metricValue": 0.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ANOMALY_DETECTED");
}

// -- Lookup & spec ------------------------------------------------------------

#[tokio::test]
async fn get_unknown_device_is_404() {
    let response = test_app().oneshot(get("/v1/devices/ghost")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_spec_is_served() {
    let response = test_app().oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/v1/devices/verify"].is_object());
}

#[tokio::test]
async fn metrics_endpoint_scrapes() {
    let app = test_app();
    app.clone().oneshot(get("/health")).await.unwrap();
    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("ziot_hasher_ready"));
}
