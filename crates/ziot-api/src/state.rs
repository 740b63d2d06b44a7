//! # Shared Application State
//!
//! Everything handlers need, behind cheap clones. The verifier sits
//! behind `Arc<dyn ProofVerifier>` so tests can substitute an
//! instrumented implementation; production wiring in `main.rs` only ever
//! installs [`Groth16Verifier`].
//!
//! [`Groth16Verifier`]: ziot_zkp::Groth16Verifier

use std::sync::Arc;

use sqlx::postgres::PgPool;

use ziot_crypto::{CredentialIssuer, HasherHandle};
use ziot_ledger::Notarizer;
use ziot_registry::DeviceRegistry;
use ziot_zkp::ProofVerifier;

use crate::behavior::BehaviorGuard;
use crate::config::AppConfig;

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: DeviceRegistry,
    pub verifier: Arc<dyn ProofVerifier>,
    pub hasher: HasherHandle,
    pub notarizer: Notarizer,
    pub issuer: Arc<CredentialIssuer>,
    pub behavior: BehaviorGuard,
    /// Present only when `DATABASE_URL` was configured; used by the
    /// readiness probe.
    pub db_pool: Option<PgPool>,
    /// Proving key for the opt-in `/v1/devices/prove` helper.
    #[cfg(feature = "dev-prover")]
    pub proving_key: Option<Arc<ark_groth16::ProvingKey<ark_bn254::Bn254>>>,
}

impl AppState {
    /// Assemble state from parts. The hasher handle may still be empty;
    /// routes answer 503 until it is installed.
    pub fn new(
        config: AppConfig,
        registry: DeviceRegistry,
        verifier: Arc<dyn ProofVerifier>,
        hasher: HasherHandle,
        notarizer: Notarizer,
        db_pool: Option<PgPool>,
    ) -> Self {
        let behavior = BehaviorGuard::new(
            config.max_events_per_minute,
            config.max_payload_bytes,
        );
        let issuer = Arc::new(CredentialIssuer::generate(config.token_ttl_secs));
        Self {
            config: Arc::new(config),
            registry,
            verifier,
            hasher,
            notarizer,
            issuer,
            behavior,
            db_pool,
            #[cfg(feature = "dev-prover")]
            proving_key: None,
        }
    }
}
