//! ziot-api entry point.
//!
//! Bootstraps tracing, the optional Postgres pool, the ledger client,
//! the Groth16 verifier, and the background Poseidon initialization,
//! then serves the router from `lib.rs`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use ziot_api::config::AppConfig;
use ziot_api::state::AppState;
use ziot_crypto::{HasherHandle, PoseidonHasher};
use ziot_ledger::{HttpLedger, LedgerNotarizer, NoopLedger, Notarizer};
use ziot_registry::{DeviceRegistry, PgStore};
use ziot_zkp::artifacts::VERIFYING_KEY_FILE;
use ziot_zkp::Groth16Verifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let db_pool = ziot_registry::init_pool()
        .await
        .context("database initialization failed")?;
    let registry = match &db_pool {
        Some(pool) => DeviceRegistry::new(Arc::new(PgStore::new(pool.clone()))),
        None => DeviceRegistry::in_memory(),
    };

    let ledger: Arc<dyn LedgerNotarizer> = match &config.ledger_url {
        Some(url) => {
            tracing::info!(url, "ledger notarization enabled");
            Arc::new(HttpLedger::new(url).context("ledger client construction failed")?)
        }
        None => {
            tracing::warn!("LEDGER_URL not set — ledger notarization disabled");
            Arc::new(NoopLedger)
        }
    };
    let notarizer = Notarizer::new(ledger);

    let vkey_path = config.artifacts_dir.join(VERIFYING_KEY_FILE);
    let verifier = Groth16Verifier::from_file(&vkey_path).with_context(|| {
        format!(
            "failed to load verifying key from {} (run `ziot setup` first)",
            vkey_path.display()
        )
    })?;

    // Parameter generation takes a while; serve 503s instead of blocking
    // startup.
    let hasher = HasherHandle::new();
    {
        let hasher = hasher.clone();
        tokio::task::spawn_blocking(move || match PoseidonHasher::init() {
            Ok(ready) => {
                hasher.install(ready);
                tracing::info!("Poseidon hashing initialized");
            }
            Err(e) => {
                tracing::error!("Poseidon initialization failed: {e}");
            }
        });
    }

    let port = config.port;
    #[allow(unused_mut)]
    let mut state = AppState::new(
        config,
        registry,
        Arc::new(verifier),
        hasher,
        notarizer,
        db_pool,
    );

    #[cfg(feature = "dev-prover")]
    {
        let pk_path = state
            .config
            .artifacts_dir
            .join(ziot_zkp::artifacts::PROVING_KEY_FILE);
        match ziot_zkp::load_proving_key(&pk_path) {
            Ok(pk) => {
                tracing::warn!("dev prover enabled — do not run this build in production");
                state.proving_key = Some(Arc::new(pk));
            }
            Err(e) => {
                tracing::warn!("dev-prover built but proving key unavailable: {e}");
            }
        }
    }

    let app = ziot_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("ziot-api listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("server error")?;
    Ok(())
}
