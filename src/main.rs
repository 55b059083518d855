//! Server binary: load configuration, pick a store backend, serve.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use invoicebook::config::{AppConfig, StorageBackend};
use invoicebook::core::{InvoiceService, InvoiceStore};
use invoicebook::server::{AppState, build_router};
use invoicebook::storage::InMemoryInvoiceStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("INVOICEBOOK_CONFIG") {
        Ok(path) => AppConfig::from_yaml_file(&path)?,
        Err(_) => AppConfig::default(),
    }
    .apply_env()?;

    let store = build_store(&config).await?;
    let state = AppState::new(InvoiceService::new(store));
    let app = build_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, backend = ?config.storage.backend, "invoicebook listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn InvoiceStore>> {
    match config.storage.backend {
        StorageBackend::InMemory => Ok(Arc::new(InMemoryInvoiceStore::new())),
        #[cfg(feature = "mongodb_backend")]
        StorageBackend::Mongodb => {
            let store = invoicebook::storage::MongoInvoiceStore::connect(
                &config.storage.uri,
                &config.storage.database,
            )
            .await?;
            store.ensure_indexes().await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "mongodb_backend"))]
        StorageBackend::Mongodb => anyhow::bail!(
            "storage backend 'mongodb' requires the 'mongodb_backend' feature"
        ),
    }
}
