//! # invoicebook
//!
//! A small invoice bookkeeping API served over HTTP/JSON. Clients submit,
//! query, update and delete invoice records; the server enforces two rules
//! at creation time:
//!
//! - an invoice number may appear at most once per derived financial year
//!   (`2023-05-10` → year `"2023-24"`);
//! - a new invoice for an existing number must date strictly after the
//!   stored invoice for that number and strictly before the next-dated
//!   invoice found anywhere in the store.
//!
//! Everything else is plain CRUD over a document store, reached through the
//! [`InvoiceStore`](core::InvoiceStore) trait. The in-memory backend is the
//! default; MongoDB is available behind the `mongodb_backend` feature.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use invoicebook::prelude::*;
//!
//! let store = Arc::new(InMemoryInvoiceStore::new());
//! let state = AppState::new(InvoiceService::new(store));
//! let app = build_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8081").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::config::{AppConfig, StorageBackend};
    pub use crate::core::{
        ApiError, ApiResult, CreateInvoiceRequest, Invoice, InvoiceFilter, InvoiceQuery,
        InvoiceService, InvoiceStore, UpdateInvoiceRequest, ValidationError,
    };
    pub use crate::server::{AppState, build_router};
    pub use crate::storage::InMemoryInvoiceStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoInvoiceStore;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
