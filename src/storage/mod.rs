//! Store backends implementing [`InvoiceStore`](crate::core::InvoiceStore).
//!
//! The in-memory backend is the default; MongoDB is available behind the
//! `mongodb_backend` feature.

pub mod in_memory;

#[cfg(feature = "mongodb_backend")]
pub mod mongodb;

pub use in_memory::InMemoryInvoiceStore;

#[cfg(feature = "mongodb_backend")]
pub use mongodb::MongoInvoiceStore;
