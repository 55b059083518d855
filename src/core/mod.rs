//! Domain core: invoice records, financial-year derivation, the store
//! abstraction and the validation service built on top of it.

pub mod error;
pub mod fiscal;
pub mod invoice;
pub mod service;

pub use error::{ApiError, ApiResult, ConfigError, StorageError, ValidationError};
pub use invoice::{
    CreateInvoiceRequest, Invoice, InvoiceChanges, InvoiceFilter, InvoiceQuery,
    UpdateInvoiceRequest,
};
pub use service::{InvoiceService, InvoiceStore};
