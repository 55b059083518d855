//! HTTP exposure: axum router and handlers over the invoice service.

pub mod handlers;
pub mod router;

pub use handlers::AppState;
pub use router::build_router;
