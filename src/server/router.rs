//! Route table for the invoice API

use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::handlers::{
    AppState, create_invoice, delete_invoice, list_invoices, update_invoice,
};

/// Build the application router.
///
/// The API was originally consumed by a browser frontend, so CORS stays
/// enabled; request tracing covers every route.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .route("/invoices", get(list_invoices))
        .route("/invoice", post(create_invoice))
        .route(
            "/invoices/{invoiceNumber}",
            put(update_invoice).delete(delete_invoice),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoicebook"
    }))
}
