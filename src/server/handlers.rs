//! HTTP handlers for invoice operations
//!
//! Handlers are thin: they translate between the wire format and the
//! [`InvoiceService`], which owns the validation rules. Status codes follow
//! the original contract — 200 on success (including creation), 400 on
//! rejection, 404 on missing invoice number, 500 on store failure.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde_json::{Value, json};

use crate::core::error::ApiResult;
use crate::core::invoice::{
    CreateInvoiceRequest, Invoice, InvoiceQuery, UpdateInvoiceRequest,
};
use crate::core::service::InvoiceService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub invoices: InvoiceService,
}

impl AppState {
    pub fn new(invoices: InvoiceService) -> Self {
        Self { invoices }
    }
}

/// GET /invoices?financialYear=&invoiceNumber=&startDate=&endDate=
///
/// An empty result set is a valid 200 response, not an error.
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<InvoiceQuery>,
) -> ApiResult<Json<Vec<Invoice>>> {
    let invoices = state.invoices.query(query.into()).await?;
    Ok(Json(invoices))
}

/// POST /invoice
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(body): Json<CreateInvoiceRequest>,
) -> ApiResult<Json<Value>> {
    let invoice = state.invoices.create(body).await?;
    tracing::info!(
        invoice_number = %invoice.invoice_number,
        financial_year = %invoice.financial_year,
        "invoice saved"
    );
    Ok(Json(json!({ "message": "Invoice saved successfully" })))
}

/// PUT /invoices/{invoiceNumber}
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_number): Path<String>,
    Json(body): Json<UpdateInvoiceRequest>,
) -> ApiResult<Json<Invoice>> {
    let updated = state.invoices.update(&invoice_number, body).await?;
    Ok(Json(updated))
}

/// DELETE /invoices/{invoiceNumber}
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_number): Path<String>,
) -> ApiResult<Json<Value>> {
    state.invoices.delete(&invoice_number).await?;
    Ok(Json(json!({ "message": "Invoice deleted successfully" })))
}
