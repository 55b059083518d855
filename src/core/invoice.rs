//! Invoice record and the request/filter types that travel with it
//!
//! The wire format is camelCase JSON (`invoiceDate`, `invoiceNumber`, ...)
//! and dates are plain `YYYY-MM-DD` strings. The serialized form doubles as
//! the storage document format, so invoice-date ordering also holds
//! lexicographically once serialized.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::fiscal;

/// A stored invoice record.
///
/// `invoice_number` is not globally unique: the same number may recur across
/// financial years. `financial_year` is derived from `invoice_date` at
/// creation and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Unique identifier (maps to `_id` in the MongoDB backend)
    pub id: Uuid,

    pub invoice_date: NaiveDate,
    pub invoice_number: String,
    pub invoice_amount: f64,

    /// Derived label, format `YYYY-YY` (e.g. `2023-24`)
    pub financial_year: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Build a fresh record from submitted fields, deriving the financial
    /// year and stamping timestamps.
    pub fn new(invoice_date: NaiveDate, invoice_number: String, invoice_amount: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            financial_year: fiscal::financial_year(invoice_date),
            invoice_date,
            invoice_number,
            invoice_amount,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `POST /invoice`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub invoice_date: NaiveDate,
    pub invoice_number: String,
    pub invoice_amount: f64,
}

/// Body of `PUT /invoices/{invoiceNumber}`.
///
/// Number and financial year are immutable after creation; only the date and
/// amount can be replaced.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
    pub invoice_date: NaiveDate,
    pub invoice_amount: f64,
}

/// Field replacements applied by
/// [`InvoiceStore::update_by_number`](crate::core::service::InvoiceStore::update_by_number).
#[derive(Debug, Clone)]
pub struct InvoiceChanges {
    pub invoice_date: NaiveDate,
    pub invoice_amount: f64,
}

impl From<UpdateInvoiceRequest> for InvoiceChanges {
    fn from(req: UpdateInvoiceRequest) -> Self {
        Self {
            invoice_date: req.invoice_date,
            invoice_amount: req.invoice_amount,
        }
    }
}

/// Query parameters of `GET /invoices`.
///
/// All filters are optional and combine conjunctively. The date range is
/// inclusive and only applies when both bounds are present. An empty value
/// (`financialYear=`, `startDate=`, ...) counts as absent, so a query
/// string listing every parameter with no values returns all invoices.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceQuery {
    #[serde(deserialize_with = "empty_string_as_none")]
    pub financial_year: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub invoice_number: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub end_date: Option<NaiveDate>,
}

/// Treat a missing or empty query-string value as no filter at all.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Store-level filter resolved from an [`InvoiceQuery`].
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub financial_year: Option<String>,
    pub invoice_number: Option<String>,
    /// Inclusive `(start, end)` bounds on the invoice date
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl From<InvoiceQuery> for InvoiceFilter {
    fn from(query: InvoiceQuery) -> Self {
        // A lone startDate or endDate is ignored rather than rejected.
        let date_range = match (query.start_date, query.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        };
        Self {
            financial_year: query.financial_year,
            invoice_number: query.invoice_number,
            date_range,
        }
    }
}

impl InvoiceFilter {
    /// Whether a record satisfies every present filter.
    pub fn matches(&self, invoice: &Invoice) -> bool {
        if let Some(fy) = &self.financial_year
            && &invoice.financial_year != fy
        {
            return false;
        }
        if let Some(number) = &self.invoice_number
            && &invoice.invoice_number != number
        {
            return false;
        }
        if let Some((start, end)) = self.date_range
            && !(start <= invoice.invoice_date && invoice.invoice_date <= end)
        {
            return false;
        }
        true
    }
}
