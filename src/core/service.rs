//! Store trait and the invoice service enforcing creation rules
//!
//! The service is agnostic to the underlying storage mechanism: it talks to
//! any [`InvoiceStore`] implementation through the trait, so the same
//! validation logic runs against the in-memory backend and MongoDB.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::error::{ApiError, ApiResult, ValidationError};
use crate::core::fiscal;
use crate::core::invoice::{
    CreateInvoiceRequest, Invoice, InvoiceChanges, InvoiceFilter, UpdateInvoiceRequest,
};

/// Storage operations the invoice service depends on.
///
/// Implementations provide filter-based reads and single-document writes
/// over a collection of invoice records. Lookups that resolve a single
/// record by invoice number return the *first stored* match regardless of
/// financial year — the creation rules depend on that ordering.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a new record
    async fn insert(&self, invoice: Invoice) -> Result<Invoice>;

    /// List records matching the filter, in storage order
    async fn find(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>>;

    /// First stored record with this invoice number, any financial year
    async fn find_by_number(&self, invoice_number: &str) -> Result<Option<Invoice>>;

    /// Record matching both invoice number and financial year, if any
    async fn find_in_year(
        &self,
        invoice_number: &str,
        financial_year: &str,
    ) -> Result<Option<Invoice>>;

    /// Record with the smallest invoice date strictly greater than `date`,
    /// searched across the whole store
    async fn find_first_after(&self, date: NaiveDate) -> Result<Option<Invoice>>;

    /// Replace date and amount on the first record with this number.
    /// Returns the updated record, or `None` if nothing matched.
    async fn update_by_number(
        &self,
        invoice_number: &str,
        changes: InvoiceChanges,
    ) -> Result<Option<Invoice>>;

    /// Remove the first record with this number.
    /// Returns the removed record, or `None` if nothing matched.
    async fn delete_by_number(&self, invoice_number: &str) -> Result<Option<Invoice>>;
}

/// Application service wrapping an [`InvoiceStore`] with the creation rules.
///
/// Creation runs two read-only checks before inserting: number uniqueness
/// within the derived financial year, and chronological placement of the
/// date. The sequence is read-then-write without transactional isolation;
/// two concurrent creations for the same number and year can both pass and
/// race to insert. Update and delete skip validation entirely — the rules
/// are enforced only at creation.
#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<dyn InvoiceStore>,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a submitted invoice.
    ///
    /// Both checks must pass; a failure is reported as a single combined
    /// rejection without distinguishing which rule was violated.
    pub async fn create(&self, req: CreateInvoiceRequest) -> ApiResult<Invoice> {
        let financial_year = fiscal::financial_year(req.invoice_date);

        let number_unique = self
            .is_number_unique(&req.invoice_number, &financial_year)
            .await?;
        let date_valid = self
            .is_date_slot_valid(req.invoice_date, &req.invoice_number)
            .await?;

        if !(number_unique && date_valid) {
            tracing::debug!(
                invoice_number = %req.invoice_number,
                %financial_year,
                number_unique,
                date_valid,
                "invoice rejected"
            );
            return Err(ValidationError::InvoiceRejected.into());
        }

        let invoice = Invoice::new(req.invoice_date, req.invoice_number, req.invoice_amount);
        Ok(self.store.insert(invoice).await?)
    }

    /// List invoices matching the resolved query filters.
    pub async fn query(&self, filter: InvoiceFilter) -> ApiResult<Vec<Invoice>> {
        Ok(self.store.find(&filter).await?)
    }

    /// Replace date and amount on an existing invoice. No validation re-run.
    pub async fn update(
        &self,
        invoice_number: &str,
        req: UpdateInvoiceRequest,
    ) -> ApiResult<Invoice> {
        self.store
            .update_by_number(invoice_number, req.into())
            .await?
            .ok_or_else(|| ApiError::NotFound {
                invoice_number: invoice_number.to_string(),
            })
    }

    /// Remove an existing invoice.
    pub async fn delete(&self, invoice_number: &str) -> ApiResult<Invoice> {
        self.store
            .delete_by_number(invoice_number)
            .await?
            .ok_or_else(|| ApiError::NotFound {
                invoice_number: invoice_number.to_string(),
            })
    }

    /// No record may already hold this number within the financial year.
    async fn is_number_unique(&self, invoice_number: &str, financial_year: &str) -> Result<bool> {
        let existing = self
            .store
            .find_in_year(invoice_number, financial_year)
            .await?;
        Ok(existing.is_none())
    }

    /// The candidate date must fall after the stored invoice for this number
    /// and before the next-dated invoice found anywhere in the store.
    ///
    /// The "next" lookup is intentionally not scoped to the invoice number:
    /// it compares against the globally next invoice date across all
    /// numbers. The first invoice for a number is accepted unconditionally.
    async fn is_date_slot_valid(&self, candidate: NaiveDate, invoice_number: &str) -> Result<bool> {
        let Some(current) = self.store.find_by_number(invoice_number).await? else {
            return Ok(true);
        };

        let previous = current.invoice_date;
        match self.store.find_first_after(previous).await? {
            Some(next) => Ok(previous < candidate && candidate < next.invoice_date),
            None => Ok(candidate > previous),
        }
    }
}
