//! In-memory store implementation for testing and development
//!
//! Records are kept in a `Vec` guarded by an `RwLock`, preserving insertion
//! order. That ordering matters: `find_by_number`, `update_by_number` and
//! `delete_by_number` resolve to the *first inserted* match, mirroring
//! natural-order `findOne` semantics of the document-store backend.

use std::sync::{Arc, RwLock};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::invoice::{Invoice, InvoiceChanges, InvoiceFilter};
use crate::core::service::InvoiceStore;

/// In-memory invoice store.
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<Vec<Invoice>>>,
}

impl InMemoryInvoiceStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self {
            invoices: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryInvoiceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: Invoice) -> Result<Invoice> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        invoices.push(invoice.clone());

        Ok(invoice)
    }

    async fn find(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(invoices
            .iter()
            .filter(|inv| filter.matches(inv))
            .cloned()
            .collect())
    }

    async fn find_by_number(&self, invoice_number: &str) -> Result<Option<Invoice>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(invoices
            .iter()
            .find(|inv| inv.invoice_number == invoice_number)
            .cloned())
    }

    async fn find_in_year(
        &self,
        invoice_number: &str,
        financial_year: &str,
    ) -> Result<Option<Invoice>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(invoices
            .iter()
            .find(|inv| {
                inv.invoice_number == invoice_number && inv.financial_year == financial_year
            })
            .cloned())
    }

    async fn find_first_after(&self, date: NaiveDate) -> Result<Option<Invoice>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(invoices
            .iter()
            .filter(|inv| inv.invoice_date > date)
            .min_by_key(|inv| inv.invoice_date)
            .cloned())
    }

    async fn update_by_number(
        &self,
        invoice_number: &str,
        changes: InvoiceChanges,
    ) -> Result<Option<Invoice>> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(invoice) = invoices
            .iter_mut()
            .find(|inv| inv.invoice_number == invoice_number)
        else {
            return Ok(None);
        };

        invoice.invoice_date = changes.invoice_date;
        invoice.invoice_amount = changes.invoice_amount;
        invoice.updated_at = chrono::Utc::now();

        Ok(Some(invoice.clone()))
    }

    async fn delete_by_number(&self, invoice_number: &str) -> Result<Option<Invoice>> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(pos) = invoices
            .iter()
            .position(|inv| inv.invoice_number == invoice_number)
        else {
            return Ok(None);
        };

        Ok(Some(invoices.remove(pos)))
    }
}
