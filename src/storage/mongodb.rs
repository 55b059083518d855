//! MongoDB store backend using the official async driver.
//!
//! # Feature flag
//!
//! Gated behind the `mongodb_backend` feature:
//! ```toml
//! [dependencies]
//! invoicebook = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! All records live in a single `invoices` collection. Documents are
//! serialized through `serde_json::Value` as an intermediate format, then
//! converted to BSON, with the `id` field mapped to MongoDB's `_id`
//! convention. Invoice dates are stored as `YYYY-MM-DD` strings, which
//! order lexicographically the same way they order chronologically, so
//! `$gt`/`$gte`/`$lte` comparisons work directly on the stored form.
//!
//! Single-record lookups by invoice number use `find_one` without a sort,
//! i.e. natural order — the first stored match, matching the in-memory
//! backend.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Database};

use crate::core::error::StorageError;
use crate::core::invoice::{Invoice, InvoiceChanges, InvoiceFilter};
use crate::core::service::InvoiceStore;

const COLLECTION: &str = "invoices";

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON
/// Document, renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value, renaming
/// `_id` → `id` for the domain convention.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// A date as stored in documents: plain ISO `YYYY-MM-DD`.
fn date_bson(date: NaiveDate) -> Bson {
    Bson::String(date.format("%Y-%m-%d").to_string())
}

/// Build a query document from a store filter.
fn filter_document(filter: &InvoiceFilter) -> Document {
    let mut query = doc! {};
    if let Some(fy) = &filter.financial_year {
        query.insert("financialYear", fy.as_str());
    }
    if let Some(number) = &filter.invoice_number {
        query.insert("invoiceNumber", number.as_str());
    }
    if let Some((start, end)) = filter.date_range {
        query.insert(
            "invoiceDate",
            doc! { "$gte": date_bson(start), "$lte": date_bson(end) },
        );
    }
    query
}

// ---------------------------------------------------------------------------
// MongoInvoiceStore
// ---------------------------------------------------------------------------

/// Invoice store backed by MongoDB.
#[derive(Clone, Debug)]
pub struct MongoInvoiceStore {
    database: Database,
}

impl MongoInvoiceStore {
    /// Wrap an existing database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Connect to a MongoDB deployment and select the database.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StorageError::Connection {
                backend: "MongoDB".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::new(client.database(database)))
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(COLLECTION)
    }

    /// Create indexes on the invoices collection for the lookup paths.
    ///
    /// - `invoiceNumber: 1` — number lookups for update/delete and the
    ///   chronological check
    /// - `invoiceNumber: 1, financialYear: 1` — the uniqueness check
    /// - `invoiceDate: 1` — the globally-next-date query
    ///
    /// Idempotent, safe to call on every startup. The compound index is not
    /// declared unique: the uniqueness rule is enforced by the service's
    /// read-then-write check, and that race stays documented rather than
    /// closed at the store level.
    pub async fn ensure_indexes(&self) -> Result<()> {
        use mongodb::IndexModel;

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "invoiceNumber": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "invoiceNumber": 1, "financialYear": 1 })
                .build(),
            IndexModel::builder().keys(doc! { "invoiceDate": 1 }).build(),
        ];

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| anyhow!("Failed to create indexes on invoices collection: {}", e))?;

        Ok(())
    }

    fn invoice_to_document(invoice: &Invoice) -> Result<Document> {
        let json = serde_json::to_value(invoice)
            .map_err(|e| anyhow!("Failed to serialize invoice: {}", e))?;
        json_to_document(json)
    }

    fn document_to_invoice(doc: Document) -> Result<Invoice> {
        let json = document_to_json(doc);
        serde_json::from_value(json)
            .map_err(|e| anyhow!("Failed to deserialize invoice from document: {}", e))
    }
}

#[async_trait]
impl InvoiceStore for MongoInvoiceStore {
    /// Insert the document and read it back to return the stored version.
    async fn insert(&self, invoice: Invoice) -> Result<Invoice> {
        let doc = Self::invoice_to_document(&invoice)?;
        let id_bson = Bson::String(invoice.id.to_string());

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| anyhow!("Failed to insert invoice: {}", e))?;

        let stored = self
            .collection()
            .find_one(doc! { "_id": id_bson })
            .await
            .map_err(|e| anyhow!("Failed to read back inserted invoice: {}", e))?
            .ok_or_else(|| anyhow!("Invoice not found after insert"))?;

        Self::document_to_invoice(stored)
    }

    async fn find(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>> {
        let cursor = self
            .collection()
            .find(filter_document(filter))
            .await
            .map_err(|e| anyhow!("Failed to query invoices: {}", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect invoices: {}", e))?;

        docs.into_iter().map(Self::document_to_invoice).collect()
    }

    async fn find_by_number(&self, invoice_number: &str) -> Result<Option<Invoice>> {
        let doc = self
            .collection()
            .find_one(doc! { "invoiceNumber": invoice_number })
            .await
            .map_err(|e| anyhow!("Failed to find invoice by number: {}", e))?;

        match doc {
            Some(d) => Ok(Some(Self::document_to_invoice(d)?)),
            None => Ok(None),
        }
    }

    async fn find_in_year(
        &self,
        invoice_number: &str,
        financial_year: &str,
    ) -> Result<Option<Invoice>> {
        let doc = self
            .collection()
            .find_one(doc! {
                "invoiceNumber": invoice_number,
                "financialYear": financial_year,
            })
            .await
            .map_err(|e| anyhow!("Failed to find invoice in financial year: {}", e))?;

        match doc {
            Some(d) => Ok(Some(Self::document_to_invoice(d)?)),
            None => Ok(None),
        }
    }

    /// Smallest invoice date strictly greater than `date`, across the whole
    /// collection.
    async fn find_first_after(&self, date: NaiveDate) -> Result<Option<Invoice>> {
        let cursor = self
            .collection()
            .find(doc! { "invoiceDate": { "$gt": date_bson(date) } })
            .sort(doc! { "invoiceDate": 1 })
            .limit(1)
            .await
            .map_err(|e| anyhow!("Failed to query next-dated invoice: {}", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect next-dated invoice: {}", e))?;

        match docs.into_iter().next() {
            Some(d) => Ok(Some(Self::document_to_invoice(d)?)),
            None => Ok(None),
        }
    }

    async fn update_by_number(
        &self,
        invoice_number: &str,
        changes: InvoiceChanges,
    ) -> Result<Option<Invoice>> {
        let updated_at = mongodb::bson::to_bson(&serde_json::to_value(Utc::now())?)
            .map_err(|e| anyhow!("Failed to encode timestamp: {}", e))?;

        let doc = self
            .collection()
            .find_one_and_update(
                doc! { "invoiceNumber": invoice_number },
                doc! { "$set": {
                    "invoiceDate": date_bson(changes.invoice_date),
                    "invoiceAmount": changes.invoice_amount,
                    "updatedAt": updated_at,
                } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| anyhow!("Failed to update invoice: {}", e))?;

        match doc {
            Some(d) => Ok(Some(Self::document_to_invoice(d)?)),
            None => Ok(None),
        }
    }

    async fn delete_by_number(&self, invoice_number: &str) -> Result<Option<Invoice>> {
        let doc = self
            .collection()
            .find_one_and_delete(doc! { "invoiceNumber": invoice_number })
            .await
            .map_err(|e| anyhow!("Failed to delete invoice: {}", e))?;

        match doc {
            Some(d) => Ok(Some(Self::document_to_invoice(d)?)),
            None => Ok(None),
        }
    }
}
