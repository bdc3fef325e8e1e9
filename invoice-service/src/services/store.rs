//! Storage contract for invoice records.

use crate::models::{CreateInvoice, Invoice, UpdateInvoice};
use async_trait::async_trait;
use service_core::error::AppError;

/// Id assigned to the first invoice in an empty store. Numbering starts
/// well above 1 so generated ids never collide with the legacy paper
/// invoices the company still has on file.
pub const FIRST_INVOICE_ID: i64 = 1001;

/// Uniform contract over the backing medium for invoice records.
///
/// Implementations must make `create_invoice` safe under concurrent
/// callers: the `max(id) + 1` computation and the subsequent write have to
/// be serialized (lock, constraint-plus-retry, transaction) so two racing
/// creations never both observe the same next id.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// All invoices, newest first (descending id).
    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError>;

    async fn get_invoice(&self, id: i64) -> Result<Option<Invoice>, AppError>;

    /// Persist a new record: assigns the next id (floor
    /// [`FIRST_INVOICE_ID`]), sets `status` to draft, defaults `date` to
    /// today and stamps both timestamps. Returns the stored record.
    async fn create_invoice(&self, input: &CreateInvoice) -> Result<Invoice, AppError>;

    /// Replace the editable fields of an existing record, preserving `id`
    /// and `created_at` and bumping `updated_at`. `None` if the id is
    /// absent; the record is never created by an update.
    async fn update_invoice(
        &self,
        id: i64,
        input: &UpdateInvoice,
    ) -> Result<Option<Invoice>, AppError>;

    /// Remove a record. `false` if the id was absent.
    async fn delete_invoice(&self, id: i64) -> Result<bool, AppError>;

    /// Probe the backing medium.
    async fn health_check(&self) -> Result<(), AppError>;
}
