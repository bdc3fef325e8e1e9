//! In-memory invoice store.

use crate::models::{CreateInvoice, Invoice, InvoiceStatus, UpdateInvoice};
use crate::services::store::{FIRST_INVOICE_ID, InvoiceStore};
use async_trait::async_trait;
use chrono::Utc;
use service_core::error::AppError;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Invoice store backed by a process-local map.
///
/// Intended for tests and local development. The lock serializes the
/// id-assignment read-modify-write, so concurrent creations always get
/// distinct consecutive ids.
#[derive(Debug, Default)]
pub struct MemoryInvoiceStore {
    records: RwLock<BTreeMap<i64, Invoice>>,
}

impl MemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error() -> AppError {
        AppError::InternalError(anyhow::anyhow!("invoice store lock poisoned"))
    }
}

#[async_trait]
impl InvoiceStore for MemoryInvoiceStore {
    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let records = self.records.read().map_err(|_| Self::lock_error())?;
        Ok(records.values().rev().cloned().collect())
    }

    async fn get_invoice(&self, id: i64) -> Result<Option<Invoice>, AppError> {
        let records = self.records.read().map_err(|_| Self::lock_error())?;
        Ok(records.get(&id).cloned())
    }

    async fn create_invoice(&self, input: &CreateInvoice) -> Result<Invoice, AppError> {
        let mut records = self.records.write().map_err(|_| Self::lock_error())?;
        let id = records
            .keys()
            .next_back()
            .map(|max| max + 1)
            .unwrap_or(FIRST_INVOICE_ID);

        let now = Utc::now();
        let invoice = Invoice {
            id,
            quote_number: input.quote_number.clone(),
            date: input.date.unwrap_or_else(|| now.date_naive()),
            validity_period: input.validity_period,
            customer: input.customer.clone(),
            items: input.items.clone(),
            tax_rate: input.tax_rate,
            subtotal: input.subtotal,
            tax: input.tax,
            total: input.total,
            terms: input.terms.clone(),
            notes: input.notes.clone(),
            status: InvoiceStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        records.insert(id, invoice.clone());
        Ok(invoice)
    }

    async fn update_invoice(
        &self,
        id: i64,
        input: &UpdateInvoice,
    ) -> Result<Option<Invoice>, AppError> {
        let mut records = self.records.write().map_err(|_| Self::lock_error())?;
        let Some(existing) = records.get_mut(&id) else {
            return Ok(None);
        };

        existing.quote_number = input.quote_number.clone();
        existing.date = input.date;
        existing.validity_period = input.validity_period;
        existing.customer = input.customer.clone();
        existing.items = input.items.clone();
        existing.tax_rate = input.tax_rate;
        existing.subtotal = input.subtotal;
        existing.tax = input.tax;
        existing.total = input.total;
        existing.terms = input.terms.clone();
        existing.notes = input.notes.clone();
        existing.status = input.status;
        existing.updated_at = Utc::now();

        Ok(Some(existing.clone()))
    }

    async fn delete_invoice(&self, id: i64) -> Result<bool, AppError> {
        let mut records = self.records.write().map_err(|_| Self::lock_error())?;
        Ok(records.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
