//! Invoice lifecycle service.
//!
//! The single entry point for everything that touches invoice records:
//! validates drafts, prices them, and delegates persistence to the injected
//! store. Totals are recomputed from the current item list on every create
//! and update, so a stale or dishonest aggregate submitted by a client can
//! never reach storage.

use crate::config::InvoiceDefaults;
use crate::models::{
    CreateInvoice, Invoice, InvoiceDraft, InvoiceItem, InvoicePatch, ItemInput, UpdateInvoice,
};
use crate::services::metrics::INVOICES_TOTAL;
use crate::services::store::InvoiceStore;
use crate::totals;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<dyn InvoiceStore>,
    defaults: InvoiceDefaults,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn InvoiceStore>, defaults: InvoiceDefaults) -> Self {
        Self { store, defaults }
    }

    pub async fn list(&self) -> Result<Vec<Invoice>, AppError> {
        self.store.list_invoices().await
    }

    pub async fn get(&self, id: i64) -> Result<Invoice, AppError> {
        self.store
            .get_invoice(id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} not found", id)))
    }

    #[instrument(skip(self, draft), fields(customer = %draft.customer.company_name))]
    pub async fn create(&self, draft: InvoiceDraft) -> Result<Invoice, AppError> {
        validate_customer(&draft.customer.company_name)?;
        let tax_rate = draft.tax_rate.unwrap_or(self.defaults.tax_rate_percent);
        let (items, subtotal, tax, total) = price_items(&draft.items, tax_rate)?;

        let input = CreateInvoice {
            quote_number: draft.quote_number,
            date: draft.date,
            validity_period: draft
                .validity_period
                .unwrap_or(self.defaults.validity_days),
            customer: draft.customer,
            items,
            tax_rate,
            subtotal,
            tax,
            total,
            terms: draft.terms,
            notes: draft.notes,
        };

        let invoice = self.store.create_invoice(&input).await?;
        INVOICES_TOTAL
            .with_label_values(&[invoice.status.as_str()])
            .inc();
        info!(invoice_id = %invoice.id, total = %invoice.total, "Invoice created");
        Ok(invoice)
    }

    /// Merge a patch over the stored record and persist the result. The
    /// addressed id is authoritative and immutable; totals come out of the
    /// merged item list, never out of the patch.
    #[instrument(skip(self, patch), fields(invoice_id = %id))]
    pub async fn update(&self, id: i64, patch: InvoicePatch) -> Result<Invoice, AppError> {
        let existing = self.get(id).await?;

        let customer = patch.customer.unwrap_or(existing.customer);
        validate_customer(&customer.company_name)?;

        let item_inputs = match patch.items {
            Some(items) => items,
            None => existing.items.into_iter().map(ItemInput::from).collect(),
        };
        let tax_rate = patch.tax_rate.unwrap_or(existing.tax_rate);
        let (items, subtotal, tax, total) = price_items(&item_inputs, tax_rate)?;

        let input = UpdateInvoice {
            quote_number: patch.quote_number.or(existing.quote_number),
            date: patch.date.unwrap_or(existing.date),
            validity_period: patch.validity_period.unwrap_or(existing.validity_period),
            customer,
            items,
            tax_rate,
            subtotal,
            tax,
            total,
            terms: patch.terms.or(existing.terms),
            notes: patch.notes.or(existing.notes),
            status: patch.status.unwrap_or(existing.status),
        };

        let updated = self
            .store
            .update_invoice(id, &input)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} not found", id)))?;
        info!(invoice_id = %updated.id, total = %updated.total, "Invoice updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let deleted = self.store.delete_invoice(id).await?;
        if !deleted {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Invoice {} not found",
                id
            )));
        }
        info!(invoice_id = %id, "Invoice deleted");
        Ok(())
    }

    pub async fn health(&self) -> Result<(), AppError> {
        self.store.health_check().await
    }
}

impl From<InvoiceItem> for ItemInput {
    fn from(item: InvoiceItem) -> Self {
        ItemInput {
            item_number: item.item_number,
            description: item.description,
            quantity: item.quantity,
            price: item.price,
            image: item.image,
        }
    }
}

fn validate_customer(company_name: &str) -> Result<(), AppError> {
    if company_name.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Customer company name is required"
        )));
    }
    Ok(())
}

/// Price a draft item list: recompute every extension from quantity and
/// price, then derive subtotal, tax and total in one pass.
fn price_items(
    inputs: &[ItemInput],
    tax_rate: f64,
) -> Result<(Vec<InvoiceItem>, f64, f64, f64), AppError> {
    if inputs.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "An invoice needs at least one item"
        )));
    }

    let mut items = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input.description.trim().is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Item description is required"
            )));
        }
        if input.quantity <= 0.0 {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Item quantity must be greater than zero"
            )));
        }
        let extension = totals::line_extension(input.quantity, input.price)?;
        items.push(InvoiceItem {
            item_number: input.item_number.clone(),
            description: input.description.clone(),
            quantity: input.quantity,
            price: input.price,
            extension,
            image: input.image.clone(),
        });
    }

    let subtotal = totals::invoice_subtotal(&items);
    let tax = totals::sales_tax(subtotal, tax_rate)?;
    let total = totals::invoice_total(subtotal, tax);
    Ok((items, subtotal, tax, total))
}
