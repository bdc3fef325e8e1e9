//! Invoice model for invoice-service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "sent" => InvoiceStatus::Sent,
            "paid" => InvoiceStatus::Paid,
            _ => InvoiceStatus::Draft,
        }
    }
}

/// Customer block on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub company_name: String,
    pub attention: Option<String>,
    pub phone: Option<String>,
}

/// A line on an invoice. `extension` is always derived from the current
/// `quantity` and `price` when the invoice is written; stored values are
/// never trusted on the way back in. `image` is an opaque reference owned
/// by the upload collaborator and is round-tripped uninterpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub item_number: Option<String>,
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub extension: f64,
    pub image: Option<String>,
}

/// Invoice document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub quote_number: Option<String>,
    pub date: NaiveDate,
    pub validity_period: i32,
    pub customer: CustomerInfo,
    pub items: Vec<InvoiceItem>,
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub terms: Option<String>,
    pub notes: Option<String>,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Line input to the lifecycle service. Extensions are computed, never
/// accepted from the caller.
#[derive(Debug, Clone)]
pub struct ItemInput {
    pub item_number: Option<String>,
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub image: Option<String>,
}

/// Draft submitted to the lifecycle service for creation. Totals are absent
/// on purpose: they are always recomputed server-side.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub quote_number: Option<String>,
    pub date: Option<NaiveDate>,
    pub validity_period: Option<i32>,
    pub customer: CustomerInfo,
    pub items: Vec<ItemInput>,
    pub tax_rate: Option<f64>,
    pub terms: Option<String>,
    pub notes: Option<String>,
}

/// Patch for an existing invoice. Absent fields keep their stored values;
/// there is no id field, the addressed id is authoritative.
#[derive(Debug, Clone, Default)]
pub struct InvoicePatch {
    pub quote_number: Option<String>,
    pub date: Option<NaiveDate>,
    pub validity_period: Option<i32>,
    pub customer: Option<CustomerInfo>,
    pub items: Option<Vec<ItemInput>>,
    pub tax_rate: Option<f64>,
    pub terms: Option<String>,
    pub notes: Option<String>,
    pub status: Option<InvoiceStatus>,
}

/// Fully-priced record handed to the store for insertion. The store assigns
/// the id, stamps the timestamps and defaults the date to today.
#[derive(Debug, Clone)]
pub struct CreateInvoice {
    pub quote_number: Option<String>,
    pub date: Option<NaiveDate>,
    pub validity_period: i32,
    pub customer: CustomerInfo,
    pub items: Vec<InvoiceItem>,
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub terms: Option<String>,
    pub notes: Option<String>,
}

/// Full replacement state for an update. The lifecycle service merges the
/// caller's patch over the stored record and recomputes totals before
/// building this; the store writes it wholesale and bumps `updated_at`.
#[derive(Debug, Clone)]
pub struct UpdateInvoice {
    pub quote_number: Option<String>,
    pub date: NaiveDate,
    pub validity_period: i32,
    pub customer: CustomerInfo,
    pub items: Vec<InvoiceItem>,
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub terms: Option<String>,
    pub notes: Option<String>,
    pub status: InvoiceStatus,
}
