//! Domain models for invoice-service.

mod invoice;

pub use invoice::{
    CreateInvoice, CustomerInfo, Invoice, InvoiceDraft, InvoiceItem, InvoicePatch, InvoiceStatus,
    ItemInput, UpdateInvoice,
};
