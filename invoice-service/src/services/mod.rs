//! Services for invoice-service.

pub mod auth;
pub mod database;
pub mod invoices;
pub mod memory;
pub mod metrics;
pub mod store;

pub use auth::{AuthService, Session, SessionToken};
pub use database::PgInvoiceStore;
pub use invoices::InvoiceService;
pub use memory::MemoryInvoiceStore;
pub use metrics::{get_metrics, init_metrics};
pub use store::{FIRST_INVOICE_ID, InvoiceStore};
