//! Lifecycle service tests driven directly against the in-memory store.

mod common;

use futures::future::join_all;
use invoice_service::models::{CustomerInfo, InvoiceDraft, InvoicePatch, InvoiceStatus, ItemInput};
use invoice_service::services::{InvoiceService, MemoryInvoiceStore};
use service_core::error::AppError;
use std::collections::BTreeSet;
use std::sync::Arc;

fn service() -> InvoiceService {
    InvoiceService::new(
        Arc::new(MemoryInvoiceStore::new()),
        common::test_config().defaults,
    )
}

fn customer(name: &str) -> CustomerInfo {
    CustomerInfo {
        company_name: name.to_string(),
        attention: None,
        phone: None,
    }
}

fn item(description: &str, quantity: f64, price: f64) -> ItemInput {
    ItemInput {
        item_number: None,
        description: description.to_string(),
        quantity,
        price,
        image: None,
    }
}

fn furniture_draft() -> InvoiceDraft {
    InvoiceDraft {
        quote_number: None,
        date: None,
        validity_period: None,
        customer: customer("Petra Hotels Group"),
        items: vec![
            item("Office desk, walnut", 16.0, 56.0),
            item("Executive chair", 2.0, 172.5),
            item("Filing cabinet", 1.0, 86.5),
        ],
        tax_rate: Some(16.0),
        terms: None,
        notes: None,
    }
}

#[tokio::test]
async fn create_prices_the_draft_and_assigns_identity() {
    let invoices = service();

    let invoice = invoices.create(furniture_draft()).await.unwrap();

    assert_eq!(invoice.id, 1001);
    assert_eq!(invoice.status, InvoiceStatus::Draft);
    assert!((invoice.subtotal - 1327.5).abs() < 1e-9);
    assert!((invoice.tax - 212.4).abs() < 1e-9);
    assert!((invoice.total - 1539.9).abs() < 1e-9);
}

#[tokio::test]
async fn default_tax_rate_applies_when_draft_leaves_it_unset() {
    let invoices = service();

    let mut draft = furniture_draft();
    draft.tax_rate = None;
    let invoice = invoices.create(draft).await.unwrap();

    assert_eq!(invoice.tax_rate, 16.0);
    assert!((invoice.tax - 212.4).abs() < 1e-9);
}

#[tokio::test]
async fn concurrent_creates_assign_unique_sequential_ids() {
    let invoices = service();

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let invoices = invoices.clone();
            tokio::spawn(async move { invoices.create(furniture_draft()).await })
        })
        .collect();

    let ids: BTreeSet<i64> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap().id)
        .collect();

    let expected: BTreeSet<i64> = (1001..=1020).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn update_with_same_data_is_idempotent() {
    let invoices = service();
    let created = invoices.create(furniture_draft()).await.unwrap();

    let patch = InvoicePatch {
        items: Some(vec![item("Executive chair", 4.0, 172.5)]),
        ..Default::default()
    };

    let first = invoices.update(created.id, patch.clone()).await.unwrap();
    let second = invoices.update(created.id, patch).await.unwrap();

    assert_eq!(first.subtotal, second.subtotal);
    assert_eq!(first.tax, second.tax);
    assert_eq!(first.total, second.total);
    assert_eq!(first.items, second.items);
}

#[tokio::test]
async fn totals_do_not_depend_on_how_the_items_were_built() {
    let invoices = service();

    // All at once
    let all_at_once = invoices.create(furniture_draft()).await.unwrap();

    // Incrementally: start from a placeholder quantity/price and patch the
    // fields one write at a time, the way a form edit session would
    let mut draft = furniture_draft();
    draft.items = vec![
        item("Office desk, walnut", 1.0, 0.0),
        item("Executive chair", 2.0, 172.5),
        item("Filing cabinet", 1.0, 86.5),
    ];
    let staged = invoices.create(draft).await.unwrap();

    let quantity_set = InvoicePatch {
        items: Some(vec![
            item("Office desk, walnut", 16.0, 0.0),
            item("Executive chair", 2.0, 172.5),
            item("Filing cabinet", 1.0, 86.5),
        ]),
        ..Default::default()
    };
    invoices.update(staged.id, quantity_set).await.unwrap();

    let price_set = InvoicePatch {
        items: Some(vec![
            item("Office desk, walnut", 16.0, 56.0),
            item("Executive chair", 2.0, 172.5),
            item("Filing cabinet", 1.0, 86.5),
        ]),
        ..Default::default()
    };
    let stepwise = invoices.update(staged.id, price_set).await.unwrap();

    assert_eq!(stepwise.subtotal, all_at_once.subtotal);
    assert_eq!(stepwise.tax, all_at_once.tax);
    assert_eq!(stepwise.total, all_at_once.total);
}

#[tokio::test]
async fn create_rejects_an_empty_item_list() {
    let invoices = service();

    let mut draft = furniture_draft();
    draft.items.clear();

    let err = invoices.create(draft).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn create_rejects_blank_company_name() {
    let invoices = service();

    let mut draft = furniture_draft();
    draft.customer = customer("   ");

    let err = invoices.create(draft).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn create_rejects_non_positive_quantity() {
    let invoices = service();

    let mut draft = furniture_draft();
    draft.items[0].quantity = 0.0;

    let err = invoices.create(draft).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn create_rejects_negative_tax_rate() {
    let invoices = service();

    let mut draft = furniture_draft();
    draft.tax_rate = Some(-5.0);

    let err = invoices.create(draft).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn validation_happens_before_any_write() {
    let invoices = service();

    let mut draft = furniture_draft();
    draft.items[0].price = -10.0;
    assert!(invoices.create(draft).await.is_err());

    assert!(invoices.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_of_missing_id_is_not_found() {
    let invoices = service();

    let err = invoices
        .update(7777, InvoicePatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(invoices.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_of_missing_id_is_not_found() {
    let invoices = service();
    let created = invoices.create(furniture_draft()).await.unwrap();

    invoices.delete(created.id).await.unwrap();
    let err = invoices.delete(created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
