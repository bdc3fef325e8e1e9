use crate::models::{CustomerInfo, InvoiceDraft, InvoicePatch, InvoiceStatus, ItemInput};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CustomerPayload {
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    pub attention: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ItemPayload {
    pub item_number: Option<String>,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(range(min = 1.0, message = "Quantity must be at least 1"))]
    pub quantity: f64,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,

    pub image: Option<String>,
}

/// Body for `POST /invoices`. Aggregate fields (`subtotal`, `tax`,
/// `total`, item `extension`) are not accepted here: the server derives
/// them from the items on every write.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    pub quote_number: Option<String>,
    pub date: Option<NaiveDate>,
    pub validity_period: Option<i32>,

    #[validate(nested)]
    pub customer: CustomerPayload,

    #[validate(length(min = 1, message = "At least one item is required"), nested)]
    pub items: Vec<ItemPayload>,

    #[validate(range(min = 0.0, message = "Tax rate must not be negative"))]
    pub tax_rate: Option<f64>,

    pub terms: Option<String>,
    pub notes: Option<String>,
}

/// Body for `PUT /invoices/:id`. Absent fields keep their stored values.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
    pub quote_number: Option<String>,
    pub date: Option<NaiveDate>,
    pub validity_period: Option<i32>,

    #[validate(nested)]
    pub customer: Option<CustomerPayload>,

    #[validate(length(min = 1, message = "At least one item is required"), nested)]
    pub items: Option<Vec<ItemPayload>>,

    #[validate(range(min = 0.0, message = "Tax rate must not be negative"))]
    pub tax_rate: Option<f64>,

    pub terms: Option<String>,
    pub notes: Option<String>,
    pub status: Option<InvoiceStatus>,
}

impl From<CustomerPayload> for CustomerInfo {
    fn from(payload: CustomerPayload) -> Self {
        CustomerInfo {
            company_name: payload.company_name,
            attention: payload.attention,
            phone: payload.phone,
        }
    }
}

impl From<ItemPayload> for ItemInput {
    fn from(payload: ItemPayload) -> Self {
        ItemInput {
            item_number: payload.item_number,
            description: payload.description,
            quantity: payload.quantity,
            price: payload.price,
            image: payload.image,
        }
    }
}

impl From<CreateInvoiceRequest> for InvoiceDraft {
    fn from(req: CreateInvoiceRequest) -> Self {
        InvoiceDraft {
            quote_number: req.quote_number,
            date: req.date,
            validity_period: req.validity_period,
            customer: req.customer.into(),
            items: req.items.into_iter().map(ItemInput::from).collect(),
            tax_rate: req.tax_rate,
            terms: req.terms,
            notes: req.notes,
        }
    }
}

impl From<UpdateInvoiceRequest> for InvoicePatch {
    fn from(req: UpdateInvoiceRequest) -> Self {
        InvoicePatch {
            quote_number: req.quote_number,
            date: req.date,
            validity_period: req.validity_period,
            customer: req.customer.map(CustomerInfo::from),
            items: req
                .items
                .map(|items| items.into_iter().map(ItemInput::from).collect()),
            tax_rate: req.tax_rate,
            terms: req.terms,
            notes: req.notes,
            status: req.status,
        }
    }
}
