//! Invoice totals arithmetic.
//!
//! All money math runs on IEEE-754 doubles; rounding happens at display
//! time only. The subtotal is always a single pass over the current item
//! state, never an accumulator updated per field change, so an item can
//! only ever contribute once.

use crate::models::InvoiceItem;
use service_core::error::AppError;

/// Line extension: `quantity * price`.
pub fn line_extension(quantity: f64, price: f64) -> Result<f64, AppError> {
    if !quantity.is_finite() || !price.is_finite() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Quantity and price must be finite numbers"
        )));
    }
    if quantity < 0.0 || price < 0.0 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Quantity and price must not be negative"
        )));
    }
    Ok(quantity * price)
}

/// Sum of the extensions over the current item list.
pub fn invoice_subtotal(items: &[InvoiceItem]) -> f64 {
    items.iter().map(|item| item.extension).sum()
}

/// Tax amount for a subtotal at a percentage rate.
pub fn sales_tax(subtotal: f64, tax_rate_percent: f64) -> Result<f64, AppError> {
    if !tax_rate_percent.is_finite() || tax_rate_percent < 0.0 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Tax rate must be a non-negative percentage"
        )));
    }
    Ok(subtotal * tax_rate_percent / 100.0)
}

/// Final total.
pub fn invoice_total(subtotal: f64, tax: f64) -> f64 {
    subtotal + tax
}
