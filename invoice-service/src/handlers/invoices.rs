use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use service_core::error::AppError;

use crate::dtos::invoice::{CreateInvoiceRequest, UpdateInvoiceRequest};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// All invoices, newest first.
pub async fn list_invoices(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let invoices = state.invoices.list().await?;
    Ok(Json(invoices))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state.invoices.get(id).await?;
    Ok(Json(invoice))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state.invoices.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state.invoices.update(id, req.into()).await?;
    Ok(Json(invoice))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.invoices.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
