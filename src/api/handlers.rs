//! HTTP handlers - one per bill operation.
//!
//! Handlers only parse the path and body and format the result; validation and
//! status derivation live in [`crate::core::bill`].

use super::{
    AppState,
    error::body_rejection,
    response::{AmountPaidResponse, BillResponse},
};
use crate::{
    core::bill::{self, AddBillRequest, PayBillRequest, UpdateBillRequest},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::{Value, json};

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /bills`
pub async fn list_bills(State(state): State<AppState>) -> Result<Json<Vec<BillResponse>>> {
    let bills = bill::list_bills(&state.db).await?;
    Ok(Json(bills.into_iter().map(BillResponse::from).collect()))
}

/// `GET /bills/{id}`
pub async fn get_bill(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<BillResponse>> {
    let bill_id = bill::parse_bill_id(&raw_id)?;
    bill::get_bill_by_id(&state.db, bill_id)
        .await?
        .map(|found| Json(BillResponse::from(found)))
        .ok_or(Error::BillNotFound { id: bill_id })
}

/// `GET /bills/amountPaid/{id}`
pub async fn get_amount_paid(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<AmountPaidResponse>> {
    let bill_id = bill::parse_bill_id(&raw_id)?;
    bill::get_amount_paid(&state.db, bill_id)
        .await?
        .map(|amount_paid| Json(AmountPaidResponse { amount_paid }))
        .ok_or(Error::BillNotFound { id: bill_id })
}

/// `POST /addbill`
pub async fn add_bill(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddBillRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BillResponse>)> {
    let Json(request) = payload.map_err(|rejection| body_rejection(&rejection))?;
    let created = bill::add_bill(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(BillResponse::from(created))))
}

/// `PATCH /paybill/{id}`
pub async fn pay_bill(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: std::result::Result<Json<PayBillRequest>, JsonRejection>,
) -> Result<String> {
    let bill_id = bill::parse_bill_id(&raw_id)?;
    let Json(request) = payload.map_err(|rejection| body_rejection(&rejection))?;
    let paid = bill::pay_bill(&state.db, bill_id, request).await?;

    let message = if paid.paid_in_full {
        format!("Bill {bill_id} paid in full")
    } else {
        let response = BillResponse::from(paid);
        format!(
            "Payment of {} recorded for bill {bill_id} ({} due)",
            response.amount_paid, response.amount_due
        )
    };
    Ok(message)
}

/// `PATCH /updatebill/{id}`
pub async fn update_bill(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: std::result::Result<Json<UpdateBillRequest>, JsonRejection>,
) -> Result<String> {
    let bill_id = bill::parse_bill_id(&raw_id)?;
    let Json(request) = payload.map_err(|rejection| body_rejection(&rejection))?;
    bill::update_bill(&state.db, bill_id, request).await?;
    Ok(format!("Bill {bill_id} updated"))
}

/// `DELETE /bills/{id}`
pub async fn delete_bill(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<String> {
    let bill_id = bill::parse_bill_id(&raw_id)?;
    bill::delete_bill(&state.db, bill_id).await?;
    Ok(format!("Bill {bill_id} deleted"))
}
