//! JSON shapes returned to the presentation layer.

use crate::{core::Cents, entities::bill};
use chrono::NaiveDate;
use serde::Serialize;

/// A bill as it crosses the HTTP boundary: camelCase keys, decimal amounts,
/// `YYYY-MM-DD` dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillResponse {
    /// Bill id
    pub id: i64,
    /// Payee
    pub from: String,
    /// Category
    #[serde(rename = "type")]
    pub bill_type: String,
    /// Amount owed
    pub amount_due: Cents,
    /// Due date
    pub due_date: NaiveDate,
    /// Any payment recorded
    pub is_paid: bool,
    /// Paid exactly in full
    pub paid_in_full: bool,
    /// Amount paid so far
    pub amount_paid: Cents,
    /// Payment date, or the unpaid sentinel
    pub date_paid: NaiveDate,
    /// Payment method or payer
    pub paid_by: String,
}

impl From<bill::Model> for BillResponse {
    fn from(model: bill::Model) -> Self {
        Self {
            id: model.id,
            from: model.payee,
            bill_type: model.bill_type,
            amount_due: Cents::new(model.amount_due_cents),
            due_date: model.due_date,
            is_paid: model.is_paid,
            paid_in_full: model.paid_in_full,
            amount_paid: Cents::new(model.amount_paid_cents),
            date_paid: model.date_paid,
            paid_by: model.paid_by,
        }
    }
}

/// Body of `GET /bills/amountPaid/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountPaidResponse {
    /// Amount paid so far
    pub amount_paid: Cents,
}
