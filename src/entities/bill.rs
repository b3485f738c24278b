//! Bill entity - The single table of the bill tracker.
//!
//! Each bill records who is owed (`payee`), a free-form `bill_type`, the amount due
//! and due date, and the payment fields. Amounts are stored in integer cents.
//! `is_paid` and `paid_in_full` are derived columns written only by the service layer.

use sea_orm::entity::prelude::*;

/// Bill database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    /// Unique identifier, assigned by the database on insert
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Who the bill is owed to (e.g., "Primary Care Doctor")
    pub payee: String,
    /// Category of the bill (e.g., "Medical", "Utilities")
    pub bill_type: String,
    /// Amount owed, in cents
    pub amount_due_cents: i64,
    /// Calendar date the bill is due
    pub due_date: Date,
    /// True once any payment has been recorded
    pub is_paid: bool,
    /// True when the amount paid equals the amount due
    pub paid_in_full: bool,
    /// Amount paid so far, in cents
    pub amount_paid_cents: i64,
    /// Date of payment, or the unpaid sentinel date
    pub date_paid: Date,
    /// Payment method or payer; empty until paid
    pub paid_by: String,
}

/// Bills have no relationships to other tables
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
