//! Bill store - row-level persistence for the `bills` table.
//!
//! Every function is generic over [`ConnectionTrait`] and issues a single statement,
//! so each write is atomic on its own. Updates and deletes report the number of
//! affected rows and leave not-found handling to the caller.

use crate::{
    entities::{Bill, bill},
    errors::Result,
};
use sea_orm::{QueryOrder, prelude::*};

/// Inserts a new row and returns it with its database-assigned id.
pub async fn insert_bill<C>(db: &C, row: bill::ActiveModel) -> Result<bill::Model>
where
    C: ConnectionTrait,
{
    row.insert(db).await.map_err(Into::into)
}

/// Returns every bill ordered by ascending id.
pub async fn select_all_bills<C>(db: &C) -> Result<Vec<bill::Model>>
where
    C: ConnectionTrait,
{
    Bill::find()
        .order_by_asc(bill::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the bill with the given id, if any.
pub async fn select_bill<C>(db: &C, bill_id: i64) -> Result<Option<bill::Model>>
where
    C: ConnectionTrait,
{
    Bill::find_by_id(bill_id).one(db).await.map_err(Into::into)
}

/// Writes the `Set` fields of `fields` to the row with the given id.
///
/// # Returns
/// The number of rows affected (0 when no such bill exists)
pub async fn update_bill_fields<C>(db: &C, bill_id: i64, fields: bill::ActiveModel) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Bill::update_many()
        .set(fields)
        .filter(bill::Column::Id.eq(bill_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Writes the `Set` fields of `fields` only if the row still holds the amounts and
/// payment details read in `current`.
///
/// The guard makes a read-then-write sequence safe without holding a transaction
/// open: a concurrent change to any of these columns turns the write into a no-op.
///
/// # Returns
/// The number of rows affected (0 when the bill is gone or was changed since the read)
pub async fn update_bill_if_unchanged<C>(
    db: &C,
    current: &bill::Model,
    fields: bill::ActiveModel,
) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Bill::update_many()
        .set(fields)
        .filter(bill::Column::Id.eq(current.id))
        .filter(bill::Column::AmountDueCents.eq(current.amount_due_cents))
        .filter(bill::Column::AmountPaidCents.eq(current.amount_paid_cents))
        .filter(bill::Column::DatePaid.eq(current.date_paid))
        .filter(bill::Column::PaidBy.eq(current.paid_by.as_str()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Permanently removes the row with the given id.
///
/// # Returns
/// The number of rows affected (0 when no such bill exists)
pub async fn delete_bill_row<C>(db: &C, bill_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Bill::delete_by_id(bill_id).exec(db).await?;
    Ok(result.rows_affected)
}
