//! Bill business logic - request schemas, validation, and the bill operations.
//!
//! This module turns loosely-typed client requests into validated bill data, derives the
//! payment status flags on every write, and delegates persistence to [`super::store`].
//! Pay and update read the current row and write the new one with a single guarded
//! `UPDATE`, so a bill is never left half-updated and concurrent writers to different
//! bills never wait on each other's locks.

use super::{
    money::{AmountInput, Cents},
    status::derive_status,
    store,
};
use crate::{
    entities::bill,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, Set};
use serde::{Deserialize, de::IgnoredAny};
use tracing::{debug, info, instrument, warn};

/// Placeholder `date_paid` for bills with no payment recorded (9999-12-31).
#[must_use]
pub fn unpaid_date_sentinel() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Body of an add-bill request.
///
/// Every business field is optional here so validation can report all missing fields
/// at once. `id`, `isPaid`, and `paidInFull` are accepted and discarded.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddBillRequest {
    /// Payee name
    pub from: Option<String>,
    /// Bill category
    #[serde(rename = "type")]
    pub bill_type: Option<String>,
    /// Amount owed
    pub amount_due: Option<AmountInput>,
    /// Due date, `YYYY-MM-DD`
    pub due_date: Option<String>,
    /// Ignored; ids are assigned by the store
    pub id: Option<IgnoredAny>,
    /// Ignored; derived
    pub is_paid: Option<IgnoredAny>,
    /// Ignored; derived
    pub paid_in_full: Option<IgnoredAny>,
}

/// Body of a pay-bill request.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PayBillRequest {
    /// The client's view of the amount due. Status is derived from the stored amount.
    pub amount_due: Option<AmountInput>,
    /// Amount being recorded as paid
    pub amount_paid: Option<AmountInput>,
    /// Payment date, `YYYY-MM-DD`
    pub date_paid: Option<String>,
    /// Payment method or payer
    pub paid_by: Option<String>,
    /// Ignored; the path carries the id
    pub id: Option<IgnoredAny>,
    /// Ignored; derived
    pub is_paid: Option<IgnoredAny>,
    /// Ignored; derived
    pub paid_in_full: Option<IgnoredAny>,
}

/// Body of an update-bill request. Payment fields are optional and keep their stored
/// values when omitted.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateBillRequest {
    /// Payee name
    pub from: Option<String>,
    /// Bill category
    #[serde(rename = "type")]
    pub bill_type: Option<String>,
    /// Amount owed
    pub amount_due: Option<AmountInput>,
    /// Due date, `YYYY-MM-DD`
    pub due_date: Option<String>,
    /// Amount paid; `0` marks the bill unpaid again
    pub amount_paid: Option<AmountInput>,
    /// Payment date, `YYYY-MM-DD`
    pub date_paid: Option<String>,
    /// Payment method or payer
    pub paid_by: Option<String>,
    /// Ignored; the path carries the id
    pub id: Option<IgnoredAny>,
    /// Ignored; derived
    pub is_paid: Option<IgnoredAny>,
    /// Ignored; derived
    pub paid_in_full: Option<IgnoredAny>,
}

/// Validated fields of a new bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBill {
    /// Payee name, trimmed
    pub payee: String,
    /// Bill category, trimmed
    pub bill_type: String,
    /// Amount owed, positive
    pub amount_due: Cents,
    /// Due date
    pub due_date: NaiveDate,
}

/// Validated fields of a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    /// Amount paid, positive
    pub amount_paid: Cents,
    /// Payment date
    pub date_paid: NaiveDate,
    /// Payment method or payer, trimmed
    pub paid_by: String,
    /// Amount due as claimed by the client, if sent
    pub claimed_amount_due: Option<Cents>,
}

/// Validated fields of a bill update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillChanges {
    /// Replacement details
    pub details: NewBill,
    /// New amount paid, if supplied
    pub amount_paid: Option<Cents>,
    /// New payment date, if supplied
    pub date_paid: Option<NaiveDate>,
    /// New payment method, if supplied
    pub paid_by: Option<String>,
}

/// Collects the names of required fields that are absent while parsing the rest.
#[derive(Debug, Default)]
struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    fn text(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        let value = value
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        if value.is_none() {
            self.missing.push(field);
        }
        value
    }

    /// Zero counts as missing: a required amount must be positive.
    fn amount(&mut self, field: &'static str, value: Option<AmountInput>) -> Result<Option<Cents>> {
        let cents = match value.filter(|input| !input.is_blank()) {
            Some(input) => Some(input.to_cents(field)?).filter(|cents| cents.is_positive()),
            None => None,
        };
        if cents.is_none() {
            self.missing.push(field);
        }
        Ok(cents)
    }

    fn date(&mut self, field: &'static str, value: Option<String>) -> Result<Option<NaiveDate>> {
        let date = optional_date(field, value)?;
        if date.is_none() {
            self.missing.push(field);
        }
        Ok(date)
    }

    fn present<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.missing.push(field);
        }
        value
    }

    fn into_error(self) -> Error {
        Error::MissingFields {
            fields: self.missing,
        }
    }
}

/// Parses a `YYYY-MM-DD` date. A full timestamp is accepted and truncated to its date.
fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.split_once('T').map_or(trimmed, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| Error::InvalidField {
        field,
        reason: format!("'{raw}' is not a YYYY-MM-DD date ({e})"),
    })
}

fn optional_date(field: &'static str, value: Option<String>) -> Result<Option<NaiveDate>> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_date(field, &raw))
        .transpose()
}

fn optional_amount(field: &'static str, value: Option<AmountInput>) -> Result<Option<Cents>> {
    value
        .filter(|input| !input.is_blank())
        .map(|input| input.to_cents(field))
        .transpose()
}

impl AddBillRequest {
    /// Checks required fields and parses amounts and dates.
    ///
    /// # Errors
    /// `Error::MissingFields` naming every absent field, or the parse error of the
    /// first malformed field.
    pub fn validate(self) -> Result<NewBill> {
        let mut required = RequiredFields::default();
        let payee = required.text("from", self.from);
        let bill_type = required.text("type", self.bill_type);
        let amount_due = required.amount("amountDue", self.amount_due)?;
        let due_date = required.date("dueDate", self.due_date)?;

        match (payee, bill_type, amount_due, due_date) {
            (Some(payee), Some(bill_type), Some(amount_due), Some(due_date)) => Ok(NewBill {
                payee,
                bill_type,
                amount_due,
                due_date,
            }),
            _ => Err(required.into_error()),
        }
    }
}

impl PayBillRequest {
    /// Checks the payment fields and parses them.
    ///
    /// # Errors
    /// `Error::MissingFields` naming every absent field, or the parse error of the
    /// first malformed field.
    pub fn validate(self) -> Result<Payment> {
        let claimed_amount_due = optional_amount("amountDue", self.amount_due)?;
        let mut required = RequiredFields::default();
        let amount_paid = required.amount("amountPaid", self.amount_paid)?;
        let date_paid = required.date("datePaid", self.date_paid)?;
        let paid_by = required.text("paidBy", self.paid_by);

        match (amount_paid, date_paid, paid_by) {
            (Some(amount_paid), Some(date_paid), Some(paid_by)) => Ok(Payment {
                amount_paid,
                date_paid,
                paid_by,
                claimed_amount_due,
            }),
            _ => Err(required.into_error()),
        }
    }
}

impl UpdateBillRequest {
    /// Checks the required detail fields and parses everything supplied.
    ///
    /// # Errors
    /// `Error::MissingFields` naming every absent required field, or the parse error
    /// of the first malformed field.
    pub fn validate(self) -> Result<BillChanges> {
        let details = AddBillRequest {
            from: self.from,
            bill_type: self.bill_type,
            amount_due: self.amount_due,
            due_date: self.due_date,
            ..Default::default()
        }
        .validate()?;

        Ok(BillChanges {
            details,
            amount_paid: optional_amount("amountPaid", self.amount_paid)?,
            date_paid: optional_date("datePaid", self.date_paid)?,
            paid_by: self.paid_by.map(|text| text.trim().to_string()),
        })
    }
}

/// Parses a bill id from a request path. Only positive integers are accepted.
///
/// # Errors
/// Returns `Error::InvalidId` for anything else, including `0` and negative numbers.
pub fn parse_bill_id(raw: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::InvalidId {
            raw: raw.to_string(),
        }),
    }
}

/// Retrieves all bills ordered by ascending id.
///
/// # Errors
/// Returns an error if the database query fails.
#[instrument(skip(db))]
pub async fn list_bills(db: &DatabaseConnection) -> Result<Vec<bill::Model>> {
    let bills = store::select_all_bills(db).await?;
    debug!(count = bills.len(), "Listed bills");
    Ok(bills)
}

/// Retrieves a bill by id, returning None if it does not exist.
///
/// # Errors
/// Returns an error if the database query fails.
#[instrument(skip(db))]
pub async fn get_bill_by_id(db: &DatabaseConnection, bill_id: i64) -> Result<Option<bill::Model>> {
    store::select_bill(db, bill_id).await
}

/// Retrieves only the amount paid on a bill, returning None if it does not exist.
///
/// # Errors
/// Returns an error if the database query fails.
#[instrument(skip(db))]
pub async fn get_amount_paid(db: &DatabaseConnection, bill_id: i64) -> Result<Option<Cents>> {
    Ok(store::select_bill(db, bill_id)
        .await?
        .map(|bill| Cents::new(bill.amount_paid_cents)))
}

/// Validates and stores a new, unpaid bill.
///
/// # Errors
/// Returns a validation error if a required field is missing or malformed (nothing is
/// stored), or a database error if the insert fails.
#[instrument(skip(db, request))]
pub async fn add_bill(db: &DatabaseConnection, request: AddBillRequest) -> Result<bill::Model> {
    let new_bill = request.validate()?;
    let status = derive_status(new_bill.amount_due, Cents::ZERO);

    let row = bill::ActiveModel {
        payee: Set(new_bill.payee),
        bill_type: Set(new_bill.bill_type),
        amount_due_cents: Set(new_bill.amount_due.get()),
        due_date: Set(new_bill.due_date),
        is_paid: Set(status.is_paid),
        paid_in_full: Set(status.paid_in_full),
        amount_paid_cents: Set(0),
        date_paid: Set(unpaid_date_sentinel()),
        paid_by: Set(String::new()),
        ..Default::default()
    };

    let created = store::insert_bill(db, row).await?;
    info!(bill_id = created.id, payee = %created.payee, "Added bill");
    Ok(created)
}

/// Records a payment against a bill and recomputes its status.
///
/// The status is derived from the amount due stored for the bill; an `amountDue` sent
/// by the client is only compared and logged.
///
/// # Errors
/// Returns a validation error for a missing or malformed payment field,
/// `Error::BillNotFound` if no bill has this id, or a database error.
#[instrument(skip(db, request))]
pub async fn pay_bill(
    db: &DatabaseConnection,
    bill_id: i64,
    request: PayBillRequest,
) -> Result<bill::Model> {
    let payment = request.validate()?;

    let updated = read_then_write(db, bill_id, |current| {
        let amount_due = Cents::new(current.amount_due_cents);
        if let Some(claimed) = payment.claimed_amount_due.filter(|claimed| *claimed != amount_due) {
            warn!(
                bill_id,
                %claimed,
                stored = %amount_due,
                "Ignoring client-supplied amountDue that differs from the stored amount"
            );
        }

        let status = derive_status(amount_due, payment.amount_paid);
        Ok(bill::ActiveModel {
            is_paid: Set(status.is_paid),
            paid_in_full: Set(status.paid_in_full),
            amount_paid_cents: Set(payment.amount_paid.get()),
            date_paid: Set(payment.date_paid),
            paid_by: Set(payment.paid_by.clone()),
            ..Default::default()
        })
    })
    .await?;

    info!(
        bill_id,
        amount_paid = %payment.amount_paid,
        paid_in_full = updated.paid_in_full,
        "Recorded payment"
    );
    Ok(updated)
}

/// Replaces a bill's details and, when supplied, its payment fields.
///
/// Omitted payment fields keep their stored values. When the resulting amount paid is
/// zero, omitted `datePaid`/`paidBy` fall back to the unpaid defaults instead; when it
/// is positive, the bill must end up with a real payment date and a non-empty `paidBy`.
///
/// # Errors
/// Returns a validation error for a missing or malformed field,
/// `Error::BillNotFound` if no bill has this id, or a database error.
#[instrument(skip(db, request))]
pub async fn update_bill(
    db: &DatabaseConnection,
    bill_id: i64,
    request: UpdateBillRequest,
) -> Result<bill::Model> {
    let changes = request.validate()?;

    let updated = read_then_write(db, bill_id, |current| {
        let (amount_paid, date_paid, paid_by) = resolve_payment(&changes, current)?;
        let status = derive_status(changes.details.amount_due, amount_paid);
        Ok(bill::ActiveModel {
            payee: Set(changes.details.payee.clone()),
            bill_type: Set(changes.details.bill_type.clone()),
            amount_due_cents: Set(changes.details.amount_due.get()),
            due_date: Set(changes.details.due_date),
            is_paid: Set(status.is_paid),
            paid_in_full: Set(status.paid_in_full),
            amount_paid_cents: Set(amount_paid.get()),
            date_paid: Set(date_paid),
            paid_by: Set(paid_by),
            ..Default::default()
        })
    })
    .await?;

    info!(bill_id, is_paid = updated.is_paid, "Updated bill");
    Ok(updated)
}

/// Works out the amount paid, payment date and payer an update leaves on the bill.
fn resolve_payment(
    changes: &BillChanges,
    current: &bill::Model,
) -> Result<(Cents, NaiveDate, String)> {
    let amount_paid = changes
        .amount_paid
        .unwrap_or_else(|| Cents::new(current.amount_paid_cents));

    if !amount_paid.is_positive() {
        return Ok((
            amount_paid,
            changes.date_paid.unwrap_or_else(unpaid_date_sentinel),
            changes.paid_by.clone().unwrap_or_default(),
        ));
    }

    let stored_date = Some(current.date_paid).filter(|date| *date != unpaid_date_sentinel());
    let paid_by = changes
        .paid_by
        .clone()
        .unwrap_or_else(|| current.paid_by.clone());

    let mut required = RequiredFields::default();
    let date_paid = required.present("datePaid", changes.date_paid.or(stored_date));
    let paid_by = required.present("paidBy", Some(paid_by).filter(|text| !text.is_empty()));
    match (date_paid, paid_by) {
        (Some(date_paid), Some(paid_by)) => Ok((amount_paid, date_paid, paid_by)),
        _ => Err(required.into_error()),
    }
}

/// Permanently deletes a bill.
///
/// # Errors
/// Returns `Error::BillNotFound` if no bill has this id, or a database error.
#[instrument(skip(db))]
pub async fn delete_bill(db: &DatabaseConnection, bill_id: i64) -> Result<()> {
    if store::delete_bill_row(db, bill_id).await? == 0 {
        return Err(Error::BillNotFound { id: bill_id });
    }
    info!(bill_id, "Deleted bill");
    Ok(())
}

/// Guarded writes tried before the last, unconditional one.
const GUARDED_WRITE_ATTEMPTS: usize = 3;

/// Reads the bill, builds the new fields from it, and writes them back.
///
/// Each statement runs on its own, so no lock is held between the read and the write.
/// The write only lands if the row is unchanged since the read; otherwise the bill is
/// read again. The final attempt writes unconditionally, so the last writer wins.
async fn read_then_write<F>(
    db: &DatabaseConnection,
    bill_id: i64,
    mut build: F,
) -> Result<bill::Model>
where
    F: FnMut(&bill::Model) -> Result<bill::ActiveModel>,
{
    for attempt in 0..=GUARDED_WRITE_ATTEMPTS {
        let current = store::select_bill(db, bill_id)
            .await?
            .ok_or(Error::BillNotFound { id: bill_id })?;
        let fields = build(&current)?;

        let written = if attempt < GUARDED_WRITE_ATTEMPTS {
            store::update_bill_if_unchanged(db, &current, fields).await?
        } else {
            store::update_bill_fields(db, bill_id, fields).await?
        };
        if written > 0 {
            return store::select_bill(db, bill_id)
                .await?
                .ok_or(Error::BillNotFound { id: bill_id });
        }
        debug!(bill_id, attempt, "Bill changed since it was read, retrying");
    }
    Err(Error::BillNotFound { id: bill_id })
}
