//! Shared test utilities for the bill tracker.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test bills and requests with sensible defaults.

use crate::{
    core::{
        bill::{self, AddBillRequest, PayBillRequest, UpdateBillRequest},
        money::AmountInput,
    },
    config::{DatabaseConfig, database},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::path::Path;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Opens a file-backed `SQLite` pool in `dir` with up to `max_connections` connections.
/// Use this instead of [`setup_test_db`] when a test needs several connections at once.
pub async fn setup_file_db(dir: &Path, max_connections: u32) -> Result<DatabaseConnection> {
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.join("bills.sqlite").display()),
        max_connections,
        acquire_timeout_secs: 5,
    };
    let db = database::create_connection(&config).await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// Creates the standard test bill.
///
/// # Defaults
/// * `from`: "Primary Care Doctor"
/// * `type`: "Medical"
/// * `amountDue`: 56.15
/// * `dueDate`: 2025-09-15
pub async fn create_test_bill(db: &DatabaseConnection) -> Result<entities::bill::Model> {
    create_custom_bill(db, "Primary Care Doctor", "Medical", "56.15", "2025-09-15").await
}

/// Creates a bill with custom details.
pub async fn create_custom_bill(
    db: &DatabaseConnection,
    from: &str,
    bill_type: &str,
    amount_due: &str,
    due_date: &str,
) -> Result<entities::bill::Model> {
    let request = AddBillRequest {
        from: Some(from.to_string()),
        bill_type: Some(bill_type.to_string()),
        amount_due: Some(AmountInput::Text(amount_due.to_string())),
        due_date: Some(due_date.to_string()),
        ..Default::default()
    };
    bill::add_bill(db, request).await
}

/// Builds a payment request against the standard test bill.
///
/// # Defaults
/// * `amountDue`: 56.15
/// * `paidBy`: "Visa"
pub fn test_payment(amount_paid: &str, date_paid: &str) -> PayBillRequest {
    PayBillRequest {
        amount_due: Some(AmountInput::Number(56.15)),
        amount_paid: Some(AmountInput::Text(amount_paid.to_string())),
        date_paid: Some(date_paid.to_string()),
        paid_by: Some("Visa".to_string()),
        ..Default::default()
    }
}

/// Builds a full update request with the given amount paid.
///
/// # Defaults
/// * `from`: "Primary Care Doctor - Dr. Lee"
/// * `type`: "Medical"
/// * `amountDue`: 60.00
/// * `dueDate`: 2025-09-30
/// * `datePaid`: 2025-08-20
/// * `paidBy`: "Check"
pub fn test_update(amount_paid: &str) -> UpdateBillRequest {
    UpdateBillRequest {
        from: Some("Primary Care Doctor - Dr. Lee".to_string()),
        bill_type: Some("Medical".to_string()),
        amount_due: Some(AmountInput::Number(60.0)),
        due_date: Some("2025-09-30".to_string()),
        amount_paid: Some(AmountInput::Text(amount_paid.to_string())),
        date_paid: Some("2025-08-20".to_string()),
        paid_by: Some("Check".to_string()),
        ..Default::default()
    }
}

/// Sets up a complete test environment with one bill.
/// Returns (db, bill) for common test scenarios.
pub async fn setup_with_bill() -> Result<(DatabaseConnection, entities::bill::Model)> {
    let db = setup_test_db().await?;
    let bill = create_test_bill(&db).await?;
    Ok((db, bill))
}
