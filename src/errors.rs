//! Unified error type for the bill tracker.
//!
//! Validation failures, missing bills, and store failures are kept as separate
//! variants so the HTTP layer can tell "bad input" from "no such bill" from
//! "the database is unavailable".

use thiserror::Error;

/// All errors produced by the bill tracker.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more required request fields were absent, empty, or zero.
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields {
        /// Wire names of the missing fields, in request order
        fields: Vec<&'static str>,
    },

    /// A field was present but could not be interpreted.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidField {
        /// Wire name of the offending field
        field: &'static str,
        /// Human-readable explanation
        reason: String,
    },

    /// An amount was negative, non-finite, or too large to track in cents.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A bill identifier was not a positive integer.
    #[error("Invalid bill id '{raw}': must be a positive integer")]
    InvalidId {
        /// The identifier as received
        raw: String,
    },

    /// No bill exists with the given id.
    #[error("Bill not found: {id}")]
    BillNotFound {
        /// The requested bill id
        id: i64,
    },

    /// Underlying persistence failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Startup configuration could not be loaded.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// I/O failure (binding the listener, reading files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for errors caused by caller input rather than the system.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingFields { .. }
                | Self::InvalidField { .. }
                | Self::InvalidAmount { .. }
                | Self::InvalidId { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
