//! Payment status derivation.
//!
//! `is_paid` and `paid_in_full` are never taken from callers; every write recomputes
//! them from the amount due and the amount paid using [`derive_status`].

use super::money::Cents;

/// The two derived payment flags of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentStatus {
    /// Any positive amount has been paid
    pub is_paid: bool,
    /// The amount paid equals the amount due exactly
    pub paid_in_full: bool,
}

impl PaymentStatus {
    /// Status of a bill with no payment recorded.
    pub const UNPAID: Self = Self {
        is_paid: false,
        paid_in_full: false,
    };
}

/// Derives the payment flags from the amount due and the amount paid.
///
/// Overpayment counts as paid but not paid in full; only an exact match is "in full".
#[must_use]
pub const fn derive_status(amount_due: Cents, amount_paid: Cents) -> PaymentStatus {
    if !amount_paid.is_positive() {
        return PaymentStatus::UNPAID;
    }
    PaymentStatus {
        is_paid: true,
        paid_in_full: amount_paid.get() == amount_due.get(),
    }
}
