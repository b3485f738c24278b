//! Core business logic - framework-agnostic bill operations.
//!
//! Nothing in here knows about HTTP; the api layer maps requests onto these functions.

/// Bill operations and request validation
pub mod bill;
/// Integer-cent money amounts
pub mod money;
/// Payment status derivation
pub mod status;
/// Row-level persistence for bills
pub mod store;

pub use money::Cents;
pub use status::{PaymentStatus, derive_status};
