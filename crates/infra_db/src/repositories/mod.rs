//! Repository implementations
//!
//! Repositories encapsulate SQL statements and transaction boundaries and
//! work on plain row types. Conversion to domain types happens in the
//! adapters.

pub mod claims;

pub use claims::{ClaimRow, ClaimsRepository, PharmacyRow, RevertRow};
