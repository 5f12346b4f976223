//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! pharmacy claims test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction
//! - `database`: In-memory SQLite databases and batch directory helpers

pub mod fixtures;
pub mod builders;
pub mod database;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
