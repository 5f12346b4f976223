//! Infrastructure Database Layer
//!
//! This crate provides the embedded persistent store for pharmacies, claims,
//! and reverts, built on SQLite through SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. [`ClaimsRepository`] owns the SQL
//! statements and transaction boundaries; [`adapters::SqliteClaimsAdapter`]
//! implements the domain's `ClaimStorePort` on top of it.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::SqliteClaimsAdapter;
//!
//! let pool = create_pool(DatabaseConfig::file("./data/pharmacy.db")).await?;
//! run_migrations(&pool).await?;
//! let store = SqliteClaimsAdapter::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;
pub mod schema;

pub use adapters::SqliteClaimsAdapter;
pub use error::DatabaseError;
pub use pool::{create_pool, DatabaseConfig, DatabaseLocation, DatabasePool};
pub use repositories::ClaimsRepository;
pub use schema::run_migrations;
