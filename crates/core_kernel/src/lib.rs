//! Core Kernel - Foundational types shared by the pharmacy claims crates
//!
//! - Strongly-typed identifiers for claims and reverts
//! - The port error type and health-check traits used by every adapter

pub mod identifiers;
pub mod ports;

pub use identifiers::{ClaimId, EmptyIdError, RevertId};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
};
