//! Core Kernel - Foundational types shared across the sales-sync workspace
//!
//! This crate provides the building blocks used by the domain and
//! infrastructure crates:
//! - Strongly-typed identifiers for host-application records
//! - Identifiers for objects owned by the external CRM
//! - Port abstractions (errors, health checks) for hexagonal adapters

pub mod identifiers;
pub mod ports;

pub use identifiers::{OrderId, BackCallId, InsurantId, CrmObjectId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
