//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! sales-sync test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built sales data and the custom field table
//! - `builders`: Builder patterns for test orders
//! - `assertions`: Assertion helpers for CRM request items
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
