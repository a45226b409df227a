//! Sales Domain
//!
//! This crate models the parts of the OSAGO sales application that the CRM
//! synchronization reacts to:
//!
//! - **Orders**: the purchase being made, with contact data, pricing,
//!   payment and delivery choices, and the CRM cross-reference ids
//! - **Policies**: the insured vehicle, its drivers, the chosen insurer, and
//!   the pre-purchase offer projection used before those are known
//! - **Callback requests** and **insured parties**: records created outside
//!   the order flow that still need to reach the CRM
//!
//! # Order lifecycle milestones
//!
//! ```text
//! email & phone set -> documents uploaded -> insured party registered -> before paid
//!          \____________ callback may be requested at any point ____________/
//! ```
//!
//! Each milestone is delivered to a [`SalesEventHandler`] as a [`SalesEvent`].
//! The host application owns persistence and exposes it through the
//! [`OrderStore`] port.
//!
//! # Example
//!
//! ```rust
//! use domain_order::{Order, Policy};
//! use core_kernel::OrderId;
//! use rust_decimal::Decimal;
//!
//! let order = Order::new(
//!     OrderId::new(1),
//!     "A1B2C3",
//!     "driver@example.com",
//!     "+79990001122",
//!     Policy::new(Decimal::new(540000, 2)),
//! )
//! .unwrap();
//!
//! assert!(!order.is_synced());
//! ```

pub mod order;
pub mod policy;
pub mod back_call;
pub mod insurant;
pub mod events;
pub mod error;
pub mod ports;

pub use order::{Order, Payment, PaymentType, Delivery};
pub use policy::{Policy, InsuranceCompany, Auto, Driver, OfferData};
pub use back_call::BackCall;
pub use insurant::Insurant;
pub use events::SalesEvent;
pub use error::OrderError;
pub use ports::{OrderStore, SalesEventHandler, SyncOutcome};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockOrderStore;
