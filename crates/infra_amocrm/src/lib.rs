//! amoCRM Integration
//!
//! This crate pushes sales lifecycle events to amoCRM, so the sales team
//! sees every order as a lead with a linked contact.
//!
//! # Architecture
//!
//! - [`AuthClient`]: logs in with the API login/hash and caches the session
//! - [`AmoGateway`]: the [`CrmGateway`] over the legacy JSON API
//! - [`FieldRegistry`]: logical field names to per-account custom field ids
//! - [`PayloadContext`]: pure mapping from orders and callbacks to payloads
//! - [`AmoSync`]: the [`SalesEventHandler`](domain_order::SalesEventHandler)
//!   the host calls for each event
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_amocrm::{AmoCrmConfig, AmoSync};
//! use domain_order::{SalesEvent, SalesEventHandler};
//!
//! let config = AmoCrmConfig::from_env()?;
//! let sync = AmoSync::from_config(&config, store)?;
//!
//! let outcome = sync.handle(SalesEvent::email_and_phone_set(order)).await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod fields;
pub mod gateway;
pub mod payload;
pub mod sync;

pub use auth::{AuthClient, SessionToken};
pub use config::AmoCrmConfig;
pub use error::CrmError;
pub use fields::{FieldId, FieldRegistry};
pub use gateway::{AmoGateway, CrmGateway, CrmPayload, EntityKind, Operation};
pub use payload::{Contact, CustomField, EnumTag, FieldValue, Lead, PayloadContext};
pub use sync::AmoSync;
#[cfg(any(test, feature = "mock"))]
pub use gateway::mock::{MockCrmGateway, RecordedCall};
