//! Ports and Adapters Infrastructure
//!
//! Foundational types for the hexagonal layout of the workspace. Domain
//! crates define port traits (e.g. the order store the host application
//! provides) that extend the marker traits here; infrastructure crates
//! implement them.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          Host application dispatch           │
//! └──────────────────────────────────────────────┘
//!                       │ SalesEvent
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │     Port traits (domain_order::ports)        │
//! │   SalesEventHandler, OrderStore              │
//! └──────────────────────────────────────────────┘
//!            ▲                        ▲
//!   ┌────────┴────────┐      ┌────────┴────────┐
//!   │  CRM adapter    │      │  Host storage   │
//!   │ (infra_amocrm)  │      │  (host / mock)  │
//!   └─────────────────┘      └─────────────────┘
//! ```

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error type for port operations
///
/// Host store implementations report failures through this type, so the CRM
/// adapter can treat any host store the same way.
#[derive(Debug, Error)]
pub enum PortError {
    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they are thread-safe and usable
/// behind `Arc<dyn ...>` in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Adapter is healthy and operational
    Healthy,
    /// Adapter is unhealthy and not operational
    Unhealthy,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_messages() {
        let error = PortError::connection("refused");
        assert_eq!(error.to_string(), "Connection error: refused");
        assert!(std::error::Error::source(&error).is_none());

        assert!(PortError::internal("corrupt row").to_string().contains("corrupt row"));
    }

    #[test]
    fn test_health_serializes_snake_case() {
        let status = serde_json::to_string(&AdapterHealth::Unhealthy).unwrap();
        assert_eq!(status, "\"unhealthy\"");
    }
}
