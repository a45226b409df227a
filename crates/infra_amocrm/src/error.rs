//! CRM integration errors
//!
//! Covers the three places a sync can go wrong: building the payload
//! (unknown field, data not populated yet), talking to the CRM (transport,
//! status, response shape), and the host's order store.

use thiserror::Error;

use core_kernel::PortError;

/// Errors raised while synchronizing with the CRM
#[derive(Debug, Error)]
pub enum CrmError {
    /// A payload referenced a field name missing from the field registry
    #[error("Unknown custom field: {0}")]
    UnknownField(String),

    /// Neither the resolved records nor the offer projection carry a value
    #[error("No source data for field: {0}")]
    MissingSource(String),

    /// A lead update was requested for an order that was never synced
    #[error("Order {0} has no CRM lead id")]
    MissingLeadId(String),

    /// The event references an order the host store does not know
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// The HTTP request could not be completed
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The CRM answered with a non-success status
    #[error("CRM returned HTTP {status} for {path}")]
    Status {
        status: u16,
        path: String,
    },

    /// The CRM answered successfully but not in the expected shape
    #[error("Unexpected CRM response: {0}")]
    UnexpectedResponse(String),

    /// A payload could not be encoded
    #[error("Payload encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The host order store failed
    #[error("Order store error: {0}")]
    Store(#[from] PortError),

    /// Invalid adapter configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CrmError {
    pub fn missing_source(field: impl Into<String>) -> Self {
        CrmError::MissingSource(field.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        CrmError::UnexpectedResponse(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        CrmError::Configuration(message.into())
    }

    /// Returns true if the failure happened before anything was sent
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            CrmError::UnknownField(_) | CrmError::MissingSource(_) | CrmError::Encoding(_)
        )
    }

    /// Returns true if the failure came from the CRM side of the exchange
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CrmError::Transport(_) | CrmError::Status { .. } | CrmError::UnexpectedResponse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(CrmError::UnknownField("power".into()).is_payload_error());
        assert!(CrmError::missing_source("youngest").is_payload_error());
        assert!(!CrmError::MissingLeadId("A1".into()).is_payload_error());

        let status = CrmError::Status { status: 401, path: "/leads/set".into() };
        assert!(status.is_remote());
        assert!(status.to_string().contains("401"));
        assert!(!CrmError::Store(PortError::internal("down")).is_remote());
    }
}
