//! Sales domain errors

use thiserror::Error;

/// Errors that can occur when constructing sales domain records
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Required field is missing or blank
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Delivery window ends before it starts
    #[error("Invalid delivery window: {from} is not before {to}")]
    InvalidDeliveryWindow {
        from: String,
        to: String,
    },
}

impl OrderError {
    /// Creates a missing field error
    pub fn missing(field: impl Into<String>) -> Self {
        OrderError::MissingRequiredField(field.into())
    }
}
