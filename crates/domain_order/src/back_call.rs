//! Callback requests
//!
//! A visitor can ask to be called back from any page. When the request is
//! made from inside the purchase flow it carries the current order code.

use serde::{Deserialize, Serialize};

use core_kernel::BackCallId;

use crate::error::OrderError;

/// A request for a phone callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackCall {
    pub id: BackCallId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Code of the order the visitor was working on, if any
    pub order_code: Option<String>,
}

impl BackCall {
    pub fn new(
        id: BackCallId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, OrderError> {
        let phone = phone.into();
        if phone.trim().is_empty() {
            return Err(OrderError::missing("phone"));
        }
        Ok(Self {
            id,
            name: name.into(),
            email: email.into(),
            phone,
            order_code: None,
        })
    }

    /// Attaches the order code; blank codes are treated as absent
    pub fn for_order(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        self.order_code = if code.trim().is_empty() { None } else { Some(code) };
        self
    }

    /// The referenced order code, if any
    pub fn order_code(&self) -> Option<&str> {
        self.order_code.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_is_required() {
        let result = BackCall::new(BackCallId::new(1), "Пётр", "p@example.com", "");
        assert_eq!(result.unwrap_err(), OrderError::missing("phone"));
    }

    #[test]
    fn test_blank_order_code_is_ignored() {
        let call = BackCall::new(BackCallId::new(1), "Пётр", "p@example.com", "+79001234567")
            .unwrap()
            .for_order(" ");
        assert_eq!(call.order_code(), None);

        let call = call.for_order("Z9");
        assert_eq!(call.order_code(), Some("Z9"));
    }
}
