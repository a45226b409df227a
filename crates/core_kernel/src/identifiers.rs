//! Strongly-typed identifiers for domain entities
//!
//! Host-application records carry integer primary keys assigned by the host
//! database. Wrapping them in newtypes prevents accidental mixing of, say, a
//! callback id with an order id. CRM-side objects get their own
//! [`CrmObjectId`] since they live in a different system entirely.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates an identifier from the host's primary key
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the raw primary key
            pub const fn get(&self) -> u64 {
                self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let raw = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(raw.parse()?))
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }
    };
}

// Host-application identifiers
define_id!(OrderId, "ORD");
define_id!(BackCallId, "BCL");
define_id!(InsurantId, "INS");

/// Identifier of an object (lead, contact) stored in the CRM
///
/// Serialized as a bare JSON number, which is what the CRM API expects in
/// `id` and `linked_leads_id` positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrmObjectId(u64);

impl CrmObjectId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CrmObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CrmObjectId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<u64> for CrmObjectId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_display() {
        let id = OrderId::new(42);
        assert_eq!(id.to_string(), "ORD-42");
    }

    #[test]
    fn test_id_parsing() {
        let original = BackCallId::new(17);
        let parsed: BackCallId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);

        let bare: BackCallId = "17".parse().unwrap();
        assert_eq!(bare, original);
    }

    #[test]
    fn test_crm_object_id_serializes_as_number() {
        let id = CrmObjectId::new(9_001);
        assert_eq!(serde_json::to_string(&id).unwrap(), "9001");
        let back: CrmObjectId = serde_json::from_str("9001").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("ORD-abc".parse::<OrderId>().is_err());
        assert!("".parse::<CrmObjectId>().is_err());
    }
}
