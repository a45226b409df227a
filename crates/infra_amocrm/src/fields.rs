//! Custom field registry
//!
//! The CRM identifies custom fields by numeric ids that differ per account.
//! Payload builders refer to fields by logical name and resolve ids here.
//! The registry is loaded once from configuration and never changes.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CrmError;

/// Logical field names used by the payload builders
pub mod names {
    pub const ORDER_NUMBER: &str = "order_number";
    pub const LINK: &str = "link";
    pub const COMPANY: &str = "company";
    pub const POWER: &str = "power";
    pub const YOUNGEST: &str = "youngest";
    pub const INEXPERIENCED: &str = "inexperienced";
    pub const MARK: &str = "mark";
    pub const MODEL: &str = "model";
    pub const PRODUCTION_YEAR: &str = "production_year";
    pub const DELIVERY_DATETIME: &str = "delivery_datetime";
    pub const TERM: &str = "term";
    pub const CAR_TYPE: &str = "car_type";
    pub const IS_MULTIPLE_DRIVE: &str = "is_multiple_drive";
    pub const CLEAR_EXPERIENCE: &str = "clear_experience";
    pub const REGION: &str = "region";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";

    /// Every name a payload builder may ask for
    pub const ALL: [&str; 17] = [
        ORDER_NUMBER,
        LINK,
        COMPANY,
        POWER,
        YOUNGEST,
        INEXPERIENCED,
        MARK,
        MODEL,
        PRODUCTION_YEAR,
        DELIVERY_DATETIME,
        TERM,
        CAR_TYPE,
        IS_MULTIPLE_DRIVE,
        CLEAR_EXPERIENCE,
        REGION,
        EMAIL,
        PHONE,
    ];
}

/// Numeric id of a CRM custom field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(u64);

impl FieldId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable mapping from logical field name to CRM field id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRegistry {
    fields: HashMap<String, FieldId>,
}

impl FieldRegistry {
    pub fn new(fields: HashMap<String, u64>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, id)| (name, FieldId::new(id)))
                .collect(),
        }
    }

    /// Resolves a field id, failing for names the registry does not know
    pub fn id(&self, name: &str) -> Result<FieldId, CrmError> {
        self.fields
            .get(name)
            .copied()
            .ok_or_else(|| CrmError::UnknownField(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names used by the payload builders that the registry lacks
    pub fn missing_names(&self) -> Vec<&'static str> {
        names::ALL
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }
}

impl FromIterator<(String, u64)> for FieldRegistry {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
