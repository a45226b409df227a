//! Insured party (the policyholder, "страхователь")

use serde::{Deserialize, Serialize};

use core_kernel::InsurantId;

/// The person buying the policy, registered against an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insurant {
    pub id: InsurantId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Code of the order whose policy this party insures
    pub order_code: String,
}
