//! Orders
//!
//! An order is the purchase of a single policy. Besides the data the
//! customer enters it carries the ids of the lead and contact the CRM
//! created for it, so later milestones update those objects instead of
//! creating duplicates.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CrmObjectId, OrderId};

use crate::error::OrderError;
use crate::policy::Policy;

/// How the customer pays for the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Paid online by card before delivery
    Card,
    /// Paid in cash to the courier on delivery
    Courier,
}

/// Payment chosen for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_type: PaymentType,
}

impl Payment {
    pub fn new(payment_type: PaymentType) -> Self {
        Self { payment_type }
    }

    pub fn is_card(&self) -> bool {
        self.payment_type == PaymentType::Card
    }
}

/// Courier delivery window for the paper policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub date: NaiveDate,
    pub time_from: NaiveTime,
    pub time_to: NaiveTime,
}

impl Delivery {
    /// Creates a delivery window, rejecting windows that end before they start
    pub fn new(date: NaiveDate, time_from: NaiveTime, time_to: NaiveTime) -> Result<Self, OrderError> {
        if time_from >= time_to {
            return Err(OrderError::InvalidDeliveryWindow {
                from: time_from.format("%H:%M").to_string(),
                to: time_to.format("%H:%M").to_string(),
            });
        }
        Ok(Self { date, time_from, time_to })
    }

    /// Human-readable window, e.g. `2024-05-14 от 10:00 до 14:00`
    pub fn window_label(&self) -> String {
        format!(
            "{} от {} до {}",
            self.date.format("%Y-%m-%d"),
            self.time_from.format("%H:%M"),
            self.time_to.format("%H:%M"),
        )
    }
}

/// A policy purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Public order code shown to the customer and used in links
    pub code: String,
    pub email: String,
    pub phone: String,
    /// Amount due including delivery
    pub total_price: Decimal,
    pub policy: Policy,
    pub payment: Option<Payment>,
    pub delivery: Option<Delivery>,
    /// Id of the CRM lead created for this order
    pub amo_lead_id: Option<CrmObjectId>,
    /// Id of the CRM contact created for this order
    pub amo_contact_id: Option<CrmObjectId>,
}

impl Order {
    /// Creates an order that has not been synchronized yet
    ///
    /// The total price starts equal to the policy price.
    pub fn new(
        id: OrderId,
        code: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        policy: Policy,
    ) -> Result<Self, OrderError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(OrderError::missing("code"));
        }

        Ok(Self {
            id,
            code,
            email: email.into(),
            phone: phone.into(),
            total_price: policy.price,
            policy,
            payment: None,
            delivery: None,
            amo_lead_id: None,
            amo_contact_id: None,
        })
    }

    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payment = Some(payment);
        self
    }

    pub fn with_delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = Some(delivery);
        self
    }

    pub fn with_total_price(mut self, total_price: Decimal) -> Self {
        self.total_price = total_price;
        self
    }

    /// Returns true once both CRM objects have been created
    pub fn is_synced(&self) -> bool {
        self.amo_lead_id.is_some() && self.amo_contact_id.is_some()
    }

    /// Stores the ids of the CRM objects representing this order
    pub fn record_crm_ids(&mut self, lead_id: CrmObjectId, contact_id: CrmObjectId) {
        self.record_lead_id(lead_id);
        self.amo_contact_id = Some(contact_id);
    }

    /// Records the lead id alone, leaving any stored contact id in place
    pub fn record_lead_id(&mut self, lead_id: CrmObjectId) {
        self.amo_lead_id = Some(lead_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_new_order_is_unsynced() {
        let order = Order::new(OrderId::new(1), "A1", "a@b.ru", "+7900", Policy::new(dec!(4200))).unwrap();
        assert!(!order.is_synced());
        assert_eq!(order.total_price, dec!(4200));
    }

    #[test]
    fn test_blank_code_is_rejected() {
        let result = Order::new(OrderId::new(1), "  ", "a@b.ru", "+7900", Policy::new(dec!(1)));
        assert_eq!(result.unwrap_err(), OrderError::missing("code"));
    }

    #[test]
    fn test_record_crm_ids() {
        let mut order = Order::new(OrderId::new(1), "A1", "a@b.ru", "+7900", Policy::new(dec!(1))).unwrap();
        order.record_crm_ids(CrmObjectId::new(10), CrmObjectId::new(20));
        assert!(order.is_synced());
        assert_eq!(order.amo_lead_id, Some(CrmObjectId::new(10)));
        assert_eq!(order.amo_contact_id, Some(CrmObjectId::new(20)));
    }

    #[test]
    fn test_record_lead_id_alone_is_partial_sync() {
        let mut order = Order::new(OrderId::new(1), "A1", "a@b.ru", "+7900", Policy::new(dec!(1))).unwrap();
        order.record_lead_id(CrmObjectId::new(10));
        assert!(!order.is_synced());
        assert_eq!(order.amo_lead_id, Some(CrmObjectId::new(10)));
        assert_eq!(order.amo_contact_id, None);
    }

    #[test]
    fn test_delivery_window_label() {
        let delivery = Delivery::new(
            NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
            time(10, 0),
            time(14, 30),
        )
        .unwrap();
        assert_eq!(delivery.window_label(), "2024-05-14 от 10:00 до 14:30");
    }

    #[test]
    fn test_inverted_delivery_window_is_rejected() {
        let result = Delivery::new(NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(), time(14, 0), time(10, 0));
        assert!(matches!(result, Err(OrderError::InvalidDeliveryWindow { .. })));
    }

    #[test]
    fn test_payment_type() {
        assert!(Payment::new(PaymentType::Card).is_card());
        assert!(!Payment::new(PaymentType::Courier).is_card());
    }
}
