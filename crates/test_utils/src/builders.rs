//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use core_kernel::{CrmObjectId, OrderId};
use domain_order::{Delivery, Order, Payment, PaymentType, Policy};
use rust_decimal::Decimal;

use crate::fixtures::OrderFixtures;

/// Builder for constructing test orders
pub struct TestOrderBuilder {
    id: OrderId,
    code: String,
    email: String,
    phone: String,
    policy: Policy,
    total_price: Option<Decimal>,
    payment: Option<Payment>,
    delivery: Option<Delivery>,
    lead_id: Option<CrmObjectId>,
    contact_id: Option<CrmObjectId>,
}

impl Default for TestOrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestOrderBuilder {
    /// Creates a builder for an order known only through its offer
    pub fn new() -> Self {
        Self {
            id: OrderId::new(1),
            code: "A1B2C3".to_string(),
            email: "driver@example.com".to_string(),
            phone: "+79990001122".to_string(),
            policy: OrderFixtures::offer_policy(),
            total_price: None,
            payment: None,
            delivery: None,
            lead_id: None,
            contact_id: None,
        }
    }

    /// An order right after the offer was chosen
    pub fn pre_purchase() -> Self {
        Self::new()
    }

    /// An order with vehicle, drivers, card payment and delivery filled in
    pub fn post_purchase() -> Self {
        Self::new()
            .with_policy(OrderFixtures::full_policy())
            .with_payment(PaymentType::Card)
            .with_delivery(OrderFixtures::delivery())
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = OrderId::new(id);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_contact(mut self, email: impl Into<String>, phone: impl Into<String>) -> Self {
        self.email = email.into();
        self.phone = phone.into();
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the total price (defaults to the policy price)
    pub fn with_total_price(mut self, total_price: Decimal) -> Self {
        self.total_price = Some(total_price);
        self
    }

    pub fn with_payment(mut self, payment_type: PaymentType) -> Self {
        self.payment = Some(Payment::new(payment_type));
        self
    }

    pub fn with_delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = Some(delivery);
        self
    }

    /// Marks the order as already synced to the CRM
    pub fn with_crm_ids(mut self, lead_id: u64, contact_id: u64) -> Self {
        self.lead_id = Some(CrmObjectId::new(lead_id));
        self.contact_id = Some(CrmObjectId::new(contact_id));
        self
    }

    /// Sets only the lead id
    pub fn with_lead_id(mut self, lead_id: u64) -> Self {
        self.lead_id = Some(CrmObjectId::new(lead_id));
        self
    }

    /// Builds the order
    ///
    /// # Panics
    ///
    /// Panics if the code is blank
    pub fn build(self) -> Order {
        let mut order = Order::new(self.id, self.code, self.email, self.phone, self.policy)
            .expect("test order must be valid");
        if let Some(total_price) = self.total_price {
            order = order.with_total_price(total_price);
        }
        if let Some(payment) = self.payment {
            order = order.with_payment(payment);
        }
        if let Some(delivery) = self.delivery {
            order = order.with_delivery(delivery);
        }
        order.amo_lead_id = self.lead_id;
        order.amo_contact_id = self.contact_id;
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pre_purchase_order_has_no_resolved_records() {
        let order = TestOrderBuilder::pre_purchase().build();
        assert!(order.policy.auto.is_none());
        assert!(!order.policy.has_drivers());
        assert!(!order.is_synced());
        assert_eq!(order.total_price, OrderFixtures::price());
    }

    #[test]
    fn test_post_purchase_order_with_ids() {
        let order = TestOrderBuilder::post_purchase()
            .with_total_price(dec!(5900))
            .with_crm_ids(10, 20)
            .build();

        assert!(order.payment.unwrap().is_card());
        assert!(order.delivery.is_some());
        assert_eq!(order.total_price, dec!(5900));
        assert!(order.is_synced());
    }
}
