//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random sales data that
//! keeps the domain invariants, plus `fake`-backed contact details.

use core_kernel::CrmObjectId;
use domain_order::{OfferData, Order};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::TestOrderBuilder;
use crate::fixtures::OrderFixtures;

/// Strategy for public order codes
pub fn order_code_strategy() -> impl Strategy<Value = String> {
    "[A-Z0-9]{6}"
}

/// Strategy for policy prices in kopecks precision (100.00 to 99999.99)
pub fn price_strategy() -> impl Strategy<Value = Decimal> {
    (10_000i64..10_000_000i64).prop_map(|minor| Decimal::new(minor, 2))
}

/// Strategy for CRM object ids
pub fn crm_id_strategy() -> impl Strategy<Value = CrmObjectId> {
    (1u64..10_000_000u64).prop_map(CrmObjectId::new)
}

/// Strategy for offer projections
pub fn offer_strategy() -> impl Strategy<Value = OfferData> {
    (
        "[а-я0-9 .]{1,20}",
        "[а-я0-9 ]{1,12}",
        "[а-я0-9 ]{1,12}",
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(power, age, experience, is_multiple_drive, clear_experience)| OfferData {
            power,
            age,
            experience,
            is_multiple_drive,
            clear_experience,
            ..OrderFixtures::offer()
        })
}

/// Strategy for pre-purchase orders that were never synced
pub fn unsynced_order_strategy() -> impl Strategy<Value = Order> {
    (order_code_strategy(), price_strategy(), offer_strategy()).prop_map(|(code, price, offer)| {
        let mut policy = OrderFixtures::offer_policy().with_offer(offer);
        policy.price = price;
        TestOrderBuilder::pre_purchase()
            .with_code(code)
            .with_policy(policy)
            .with_total_price(price)
            .build()
    })
}

/// Strategy for orders that already carry lead and contact ids
pub fn synced_order_strategy() -> impl Strategy<Value = Order> {
    (unsynced_order_strategy(), crm_id_strategy(), crm_id_strategy()).prop_map(|(mut order, lead, contact)| {
        order.record_crm_ids(lead, contact);
        order
    })
}

/// Random contact name, email and phone
pub fn fake_contact() -> (String, String, String) {
    (Name().fake(), SafeEmail().fake(), PhoneNumber().fake())
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_unsynced_orders_have_no_ids(order in unsynced_order_strategy()) {
            prop_assert!(order.amo_lead_id.is_none());
            prop_assert!(order.amo_contact_id.is_none());
            prop_assert_eq!(order.code.len(), 6);
        }

        #[test]
        fn test_synced_orders_have_both_ids(order in synced_order_strategy()) {
            prop_assert!(order.is_synced());
        }
    }

    #[test]
    fn test_fake_contact_is_populated() {
        let (name, email, phone) = fake_contact();
        assert!(!name.is_empty());
        assert!(email.contains('@'));
        assert!(!phone.is_empty());
    }
}
