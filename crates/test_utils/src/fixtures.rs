//! Pre-built Test Fixtures
//!
//! Provides ready-to-use sales data for handler and payload tests.
//! Everything is fixed so assertions can name exact values.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use core_kernel::{BackCallId, InsurantId};
use domain_order::{Auto, BackCall, Delivery, Driver, InsuranceCompany, Insurant, OfferData, Policy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Logical custom field names and the ids the fixture table assigns them
pub const FIELD_TABLE: [(&str, u64); 17] = [
    ("order_number", 1450321),
    ("link", 1450322),
    ("company", 1450323),
    ("power", 1450324),
    ("youngest", 1450325),
    ("inexperienced", 1450326),
    ("mark", 1450327),
    ("model", 1450328),
    ("production_year", 1450329),
    ("delivery_datetime", 1450330),
    ("term", 1450331),
    ("car_type", 1450332),
    ("is_multiple_drive", 1450333),
    ("clear_experience", 1450334),
    ("region", 1450335),
    ("email", 1450336),
    ("phone", 1450337),
];

/// Fixture for CRM configuration data
pub struct CrmFixtures;

impl CrmFixtures {
    /// A complete custom field table
    pub fn field_table() -> HashMap<String, u64> {
        FIELD_TABLE
            .iter()
            .map(|(name, id)| (name.to_string(), *id))
            .collect()
    }

    /// The id the fixture table assigns to `name`
    ///
    /// # Panics
    ///
    /// Panics if the name is not in the table
    pub fn field_id(name: &str) -> u64 {
        FIELD_TABLE
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, id)| *id)
            .unwrap_or_else(|| panic!("no fixture id for field {name}"))
    }

    /// The field table without the given names
    pub fn field_table_without(names: &[&str]) -> HashMap<String, u64> {
        let mut table = Self::field_table();
        for name in names {
            table.remove(*name);
        }
        table
    }
}

/// Fixture for sales domain data
pub struct OrderFixtures;

impl OrderFixtures {
    /// Instant every fixture-based test runs "at" (June 1, 2024 noon UTC)
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    pub fn today() -> NaiveDate {
        Self::now().date_naive()
    }

    /// Standard policy price
    pub fn price() -> Decimal {
        dec!(5400.50)
    }

    pub fn insurance_company() -> InsuranceCompany {
        InsuranceCompany::new("Ингосстрах")
    }

    /// Pre-purchase quote parameters as shown on the offer page
    pub fn offer() -> OfferData {
        OfferData {
            power: "от 100 до 120 л.с.".to_string(),
            age: "до 22 лет".to_string(),
            experience: "до 3 лет".to_string(),
            term: "1 год".to_string(),
            car_type: "Легковой".to_string(),
            region: "Москва".to_string(),
            is_multiple_drive: false,
            clear_experience: true,
        }
    }

    pub fn auto() -> Auto {
        Auto {
            power: 106,
            mark_label: "Lada".to_string(),
            model_label: "Vesta".to_string(),
            production_year: 2019,
        }
    }

    /// Two drivers; the youngest is 24 with 4 years of experience on [`Self::today`]
    pub fn drivers() -> Vec<Driver> {
        vec![
            Driver {
                full_name: "Иванов Иван Иванович".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1980, 3, 15).unwrap(),
                experience_start_date: NaiveDate::from_ymd_opt(2000, 5, 20).unwrap(),
            },
            Driver {
                full_name: "Иванова Мария Петровна".to_string(),
                birth_date: NaiveDate::from_ymd_opt(2000, 1, 10).unwrap(),
                experience_start_date: NaiveDate::from_ymd_opt(2020, 2, 1).unwrap(),
            },
        ]
    }

    /// Courier delivery window (`2024-06-03 от 10:00 до 14:00`)
    pub fn delivery() -> Delivery {
        Delivery::new(
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        )
        .unwrap()
    }

    /// Policy known only through the offer: no vehicle, no drivers
    pub fn offer_policy() -> Policy {
        Policy::new(Self::price())
            .with_insurance_company(Self::insurance_company())
            .with_offer(Self::offer())
    }

    /// Policy with the vehicle and driver forms filled in
    pub fn full_policy() -> Policy {
        Self::drivers()
            .into_iter()
            .fold(Self::offer_policy().with_auto(Self::auto()), Policy::with_driver)
    }

    /// Callback request with no order attached
    pub fn back_call(id: u64) -> BackCall {
        BackCall::new(BackCallId::new(id), "Олег", "oleg@example.com", "+79161234567").unwrap()
    }

    /// Insured party registered against `order_code`
    pub fn insurant(order_code: &str) -> Insurant {
        Insurant {
            id: InsurantId::new(7),
            full_name: "Петров Пётр Петрович".to_string(),
            email: "petrov@example.com".to_string(),
            phone: "+79035550011".to_string(),
            order_code: order_code.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_table_is_complete() {
        assert_eq!(CrmFixtures::field_table().len(), FIELD_TABLE.len());
        assert_eq!(CrmFixtures::field_id("email"), 1450336);
        assert!(!CrmFixtures::field_table_without(&["power"]).contains_key("power"));
    }

    #[test]
    fn test_driver_fixture_ages() {
        let policy = OrderFixtures::full_policy();
        assert_eq!(policy.drivers_minimum_age(OrderFixtures::today()), Some(24));
        assert_eq!(policy.drivers_minimum_experience(OrderFixtures::today()), Some(4));
    }
}
