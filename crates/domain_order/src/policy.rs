//! Policy being purchased within an order
//!
//! A policy goes through two shapes during the sales flow. Before purchase
//! only the quote parameters are known, kept as an [`OfferData`] projection
//! with human-readable values. Once the customer fills in the forms, the
//! policy gains a resolved [`Auto`], a list of [`Driver`]s and the chosen
//! [`InsuranceCompany`]. Consumers pick whichever shape is populated.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An insurer offering the policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceCompany {
    /// Display name of the insurer
    pub label: String,
}

impl InsuranceCompany {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

/// The insured vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auto {
    /// Engine power in horsepower
    pub power: u32,
    /// Make, as shown to the customer
    pub mark_label: String,
    /// Model, as shown to the customer
    pub model_label: String,
    pub production_year: u16,
}

/// A driver admitted to drive the insured vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub full_name: String,
    pub birth_date: NaiveDate,
    /// Date the driver's licence was first issued
    pub experience_start_date: NaiveDate,
}

impl Driver {
    /// Age in whole years as of `today`
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        full_years_between(self.birth_date, today)
    }

    /// Driving experience in whole years as of `today`
    pub fn experience_on(&self, today: NaiveDate) -> u32 {
        full_years_between(self.experience_start_date, today)
    }
}

/// Pre-purchase quote parameters, kept as the texts shown on the offer page
///
/// The quote form works with ranges and flags ("from 70 to 100 hp",
/// "unlimited drivers") rather than concrete records, so this projection is
/// all that is known about the risk until the customer fills in the vehicle
/// and driver forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferData {
    pub power: String,
    pub age: String,
    pub experience: String,
    pub term: String,
    pub car_type: String,
    pub region: String,
    /// Whether any driver may drive the vehicle
    pub is_multiple_drive: bool,
    /// Whether the owner has an accident-free history
    pub clear_experience: bool,
}

impl OfferData {
    pub fn power_text(&self) -> &str {
        &self.power
    }

    pub fn age_text(&self) -> &str {
        &self.age
    }

    pub fn experience_text(&self) -> &str {
        &self.experience
    }

    pub fn term_text(&self) -> &str {
        &self.term
    }

    pub fn car_type_text(&self) -> &str {
        &self.car_type
    }

    pub fn region_text(&self) -> &str {
        &self.region
    }

    pub fn is_multiple_drive_text(&self) -> &'static str {
        yes_no(self.is_multiple_drive)
    }

    pub fn clear_experience_text(&self) -> &'static str {
        yes_no(self.clear_experience)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "да"
    } else {
        "нет"
    }
}

/// The policy attached to an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Quoted premium
    pub price: Decimal,
    pub insurance_company: Option<InsuranceCompany>,
    pub auto: Option<Auto>,
    pub drivers: Vec<Driver>,
    pub offer: Option<OfferData>,
}

impl Policy {
    /// Creates a policy known only by its quoted price
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            insurance_company: None,
            auto: None,
            drivers: Vec::new(),
            offer: None,
        }
    }

    pub fn with_insurance_company(mut self, company: InsuranceCompany) -> Self {
        self.insurance_company = Some(company);
        self
    }

    pub fn with_auto(mut self, auto: Auto) -> Self {
        self.auto = Some(auto);
        self
    }

    pub fn with_driver(mut self, driver: Driver) -> Self {
        self.drivers.push(driver);
        self
    }

    pub fn with_offer(mut self, offer: OfferData) -> Self {
        self.offer = Some(offer);
        self
    }

    /// Returns true once at least one driver has been entered
    pub fn has_drivers(&self) -> bool {
        !self.drivers.is_empty()
    }

    /// Age of the youngest driver, or `None` when no drivers are known
    pub fn drivers_minimum_age(&self, today: NaiveDate) -> Option<u32> {
        self.drivers.iter().map(|d| d.age_on(today)).min()
    }

    /// Shortest driving experience among drivers, or `None` when no drivers are known
    pub fn drivers_minimum_experience(&self, today: NaiveDate) -> Option<u32> {
        self.drivers.iter().map(|d| d.experience_on(today)).min()
    }
}

/// Whole years elapsed from `from` to `to`; zero if `to` precedes `from`
fn full_years_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn driver(birth: NaiveDate, licence: NaiveDate) -> Driver {
        Driver {
            full_name: "Иванов Иван".to_string(),
            birth_date: birth,
            experience_start_date: licence,
        }
    }

    #[test]
    fn test_age_counts_only_completed_years() {
        let d = driver(date(1990, 6, 15), date(2010, 1, 1));
        assert_eq!(d.age_on(date(2024, 6, 14)), 33);
        assert_eq!(d.age_on(date(2024, 6, 15)), 34);
    }

    #[test]
    fn test_future_dates_clamp_to_zero() {
        let d = driver(date(2030, 1, 1), date(2031, 1, 1));
        assert_eq!(d.age_on(date(2024, 1, 1)), 0);
        assert_eq!(d.experience_on(date(2024, 1, 1)), 0);
    }

    #[test]
    fn test_minimum_age_and_experience_pick_weakest_driver() {
        let today = date(2024, 3, 1);
        let policy = Policy::new(dec!(5400))
            .with_driver(driver(date(1970, 1, 1), date(1995, 1, 1)))
            .with_driver(driver(date(2001, 2, 1), date(2020, 5, 1)));

        assert_eq!(policy.drivers_minimum_age(today), Some(23));
        assert_eq!(policy.drivers_minimum_experience(today), Some(3));
    }

    #[test]
    fn test_no_drivers_yields_none() {
        let policy = Policy::new(dec!(5400));
        assert!(!policy.has_drivers());
        assert_eq!(policy.drivers_minimum_age(date(2024, 1, 1)), None);
        assert_eq!(policy.drivers_minimum_experience(date(2024, 1, 1)), None);
    }

    #[test]
    fn test_offer_flag_texts() {
        let offer = OfferData {
            power: "от 70 до 100 л.с.".to_string(),
            age: "старше 22 лет".to_string(),
            experience: "стаж более 3 лет".to_string(),
            term: "1 год".to_string(),
            car_type: "Легковой автомобиль".to_string(),
            region: "Москва".to_string(),
            is_multiple_drive: true,
            clear_experience: false,
        };
        assert_eq!(offer.is_multiple_drive_text(), "да");
        assert_eq!(offer.clear_experience_text(), "нет");
        assert_eq!(offer.power_text(), "от 70 до 100 л.с.");
    }
}
