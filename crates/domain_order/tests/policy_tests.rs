//! Property tests for policy driver aggregates

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use rust_decimal_macros::dec;

use domain_order::{Driver, Policy};

fn date_strategy(years: std::ops::Range<i32>) -> impl Strategy<Value = NaiveDate> {
    (years, 1u32..=365).prop_map(|(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal).unwrap()
    })
}

prop_compose! {
    fn driver_strategy()(
        birth_date in date_strategy(1940..2005),
        licensed_after in 18i32..40,
        ordinal in 1u32..=365,
    ) -> Driver {
        let start_year = (birth_date.year() + licensed_after).min(2023);
        Driver {
            full_name: "Иванов Иван".to_string(),
            birth_date,
            experience_start_date: NaiveDate::from_yo_opt(start_year, ordinal).unwrap(),
        }
    }
}

fn policy_with(drivers: &[Driver]) -> Policy {
    drivers
        .iter()
        .cloned()
        .fold(Policy::new(dec!(4200)), Policy::with_driver)
}

proptest! {
    #[test]
    fn prop_minimum_age_bounds_every_driver(
        drivers in prop::collection::vec(driver_strategy(), 1..6),
        today in date_strategy(2024..2030),
    ) {
        let policy = policy_with(&drivers);
        let youngest = policy.drivers_minimum_age(today).unwrap();

        prop_assert!(drivers.iter().all(|d| youngest <= d.age_on(today)));
        prop_assert!(drivers.iter().any(|d| youngest == d.age_on(today)));
    }

    #[test]
    fn prop_minimum_experience_bounds_every_driver(
        drivers in prop::collection::vec(driver_strategy(), 1..6),
        today in date_strategy(2024..2030),
    ) {
        let policy = policy_with(&drivers);
        let shortest = policy.drivers_minimum_experience(today).unwrap();

        prop_assert!(drivers.iter().all(|d| shortest <= d.experience_on(today)));
        prop_assert!(drivers.iter().any(|d| shortest == d.experience_on(today)));
    }

    #[test]
    fn prop_no_drivers_means_no_aggregate(today in date_strategy(2024..2030)) {
        let policy = Policy::new(dec!(4200));

        prop_assert_eq!(policy.drivers_minimum_age(today), None);
        prop_assert_eq!(policy.drivers_minimum_experience(today), None);
    }
}
