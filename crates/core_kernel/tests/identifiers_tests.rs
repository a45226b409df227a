//! Tests for host and CRM identifiers

use core_kernel::{BackCallId, CrmObjectId, InsurantId, OrderId};
use proptest::prelude::*;

mod host_id_tests {
    use super::*;

    #[test]
    fn test_prefixes_are_distinct() {
        assert_eq!(OrderId::prefix(), "ORD");
        assert_eq!(BackCallId::prefix(), "BCL");
        assert_eq!(InsurantId::prefix(), "INS");
    }

    #[test]
    fn test_foreign_prefix_is_rejected() {
        let insurant = InsurantId::new(5).to_string();
        assert!(insurant.parse::<OrderId>().is_err());
    }

    #[test]
    fn test_raw_value_conversion() {
        let id = OrderId::from(77u64);
        let raw: u64 = id.into();
        assert_eq!(raw, 77);
        assert_eq!(id.get(), 77);
    }

    proptest! {
        #[test]
        fn prop_display_parses_back(raw in any::<u64>()) {
            let id = OrderId::new(raw);
            let parsed: OrderId = id.to_string().parse().unwrap();
            prop_assert_eq!(parsed, id);
        }
    }
}

mod crm_id_tests {
    use super::*;

    #[test]
    fn test_display_is_bare_number() {
        assert_eq!(CrmObjectId::new(123).to_string(), "123");
    }

    #[test]
    fn test_linked_list_serializes_as_numbers() {
        let ids = vec![CrmObjectId::new(1), CrmObjectId::new(2)];
        assert_eq!(serde_json::to_string(&ids).unwrap(), "[1,2]");
    }
}
