//! Sales Domain Ports
//!
//! Two seams separate the sales domain from the outside world:
//!
//! - [`OrderStore`]: persistence owned by the host application. The CRM
//!   adapter uses it to look orders up by code and to save the CRM ids it
//!   writes back.
//! - [`SalesEventHandler`]: anything reacting to [`SalesEvent`]s. The host
//!   calls it explicitly from its own dispatch; there is no event bus.
//!
//! ```rust,ignore
//! let store: Arc<dyn OrderStore> = Arc::new(HostOrderStore::new(pool));
//! let sync = AmoSync::from_config(&config, store)?;
//!
//! // in the host's "email and phone set" code path
//! sync.handle(SalesEvent::email_and_phone_set(order)).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{CrmObjectId, DomainPort, PortError};

use crate::events::SalesEvent;
use crate::order::Order;

/// Persistence for orders, provided by the host application
#[async_trait]
pub trait OrderStore: DomainPort {
    /// Finds an order by its public code
    async fn find_by_code(&self, code: &str) -> Result<Option<Order>, PortError>;

    /// Persists the order, including its CRM cross-reference ids
    async fn save(&self, order: &Order) -> Result<(), PortError>;
}

/// Result of synchronizing one event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Lead created or updated for the event
    pub lead_id: Option<CrmObjectId>,
    /// Contact created or updated for the event
    pub contact_id: Option<CrmObjectId>,
}

impl SyncOutcome {
    /// Nothing was sent
    pub fn skipped() -> Self {
        Self::default()
    }

    /// Only the lead was touched
    pub fn lead_only(lead_id: CrmObjectId) -> Self {
        Self {
            lead_id: Some(lead_id),
            contact_id: None,
        }
    }

    /// Both a lead and a contact were touched
    pub fn lead_and_contact(lead_id: CrmObjectId, contact_id: CrmObjectId) -> Self {
        Self {
            lead_id: Some(lead_id),
            contact_id: Some(contact_id),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.lead_id.is_none() && self.contact_id.is_none()
    }
}

/// Reacts to sales lifecycle events
#[async_trait]
pub trait SalesEventHandler: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Handles one event to completion
    async fn handle(&self, event: SalesEvent) -> Result<SyncOutcome, Self::Error>;
}

/// Mock implementation of OrderStore for testing
///
/// Stores orders in memory keyed by code and counts saves, so handler tests
/// can assert on the write-back without a host database.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of OrderStore
    #[derive(Debug, Default)]
    pub struct MockOrderStore {
        orders: Arc<RwLock<HashMap<String, Order>>>,
        saves: AtomicUsize,
        unavailable: AtomicBool,
    }

    impl MockOrderStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with orders for testing
        pub async fn with_orders(orders: Vec<Order>) -> Self {
            let store = Self::new();
            for order in orders {
                store.orders.write().await.insert(order.code.clone(), order);
            }
            store
        }

        /// Returns the stored copy of an order
        pub async fn get(&self, code: &str) -> Option<Order> {
            self.orders.read().await.get(code).cloned()
        }

        /// Number of successful `save` calls made so far
        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        /// Makes every later `save` fail with a connection error
        pub fn go_offline(&self) {
            self.unavailable.store(true, Ordering::SeqCst);
        }
    }

    impl DomainPort for MockOrderStore {}

    #[async_trait]
    impl OrderStore for MockOrderStore {
        async fn find_by_code(&self, code: &str) -> Result<Option<Order>, PortError> {
            Ok(self.orders.read().await.get(code).cloned())
        }

        async fn save(&self, order: &Order) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::connection("order store offline"));
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.orders
                .write()
                .await
                .insert(order.code.clone(), order.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::mock::MockOrderStore;
    use crate::policy::Policy;
    use core_kernel::OrderId;
    use rust_decimal_macros::dec;

    fn order(code: &str) -> Order {
        Order::new(OrderId::new(1), code, "a@example.com", "+79990000000", Policy::new(dec!(3000))).unwrap()
    }

    #[tokio::test]
    async fn test_mock_store_find_and_save() {
        let store = MockOrderStore::with_orders(vec![order("A1")]).await;

        let mut found = store.find_by_code("A1").await.unwrap().unwrap();
        assert!(store.find_by_code("B2").await.unwrap().is_none());

        found.record_crm_ids(CrmObjectId::new(5), CrmObjectId::new(6));
        store.save(&found).await.unwrap();

        assert_eq!(store.save_count(), 1);
        assert!(store.get("A1").await.unwrap().is_synced());
    }

    #[tokio::test]
    async fn test_offline_mock_store_rejects_saves() {
        let store = MockOrderStore::with_orders(vec![order("A1")]).await;
        store.go_offline();

        let err = store.save(&order("A1")).await.unwrap_err();
        assert!(matches!(err, PortError::Connection { .. }));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_sync_outcome_constructors() {
        assert!(SyncOutcome::skipped().is_skipped());

        let lead = SyncOutcome::lead_only(CrmObjectId::new(1));
        assert!(!lead.is_skipped());
        assert_eq!(lead.contact_id, None);

        let both = SyncOutcome::lead_and_contact(CrmObjectId::new(1), CrmObjectId::new(2));
        assert_eq!(both.contact_id, Some(CrmObjectId::new(2)));
    }
}
