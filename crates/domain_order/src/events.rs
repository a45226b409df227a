//! Domain events raised by the sales flow
//!
//! Each event carries the record that triggered it. The host application
//! raises these at the matching points of its request handling and hands
//! them to a [`SalesEventHandler`](crate::ports::SalesEventHandler).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::back_call::BackCall;
use crate::insurant::Insurant;
use crate::order::Order;

/// Sales lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SalesEvent {
    /// The customer entered email and phone on the order
    OrderEmailAndPhoneSet {
        order: Order,
        timestamp: DateTime<Utc>,
    },

    /// The customer uploaded the documents needed to issue the policy
    OrderDocumentsUploaded {
        order: Order,
        timestamp: DateTime<Utc>,
    },

    /// Payment is about to be confirmed for the order
    OrderBeforePaid {
        order: Order,
        timestamp: DateTime<Utc>,
    },

    /// A callback request was stored
    BackCallCreated {
        back_call: BackCall,
        timestamp: DateTime<Utc>,
    },

    /// An insured party was registered against an order
    InsurantCreated {
        insurant: Insurant,
        timestamp: DateTime<Utc>,
    },
}

impl SalesEvent {
    pub fn email_and_phone_set(order: Order) -> Self {
        SalesEvent::OrderEmailAndPhoneSet { order, timestamp: Utc::now() }
    }

    pub fn documents_uploaded(order: Order) -> Self {
        SalesEvent::OrderDocumentsUploaded { order, timestamp: Utc::now() }
    }

    pub fn before_paid(order: Order) -> Self {
        SalesEvent::OrderBeforePaid { order, timestamp: Utc::now() }
    }

    pub fn back_call_created(back_call: BackCall) -> Self {
        SalesEvent::BackCallCreated { back_call, timestamp: Utc::now() }
    }

    pub fn insurant_created(insurant: Insurant) -> Self {
        SalesEvent::InsurantCreated { insurant, timestamp: Utc::now() }
    }

    /// Returns the code of the order this event concerns, if known
    pub fn order_code(&self) -> Option<&str> {
        match self {
            SalesEvent::OrderEmailAndPhoneSet { order, .. } => Some(&order.code),
            SalesEvent::OrderDocumentsUploaded { order, .. } => Some(&order.code),
            SalesEvent::OrderBeforePaid { order, .. } => Some(&order.code),
            SalesEvent::BackCallCreated { back_call, .. } => back_call.order_code(),
            SalesEvent::InsurantCreated { insurant, .. } => Some(&insurant.order_code),
        }
    }

    /// Returns the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            SalesEvent::OrderEmailAndPhoneSet { timestamp, .. } => *timestamp,
            SalesEvent::OrderDocumentsUploaded { timestamp, .. } => *timestamp,
            SalesEvent::OrderBeforePaid { timestamp, .. } => *timestamp,
            SalesEvent::BackCallCreated { timestamp, .. } => *timestamp,
            SalesEvent::InsurantCreated { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            SalesEvent::OrderEmailAndPhoneSet { .. } => "OrderEmailAndPhoneSet",
            SalesEvent::OrderDocumentsUploaded { .. } => "OrderDocumentsUploaded",
            SalesEvent::OrderBeforePaid { .. } => "OrderBeforePaid",
            SalesEvent::BackCallCreated { .. } => "BackCallCreated",
            SalesEvent::InsurantCreated { .. } => "InsurantCreated",
        }
    }
}
