//! Sales event handlers
//!
//! [`AmoSync`] turns each [`SalesEvent`] into at most two CRM upserts: the
//! lead first, then the contact linked to the lead id the CRM returned.
//! Whether an upsert creates or updates is decided by the ids stored on the
//! order; the returned ids are written back through the [`OrderStore`],
//! the lead id even when the contact upsert that follows it fails. There are
//! no retries, and a failed lead upsert stops the handler before the contact
//! is touched.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument};

use core_kernel::CrmObjectId;
use domain_order::{BackCall, Insurant, Order, OrderStore, SalesEvent, SalesEventHandler, SyncOutcome};

use crate::config::AmoCrmConfig;
use crate::error::CrmError;
use crate::gateway::{AmoGateway, CrmGateway, CrmPayload, Operation};
use crate::payload::{labels, Contact, Lead, PayloadContext};

/// CRM synchronization for sales events
pub struct AmoSync {
    gateway: Arc<dyn CrmGateway>,
    store: Arc<dyn OrderStore>,
    payloads: PayloadContext,
    enabled: bool,
}

impl AmoSync {
    pub fn new(gateway: Arc<dyn CrmGateway>, store: Arc<dyn OrderStore>, payloads: PayloadContext) -> Self {
        Self {
            gateway,
            store,
            payloads,
            enabled: true,
        }
    }

    /// Wires the production gateway from configuration
    pub fn from_config(config: &AmoCrmConfig, store: Arc<dyn OrderStore>) -> Result<Self, CrmError> {
        config.validate()?;
        let gateway = Arc::new(AmoGateway::from_config(config)?);
        Ok(Self::new(gateway, store, PayloadContext::from_config(config)).with_enabled(config.enabled))
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn on_email_and_phone_set(&self, order: Order, now: DateTime<Utc>) -> Result<SyncOutcome, CrmError> {
        let lead = self.payloads.email_and_phone_lead(&order, now)?;
        let contact = self
            .payloads
            .contact(labels::CONTACT_POLICYHOLDER, &order.email, &order.phone, now)?;
        self.sync_order(order, lead, contact).await
    }

    async fn on_documents_uploaded(&self, order: Order, now: DateTime<Utc>) -> Result<SyncOutcome, CrmError> {
        let lead = self.payloads.documents_uploaded_lead(&order, now)?;
        let contact = self.payloads.contact(
            self.payloads.documents_contact_name(&order.code),
            &order.email,
            &order.phone,
            now,
        )?;
        self.sync_order(order, lead, contact).await
    }

    async fn on_before_paid(&self, order: Order, now: DateTime<Utc>) -> Result<SyncOutcome, CrmError> {
        let lead_id = order
            .amo_lead_id
            .ok_or_else(|| CrmError::MissingLeadId(order.code.clone()))?;
        let lead = self.payloads.before_paid_lead(&order, now)?;

        let lead_id = self
            .gateway
            .upsert(Operation::Update(lead_id), &CrmPayload::from(lead))
            .await?;

        info!(lead_id = %lead_id, "Lead updated before payment");
        Ok(SyncOutcome::lead_only(lead_id))
    }

    async fn on_back_call(&self, back_call: BackCall, now: DateTime<Utc>) -> Result<SyncOutcome, CrmError> {
        let order = match back_call.order_code() {
            Some(code) => self.store.find_by_code(code).await?,
            None => None,
        };

        match order {
            Some(order) => {
                let lead = self.payloads.back_call_order_lead(&order, now)?;
                let contact = self
                    .payloads
                    .contact(back_call.name.clone(), &back_call.email, &back_call.phone, now)?;
                self.sync_order(order, lead, contact).await
            }
            None => {
                debug!("Callback is not tied to a known order");
                let lead = self.payloads.back_call_orphan_lead(&back_call, now);
                let contact = self
                    .payloads
                    .contact(back_call.name.clone(), &back_call.email, &back_call.phone, now)?;
                let (lead_id, contact_id) = self.upsert_pair(None, None, lead, contact).await?;
                Ok(SyncOutcome::lead_and_contact(lead_id, contact_id))
            }
        }
    }

    async fn on_insurant_created(&self, insurant: Insurant, now: DateTime<Utc>) -> Result<SyncOutcome, CrmError> {
        let order = self
            .store
            .find_by_code(&insurant.order_code)
            .await?
            .ok_or_else(|| CrmError::OrderNotFound(insurant.order_code.clone()))?;

        let lead = self.payloads.insurant_lead(&order, now)?;
        let contact = self
            .payloads
            .contact(insurant.full_name.clone(), &insurant.email, &insurant.phone, now)?;
        self.sync_order(order, lead, contact).await
    }

    /// Upserts lead and contact for an order and stores the resulting ids
    ///
    /// A lead id returned before a failed contact upsert is still written
    /// back, so the next event updates that lead instead of creating another.
    async fn sync_order(&self, mut order: Order, lead: Lead, contact: Contact) -> Result<SyncOutcome, CrmError> {
        let lead_id = self.upsert_lead(order.amo_lead_id, lead).await?;
        order.record_lead_id(lead_id);

        let contact_id = match self.upsert_contact(order.amo_contact_id, lead_id, contact).await {
            Ok(contact_id) => contact_id,
            Err(error) => {
                self.store.save(&order).await?;
                debug!(lead_id = %lead_id, "Lead id stored after failed contact upsert");
                return Err(error);
            }
        };

        order.record_crm_ids(lead_id, contact_id);
        self.store.save(&order).await?;

        info!(lead_id = %lead_id, contact_id = %contact_id, "Order synced to CRM");
        Ok(SyncOutcome::lead_and_contact(lead_id, contact_id))
    }

    async fn upsert_pair(
        &self,
        lead_id: Option<CrmObjectId>,
        contact_id: Option<CrmObjectId>,
        lead: Lead,
        contact: Contact,
    ) -> Result<(CrmObjectId, CrmObjectId), CrmError> {
        let lead_id = self.upsert_lead(lead_id, lead).await?;
        let contact_id = self.upsert_contact(contact_id, lead_id, contact).await?;
        Ok((lead_id, contact_id))
    }

    async fn upsert_lead(&self, existing: Option<CrmObjectId>, lead: Lead) -> Result<CrmObjectId, CrmError> {
        self.gateway
            .upsert(Operation::from_existing(existing), &CrmPayload::from(lead))
            .await
    }

    async fn upsert_contact(
        &self,
        existing: Option<CrmObjectId>,
        lead_id: CrmObjectId,
        contact: Contact,
    ) -> Result<CrmObjectId, CrmError> {
        self.gateway
            .upsert(
                Operation::from_existing(existing),
                &CrmPayload::from(contact.linked_to(lead_id)),
            )
            .await
    }
}

#[async_trait]
impl SalesEventHandler for AmoSync {
    type Error = CrmError;

    #[instrument(
        skip(self, event),
        fields(event_type = event.event_type(), order_code = event.order_code().unwrap_or("-"))
    )]
    async fn handle(&self, event: SalesEvent) -> Result<SyncOutcome, CrmError> {
        if !self.enabled {
            debug!("CRM sync disabled, event skipped");
            return Ok(SyncOutcome::skipped());
        }

        let now = event.timestamp();
        let result = match event {
            SalesEvent::OrderEmailAndPhoneSet { order, .. } => self.on_email_and_phone_set(order, now).await,
            SalesEvent::OrderDocumentsUploaded { order, .. } => self.on_documents_uploaded(order, now).await,
            SalesEvent::OrderBeforePaid { order, .. } => self.on_before_paid(order, now).await,
            SalesEvent::BackCallCreated { back_call, .. } => self.on_back_call(back_call, now).await,
            SalesEvent::InsurantCreated { insurant, .. } => self.on_insurant_created(insurant, now).await,
        };

        if let Err(error) = &result {
            error!(%error, "CRM sync failed");
        }
        result
    }
}
