//! Lead and contact payloads
//!
//! Pure mapping from sales records to the JSON objects the CRM's `set`
//! endpoints accept. Nothing here performs I/O; the object id is not part of
//! a payload either, it travels with the [`Operation`](crate::gateway::Operation)
//! chosen at upsert time.
//!
//! Custom fields always take the shape
//!
//! ```json
//! { "id": 1450321, "values": [ { "value": "A1B2C3" } ] }
//! { "id": 1450330, "values": [ { "value": "a@b.ru", "enum": "WORK" } ] }
//! ```
//!
//! Risk parameters (power, youngest driver age, shortest experience) are
//! taken from the resolved vehicle and driver records when the policy has
//! them, and from the offer projection's texts otherwise.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::CrmObjectId;
use domain_order::{BackCall, Order, Policy};

use crate::config::AmoCrmConfig;
use crate::error::CrmError;
use crate::fields::{names, FieldId, FieldRegistry};

/// Lead tags and fixed contact names, sent verbatim to the CRM
pub mod labels {
    pub const TAG_DOCUMENTS_UPLOADED: &str = "загружены-документы";
    pub const TAG_PAID_BY_CARD: &str = "доставка оплачено картой";
    pub const TAG_PAY_COURIER: &str = "доставка оплата курьеру";
    pub const TAG_BACK_CALL_IN_ORDER: &str = "обратный звонок процесс оформления";
    pub const TAG_BACK_CALL: &str = "обратный звонок";
    pub const TAG_INSURANT: &str = "страхователь";

    pub const CONTACT_POLICYHOLDER: &str = "Страхователь";
    pub const CONTACT_DOCUMENTS: &str = "документы";
}

/// A single custom field value: text or integer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

/// Discriminator for multi-valued system fields such as email and phone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnumTag {
    Work,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomFieldValue {
    pub value: FieldValue,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_tag: Option<EnumTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomField {
    pub id: FieldId,
    pub values: Vec<CustomFieldValue>,
}

/// Lead payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Unix seconds
    pub last_modified: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
}

impl Lead {
    /// Looks up the values sent for a field id
    pub fn field(&self, id: FieldId) -> Option<&CustomField> {
        self.custom_fields.iter().find(|field| field.id == id)
    }
}

/// Contact payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub name: String,
    pub linked_leads_id: Vec<CrmObjectId>,
    /// Unix seconds
    pub last_modified: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
}

impl Contact {
    /// Links the contact to the lead it belongs to
    pub fn linked_to(mut self, lead_id: CrmObjectId) -> Self {
        self.linked_leads_id = vec![lead_id];
        self
    }
}

/// Accumulates custom fields, resolving names through the registry
pub struct CustomFields<'a> {
    registry: &'a FieldRegistry,
    fields: Vec<CustomField>,
}

impl<'a> CustomFields<'a> {
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self {
            registry,
            fields: Vec::new(),
        }
    }

    pub fn push(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<&mut Self, CrmError> {
        self.push_value(name, value.into(), None)
    }

    pub fn push_tagged(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
        tag: EnumTag,
    ) -> Result<&mut Self, CrmError> {
        self.push_value(name, value.into(), Some(tag))
    }

    fn push_value(
        &mut self,
        name: &str,
        value: FieldValue,
        enum_tag: Option<EnumTag>,
    ) -> Result<&mut Self, CrmError> {
        let id = self.registry.id(name)?;
        self.fields.push(CustomField {
            id,
            values: vec![CustomFieldValue { value, enum_tag }],
        });
        Ok(self)
    }

    pub fn finish(self) -> Vec<CustomField> {
        self.fields
    }
}

/// Builds lead and contact payloads for each sales milestone
#[derive(Debug, Clone)]
pub struct PayloadContext {
    registry: FieldRegistry,
    product_label: String,
    order_link_base: String,
}

impl PayloadContext {
    pub fn new(
        registry: FieldRegistry,
        product_label: impl Into<String>,
        order_link_base: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            product_label: product_label.into(),
            order_link_base: order_link_base.into(),
        }
    }

    pub fn from_config(config: &AmoCrmConfig) -> Self {
        Self::new(
            config.field_registry(),
            config.product_label.clone(),
            config.order_link_base.clone(),
        )
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Lead name, e.g. `Осаго A1B2C3`
    pub fn lead_name(&self, code: &str) -> String {
        format!("{} {}", self.product_label, code)
    }

    /// Customer-facing link to the order page
    pub fn order_link(&self, code: &str) -> String {
        format!("{}{}", self.order_link_base, code)
    }

    /// Lead sent when the customer enters email and phone
    pub fn email_and_phone_lead(&self, order: &Order, now: DateTime<Utc>) -> Result<Lead, CrmError> {
        self.order_lead(order, None, now)
    }

    /// Lead sent once the documents are uploaded
    pub fn documents_uploaded_lead(&self, order: &Order, now: DateTime<Utc>) -> Result<Lead, CrmError> {
        self.order_lead(order, Some(labels::TAG_DOCUMENTS_UPLOADED), now)
    }

    /// Lead sent when an insured party is registered
    pub fn insurant_lead(&self, order: &Order, now: DateTime<Utc>) -> Result<Lead, CrmError> {
        self.order_lead(order, Some(labels::TAG_INSURANT), now)
    }

    /// Lead update sent right before payment is confirmed
    ///
    /// Carries the full vehicle, driver and delivery picture. Has no name:
    /// the lead already exists and keeps the one it was created with.
    pub fn before_paid_lead(&self, order: &Order, now: DateTime<Utc>) -> Result<Lead, CrmError> {
        let payment = order
            .payment
            .ok_or_else(|| CrmError::missing_source("payment"))?;
        let tag = if payment.is_card() {
            labels::TAG_PAID_BY_CARD
        } else {
            labels::TAG_PAY_COURIER
        };

        let policy = &order.policy;
        let auto = policy
            .auto
            .as_ref()
            .ok_or_else(|| CrmError::missing_source("auto"))?;
        let delivery = order
            .delivery
            .ok_or_else(|| CrmError::missing_source(names::DELIVERY_DATETIME))?;

        let mut fields = CustomFields::new(&self.registry);
        fields.push(names::COMPANY, insurer_label(policy)?)?;
        push_risk_profile(&mut fields, policy, now.date_naive())?;
        fields
            .push(names::MARK, auto.mark_label.as_str())?
            .push(names::MODEL, auto.model_label.as_str())?
            .push(names::PRODUCTION_YEAR, auto.production_year)?
            .push(names::DELIVERY_DATETIME, delivery.window_label())?;

        Ok(Lead {
            name: None,
            price: order.total_price,
            tags: Some(tag.to_string()),
            last_modified: now.timestamp(),
            custom_fields: fields.finish(),
        })
    }

    /// Lead sent when a callback is requested from inside an order
    ///
    /// Before the customer has filled in the vehicle and driver forms the
    /// risk parameters come from the offer projection.
    pub fn back_call_order_lead(&self, order: &Order, now: DateTime<Utc>) -> Result<Lead, CrmError> {
        let policy = &order.policy;
        let offer = policy
            .offer
            .as_ref()
            .ok_or_else(|| CrmError::missing_source(names::TERM))?;

        let mut fields = CustomFields::new(&self.registry);
        self.push_order_reference(&mut fields, order)?;
        fields.push(names::COMPANY, insurer_label(policy)?)?;
        push_risk_profile(&mut fields, policy, now.date_naive())?;
        fields
            .push(names::TERM, offer.term_text())?
            .push(names::CAR_TYPE, offer.car_type_text())?
            .push(names::IS_MULTIPLE_DRIVE, offer.is_multiple_drive_text())?
            .push(names::CLEAR_EXPERIENCE, offer.clear_experience_text())?
            .push(names::REGION, offer.region_text())?;

        Ok(Lead {
            name: Some(self.lead_name(&order.code)),
            price: policy.price,
            tags: Some(labels::TAG_BACK_CALL_IN_ORDER.to_string()),
            last_modified: now.timestamp(),
            custom_fields: fields.finish(),
        })
    }

    /// Lead sent for a callback that is not tied to any order
    pub fn back_call_orphan_lead(&self, back_call: &BackCall, now: DateTime<Utc>) -> Lead {
        Lead {
            name: Some(format!("{} {} без заказа", self.product_label, back_call.id.get())),
            price: Decimal::ZERO,
            tags: Some(labels::TAG_BACK_CALL.to_string()),
            last_modified: now.timestamp(),
            custom_fields: Vec::new(),
        }
    }

    /// Contact carrying work email and phone, not yet linked to a lead
    pub fn contact(
        &self,
        name: impl Into<String>,
        email: &str,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<Contact, CrmError> {
        let mut fields = CustomFields::new(&self.registry);
        fields
            .push_tagged(names::EMAIL, email, EnumTag::Work)?
            .push_tagged(names::PHONE, phone, EnumTag::Work)?;

        Ok(Contact {
            name: name.into(),
            linked_leads_id: Vec::new(),
            last_modified: now.timestamp(),
            custom_fields: fields.finish(),
        })
    }

    /// Contact name used when documents are uploaded, e.g. `Осаго документы A1B2C3`
    pub fn documents_contact_name(&self, code: &str) -> String {
        format!("{} {} {}", self.product_label, labels::CONTACT_DOCUMENTS, code)
    }

    fn order_lead(&self, order: &Order, tag: Option<&str>, now: DateTime<Utc>) -> Result<Lead, CrmError> {
        let mut fields = CustomFields::new(&self.registry);
        self.push_order_reference(&mut fields, order)?;

        Ok(Lead {
            name: Some(self.lead_name(&order.code)),
            price: order.policy.price,
            tags: tag.map(str::to_string),
            last_modified: now.timestamp(),
            custom_fields: fields.finish(),
        })
    }

    fn push_order_reference(&self, fields: &mut CustomFields<'_>, order: &Order) -> Result<(), CrmError> {
        fields
            .push(names::ORDER_NUMBER, order.code.as_str())?
            .push(names::LINK, self.order_link(&order.code))?;
        Ok(())
    }
}

fn insurer_label(policy: &Policy) -> Result<&str, CrmError> {
    policy
        .insurance_company
        .as_ref()
        .map(|company| company.label.as_str())
        .ok_or_else(|| CrmError::missing_source(names::COMPANY))
}

/// Pushes power, youngest driver age and shortest experience
fn push_risk_profile(fields: &mut CustomFields<'_>, policy: &Policy, today: NaiveDate) -> Result<(), CrmError> {
    fields
        .push(names::POWER, power_value(policy)?)?
        .push(names::YOUNGEST, youngest_value(policy, today)?)?
        .push(names::INEXPERIENCED, inexperienced_value(policy, today)?)?;
    Ok(())
}

fn power_value(policy: &Policy) -> Result<FieldValue, CrmError> {
    match (&policy.auto, &policy.offer) {
        (Some(auto), _) => Ok(auto.power.into()),
        (None, Some(offer)) => Ok(offer.power_text().into()),
        (None, None) => Err(CrmError::missing_source(names::POWER)),
    }
}

fn youngest_value(policy: &Policy, today: NaiveDate) -> Result<FieldValue, CrmError> {
    match (policy.drivers_minimum_age(today), &policy.offer) {
        (Some(age), _) => Ok(age.into()),
        (None, Some(offer)) => Ok(offer.age_text().into()),
        (None, None) => Err(CrmError::missing_source(names::YOUNGEST)),
    }
}

fn inexperienced_value(policy: &Policy, today: NaiveDate) -> Result<FieldValue, CrmError> {
    match (policy.drivers_minimum_experience(today), &policy.offer) {
        (Some(years), _) => Ok(years.into()),
        (None, Some(offer)) => Ok(offer.experience_text().into()),
        (None, None) => Err(CrmError::missing_source(names::INEXPERIENCED)),
    }
}
