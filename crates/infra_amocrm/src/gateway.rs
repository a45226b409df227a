//! CRM HTTP gateway
//!
//! [`CrmGateway`] is the seam between the event handlers and the CRM. The
//! production [`AmoGateway`] talks to the legacy JSON API:
//!
//! ```text
//! POST /private/api/v2/json/leads/set
//! {"request": {"leads": {"add": [ {...lead...} ]}}}
//! {"request": {"leads": {"update": [ {"id": 4711, ...lead...} ]}}}
//!
//! <- {"response": {"leads": {"add": [ {"id": 4711, ...} ]}}}
//! ```
//!
//! Contacts follow the same shape under `contacts`. Every request carries
//! the session cookie obtained by [`AuthClient`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::COOKIE;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use core_kernel::{AdapterHealth, CrmObjectId, HealthCheckResult, HealthCheckable};

use crate::auth::AuthClient;
use crate::config::AmoCrmConfig;
use crate::error::CrmError;
use crate::payload::{Contact, Lead};

/// Path of the account metadata endpoint
pub const ACCOUNT_PATH: &str = "/private/api/v2/json/accounts/current";

/// Kind of CRM object being written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Lead,
    Contact,
}

impl EntityKind {
    /// Collection name used in URLs and envelopes
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Lead => "leads",
            EntityKind::Contact => "contacts",
        }
    }

    /// Path of the upsert endpoint for this kind
    pub fn set_path(&self) -> String {
        format!("/private/api/v2/json/{}/set", self.collection())
    }
}

/// Create a new object, or update the one with the given id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update(CrmObjectId),
}

impl Operation {
    /// Picks the operation from a stored cross-reference id
    pub fn from_existing(id: Option<CrmObjectId>) -> Self {
        match id {
            Some(id) => Operation::Update(id),
            None => Operation::Create,
        }
    }

    /// Batch key inside the request envelope
    pub fn wire_name(&self) -> &'static str {
        match self {
            Operation::Create => "add",
            Operation::Update(_) => "update",
        }
    }

    pub fn object_id(&self) -> Option<CrmObjectId> {
        match self {
            Operation::Create => None,
            Operation::Update(id) => Some(*id),
        }
    }
}

/// A lead or contact ready to be sent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CrmPayload {
    Lead(Lead),
    Contact(Contact),
}

impl CrmPayload {
    pub fn kind(&self) -> EntityKind {
        match self {
            CrmPayload::Lead(_) => EntityKind::Lead,
            CrmPayload::Contact(_) => EntityKind::Contact,
        }
    }
}

impl From<Lead> for CrmPayload {
    fn from(lead: Lead) -> Self {
        CrmPayload::Lead(lead)
    }
}

impl From<Contact> for CrmPayload {
    fn from(contact: Contact) -> Self {
        CrmPayload::Contact(contact)
    }
}

/// Wraps a payload in the `set` request envelope
///
/// Updates carry the object id inside the item; creates carry none.
pub fn envelope(operation: Operation, payload: &CrmPayload) -> Result<Value, CrmError> {
    let mut item = serde_json::to_value(payload)?;
    if let (Some(id), Value::Object(fields)) = (operation.object_id(), &mut item) {
        fields.insert("id".to_string(), json!(id));
    }

    let mut batch = Map::new();
    batch.insert(operation.wire_name().to_string(), Value::Array(vec![item]));

    let mut request = Map::new();
    request.insert(payload.kind().collection().to_string(), Value::Object(batch));

    Ok(json!({ "request": request }))
}

/// Reads the object id the CRM echoes back for the first item of a batch
pub fn echoed_id(kind: EntityKind, operation: Operation, response: &Value) -> Result<CrmObjectId, CrmError> {
    let pointer = format!("/response/{}/{}/0/id", kind.collection(), operation.wire_name());
    let id = match response.pointer(&pointer) {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.parse().ok(),
        _ => None,
    };

    id.map(CrmObjectId::new)
        .ok_or_else(|| CrmError::unexpected(format!("no object id at {pointer}")))
}

/// Writes leads and contacts to the CRM
#[async_trait]
pub trait CrmGateway: Send + Sync {
    /// Creates or updates one object, returning its CRM id
    async fn upsert(&self, operation: Operation, payload: &CrmPayload) -> Result<CrmObjectId, CrmError>;

    /// Fetches the account metadata, including the custom field catalogue
    async fn account_info(&self) -> Result<Value, CrmError>;
}

/// [`CrmGateway`] over the amoCRM legacy JSON API
#[derive(Debug)]
pub struct AmoGateway {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<AuthClient>,
}

impl AmoGateway {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, auth: Arc<AuthClient>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// Builds the HTTP client and auth client from configuration
    pub fn from_config(config: &AmoCrmConfig) -> Result<Self, CrmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = config.base_url();
        let auth = Arc::new(AuthClient::new(
            http.clone(),
            &base_url,
            config.user_login.clone(),
            config.user_hash.clone(),
        ));
        Ok(Self::new(http, base_url, auth))
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the session cookie, sends, and decodes a JSON body
    async fn send(&self, request: reqwest::RequestBuilder, path: &str) -> Result<Value, CrmError> {
        let token = self.auth.authenticate().await;
        let request = if token.is_empty() {
            request
        } else {
            request.header(COOKIE, token.cookie_header())
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrmError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|error| CrmError::unexpected(format!("{path} answered with invalid JSON: {error}")))
    }
}

#[async_trait]
impl CrmGateway for AmoGateway {
    #[instrument(
        skip(self, operation, payload),
        fields(kind = payload.kind().collection(), operation = operation.wire_name())
    )]
    async fn upsert(&self, operation: Operation, payload: &CrmPayload) -> Result<CrmObjectId, CrmError> {
        let kind = payload.kind();
        let path = kind.set_path();
        let body = envelope(operation, payload)?;

        let response = self.send(self.http.post(self.url(&path)).json(&body), &path).await?;
        let id = echoed_id(kind, operation, &response)?;

        debug!(id = %id, "CRM object written");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn account_info(&self) -> Result<Value, CrmError> {
        self.send(self.http.get(self.url(ACCOUNT_PATH)), ACCOUNT_PATH).await
    }
}

#[async_trait]
impl HealthCheckable for AmoGateway {
    async fn health_check(&self) -> HealthCheckResult {
        let started = Instant::now();
        let (status, message) = match self.account_info().await {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(error) => (AdapterHealth::Unhealthy, Some(error.to_string())),
        };

        HealthCheckResult {
            adapter_id: "amocrm".to_string(),
            status,
            latency_ms: started.elapsed().as_millis() as u64,
            message,
            checked_at: Utc::now(),
        }
    }
}

/// Recording gateway for handler tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, Ordering};

    use tokio::sync::Mutex;

    use super::*;

    /// One recorded upsert
    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub kind: EntityKind,
        pub operation: Operation,
        /// The request envelope exactly as it would have been sent
        pub envelope: Value,
    }

    impl RecordedCall {
        /// The single item inside the envelope
        pub fn item(&self) -> &Value {
            &self.envelope["request"][self.kind.collection()][self.operation.wire_name()][0]
        }
    }

    /// Records every upsert; creates get sequential ids starting at 1000
    #[derive(Debug)]
    pub struct MockCrmGateway {
        calls: Mutex<Vec<RecordedCall>>,
        failing: Mutex<HashSet<EntityKind>>,
        next_id: AtomicU64,
    }

    impl Default for MockCrmGateway {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockCrmGateway {
        pub fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failing: Mutex::new(HashSet::new()),
                next_id: AtomicU64::new(1000),
            }
        }

        /// Makes every later upsert of `kind` fail with HTTP 500
        pub async fn fail_on(&self, kind: EntityKind) {
            self.failing.lock().await.insert(kind);
        }

        pub async fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().await.clone()
        }

        pub async fn calls_for(&self, kind: EntityKind) -> Vec<RecordedCall> {
            self.calls
                .lock()
                .await
                .iter()
                .filter(|call| call.kind == kind)
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl CrmGateway for MockCrmGateway {
        async fn upsert(&self, operation: Operation, payload: &CrmPayload) -> Result<CrmObjectId, CrmError> {
            let kind = payload.kind();
            self.calls.lock().await.push(RecordedCall {
                kind,
                operation,
                envelope: envelope(operation, payload)?,
            });

            if self.failing.lock().await.contains(&kind) {
                return Err(CrmError::Status {
                    status: 500,
                    path: kind.set_path(),
                });
            }

            Ok(match operation {
                Operation::Update(id) => id,
                Operation::Create => CrmObjectId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            })
        }

        async fn account_info(&self) -> Result<Value, CrmError> {
            Ok(json!({ "response": { "account": { "subdomain": "mock" } } }))
        }
    }
}
