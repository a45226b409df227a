//! HTTP Gateway Tests
//!
//! Runs [`AmoGateway`] against a fake amoCRM built with axum on an
//! ephemeral local port. The fake accepts the login `robot`/`good`, hands
//! out the `session_id=sess-42` cookie, and rejects `set` and account calls
//! that do not carry it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use core_kernel::{AdapterHealth, CrmObjectId, HealthCheckable};
use infra_amocrm::{AmoCrmConfig, AmoGateway, Contact, CrmError, CrmGateway, CrmPayload, Lead, Operation};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

// ============================================================================
// FAKE CRM
// ============================================================================

const SESSION: &str = "session_id=sess-42";

#[derive(Default)]
struct Recorded {
    logins: usize,
    requests: Vec<(String, Option<String>, Value)>,
}

type Shared = Arc<Mutex<Recorded>>;

fn cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn login(State(state): State<Shared>, Form(form): Form<HashMap<String, String>>) -> Response {
    state.lock().unwrap().logins += 1;

    let valid = form.get("USER_LOGIN").map(String::as_str) == Some("robot")
        && form.get("USER_HASH").map(String::as_str) == Some("good");
    if !valid {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "response": { "auth": false } }))).into_response();
    }

    (
        [(header::SET_COOKIE, "session_id=sess-42; path=/")],
        Json(json!({ "response": { "auth": true } })),
    )
        .into_response()
}

async fn set(collection: &'static str, state: Shared, headers: HeaderMap, body: Value) -> Response {
    let cookie = cookie(&headers);
    state
        .lock()
        .unwrap()
        .requests
        .push((collection.to_string(), cookie.clone(), body.clone()));

    if cookie.as_deref() != Some(SESSION) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let batch = &body["request"][collection];
    let (operation, id) = match batch.get("update") {
        Some(items) => ("update", items[0]["id"].clone()),
        None => ("add", json!(4711)),
    };

    Json(json!({
        "response": {
            collection: { operation: [{ "id": id, "request_id": 0 }] },
            "server_time": 1_700_000_000
        }
    }))
    .into_response()
}

async fn account(headers: HeaderMap) -> Response {
    if cookie(&headers).as_deref() != Some(SESSION) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "response": { "account": { "subdomain": "test", "custom_fields": { "leads": [] } } } }))
        .into_response()
}

async fn spawn_fake_crm() -> (String, Shared) {
    let state = Shared::default();
    let router = Router::new()
        .route("/private/api/auth.php", post(login))
        .route(
            "/private/api/v2/json/leads/set",
            post(|State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>| {
                set("leads", state, headers, body)
            }),
        )
        .route(
            "/private/api/v2/json/contacts/set",
            post(|State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>| {
                set("contacts", state, headers, body)
            }),
        )
        .route("/private/api/v2/json/accounts/current", get(account))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

fn gateway(base_url: &str, user_hash: &str) -> AmoGateway {
    let config = AmoCrmConfig::new("test", "robot", user_hash).with_base_url(base_url);
    AmoGateway::from_config(&config).unwrap()
}

fn lead() -> CrmPayload {
    CrmPayload::Lead(Lead {
        name: Some("Осаго A1B2C3".to_string()),
        price: dec!(5400.50),
        tags: None,
        last_modified: 1_717_243_200,
        custom_fields: Vec::new(),
    })
}

fn contact() -> CrmPayload {
    CrmPayload::Contact(
        Contact {
            name: "Страхователь".to_string(),
            linked_leads_id: Vec::new(),
            last_modified: 1_717_243_200,
            custom_fields: Vec::new(),
        }
        .linked_to(CrmObjectId::new(4711)),
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[tokio::test]
async fn test_create_posts_envelope_with_session_cookie() {
    let (url, state) = spawn_fake_crm().await;
    let gateway = gateway(&url, "good");

    let id = gateway.upsert(Operation::Create, &lead()).await.unwrap();

    assert_eq!(id, CrmObjectId::new(4711));
    let recorded = state.lock().unwrap();
    let (collection, cookie, body) = &recorded.requests[0];
    assert_eq!(collection, "leads");
    assert_eq!(cookie.as_deref(), Some(SESSION));

    let item = &body["request"]["leads"]["add"][0];
    assert_eq!(item["name"], "Осаго A1B2C3");
    assert_eq!(item["price"], json!(5400.5));
    assert!(item.get("id").is_none());
}

#[tokio::test]
async fn test_update_echoes_object_id() {
    let (url, state) = spawn_fake_crm().await;
    let gateway = gateway(&url, "good");

    let id = gateway
        .upsert(Operation::Update(CrmObjectId::new(55)), &contact())
        .await
        .unwrap();

    assert_eq!(id, CrmObjectId::new(55));
    let recorded = state.lock().unwrap();
    let item = &recorded.requests[0].2["request"]["contacts"]["update"][0];
    assert_eq!(item["id"], 55);
    assert_eq!(item["linked_leads_id"], json!([4711]));
}

#[tokio::test]
async fn test_session_is_reused_across_calls() {
    let (url, state) = spawn_fake_crm().await;
    let gateway = gateway(&url, "good");

    gateway.upsert(Operation::Create, &lead()).await.unwrap();
    gateway.upsert(Operation::Create, &contact()).await.unwrap();

    assert!(gateway.auth().is_authenticated().await);
    let recorded = state.lock().unwrap();
    assert_eq!(recorded.logins, 1);
    assert_eq!(recorded.requests.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_first_calls_log_in_once() {
    let (url, state) = spawn_fake_crm().await;
    let gateway = gateway(&url, "good");

    let lead = lead();
    let contact = contact();
    let (lead_id, contact_id) = tokio::join!(
        gateway.upsert(Operation::Create, &lead),
        gateway.upsert(Operation::Create, &contact),
    );

    assert_eq!(lead_id.unwrap(), CrmObjectId::new(4711));
    assert_eq!(contact_id.unwrap(), CrmObjectId::new(4711));
    let recorded = state.lock().unwrap();
    assert_eq!(recorded.logins, 1);
    assert!(recorded.requests.iter().all(|(_, cookie, _)| cookie.as_deref() == Some(SESSION)));
}

#[tokio::test]
async fn test_rejected_login_yields_empty_token_and_retries() {
    let (url, state) = spawn_fake_crm().await;
    let gateway = gateway(&url, "wrong");

    let token = gateway.auth().authenticate().await;
    assert!(token.is_empty());
    assert!(!gateway.auth().is_authenticated().await);

    let err = gateway.upsert(Operation::Create, &lead()).await.unwrap_err();
    assert!(matches!(err, CrmError::Status { status: 401, .. }));

    let recorded = state.lock().unwrap();
    assert_eq!(recorded.logins, 2);
    assert_eq!(recorded.requests[0].1, None);
}

#[tokio::test]
async fn test_account_info_and_health_check() {
    let (url, _state) = spawn_fake_crm().await;
    let gateway = gateway(&url, "good");

    let account = gateway.account_info().await.unwrap();
    assert_eq!(account["response"]["account"]["subdomain"], "test");

    let health = gateway.health_check().await;
    assert_eq!(health.status, AdapterHealth::Healthy);
    assert_eq!(health.adapter_id, "amocrm");
}

#[tokio::test]
async fn test_unreachable_account_is_unhealthy() {
    let (url, _state) = spawn_fake_crm().await;
    let gateway = gateway(&url, "wrong");

    let health = gateway.health_check().await;

    assert_eq!(health.status, AdapterHealth::Unhealthy);
    assert!(health.message.unwrap().contains("401"));
}
