//! In-memory stand-in for the subset of the Telnyx API the core client
//! covers. Requests need a bearer token and failures answer with a Telnyx
//! `errors` document.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Timestamp stamped on every record the mock creates.
pub const MOCK_TIMESTAMP: &str = "2024-01-01T00:00:00.000Z";

const FIRST_NUMBER_ID: u64 = 1_293_384_261_075_731_400;
const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallRecord {
    pub call_control_id: String,
    pub call_leg_id: String,
    pub call_session_id: String,
    pub is_alive: bool,
    pub record_type: String,
    pub client_state: Option<String>,
}

#[derive(Deserialize)]
pub struct DialRequest {
    pub connection_id: String,
    pub to: String,
    pub from: String,
    pub client_state: Option<String>,
}

#[derive(Deserialize)]
pub struct RingTarget {
    pub name: String,
    pub to: String,
}

#[derive(Deserialize)]
pub struct RingGroupRequest {
    pub targets: Vec<RingTarget>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Endpoint {
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: Uuid,
    pub record_type: String,
    pub direction: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub from: Endpoint,
    pub to: Vec<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub webhook_url: Option<String>,
    pub parts: u32,
    pub cost: Option<Value>,
    pub received_at: Option<String>,
    pub sent_at: Option<String>,
    pub completed_at: Option<String>,
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub to: String,
    pub from: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
    pub webhook_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhoneNumberRecord {
    pub id: String,
    pub record_type: String,
    pub phone_number: String,
    pub status: String,
    pub tags: Vec<String>,
    pub phone_number_type: String,
    pub connection_id: Option<String>,
    pub customer_reference: Option<String>,
    pub billing_group_id: Option<String>,
    pub purchased_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderedNumberRecord {
    pub id: String,
    pub record_type: String,
    pub phone_number: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NumberOrderRecord {
    pub id: String,
    pub record_type: String,
    pub status: String,
    pub phone_numbers: Vec<OrderedNumberRecord>,
    pub phone_numbers_count: u32,
    pub connection_id: Option<String>,
    pub customer_reference: Option<String>,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct OrderedNumberRequest {
    pub phone_number: String,
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub phone_numbers: Vec<OrderedNumberRequest>,
    pub connection_id: Option<String>,
    pub customer_reference: Option<String>,
}

#[derive(Default)]
pub struct Store {
    calls: HashMap<String, CallRecord>,
    messages: HashMap<Uuid, MessageRecord>,
    phone_numbers: BTreeMap<String, PhoneNumberRecord>,
    number_orders: HashMap<String, NumberOrderRecord>,
    next_number_id: u64,
}

pub type Db = Arc<RwLock<Store>>;

/// A Telnyx style error answer.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    code: &'static str,
    title: &'static str,
    detail: String,
    pointer: Option<&'static str>,
}

impl ApiFailure {
    fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "10005",
            title: "Resource not found",
            detail: detail.into(),
            pointer: None,
        }
    }

    fn invalid(pointer: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            code: "10015",
            title: "Invalid value",
            detail: detail.into(),
            pointer: Some(pointer),
        }
    }

    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "10009",
            title: "Authentication failed",
            detail: "Could not understand the provided credentials.".to_string(),
            pointer: None,
        }
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid("/", rejection.body_text())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let mut error = json!({
            "code": self.code,
            "title": self.title,
            "detail": self.detail,
        });
        if let Some(pointer) = self.pointer {
            error["source"] = json!({ "pointer": pointer });
        }
        (self.status, Json(json!({ "errors": [error] }))).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiFailure>;

fn data(value: impl Serialize) -> ApiResult {
    Ok(Json(json!({ "data": value })))
}

fn action_ok() -> ApiResult {
    data(json!({ "result": "ok" }))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store {
        next_number_id: FIRST_NUMBER_ID,
        ..Store::default()
    }));
    Router::new()
        .route("/calls", post(dial))
        .route("/calls/{id}", get(retrieve_call))
        .route("/calls/{id}/actions/answer", post(answer_call))
        .route("/calls/{id}/actions/hangup", post(hangup_call))
        .route("/calls/{id}/actions/ring_group", post(ring_group))
        .route("/messages", post(send_message))
        .route("/messages/{id}", get(retrieve_message))
        .route("/phone_numbers", get(list_phone_numbers))
        .route(
            "/phone_numbers/{id}",
            get(retrieve_phone_number)
                .patch(update_phone_number)
                .delete(delete_phone_number),
        )
        .route("/number_orders", post(create_number_order))
        .route("/number_orders/{id}", get(retrieve_number_order))
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());
    if !authorized {
        tracing::warn!(uri = %request.uri(), "rejected request without bearer token");
        return ApiFailure::unauthorized().into_response();
    }
    next.run(request).await
}

// --- calls ---

async fn dial(State(db): State<Db>, body: Result<Json<DialRequest>, JsonRejection>) -> ApiResult {
    let Json(input) = body?;
    if input.connection_id.is_empty() {
        return Err(ApiFailure::invalid("/connection_id", "connection_id must not be empty"));
    }
    let call = CallRecord {
        call_control_id: format!("v3:{}", Uuid::new_v4().simple()),
        call_leg_id: Uuid::new_v4().to_string(),
        call_session_id: Uuid::new_v4().to_string(),
        is_alive: true,
        record_type: "call".to_string(),
        client_state: input.client_state,
    };
    tracing::info!(to = %input.to, from = %input.from, id = %call.call_control_id, "dial");
    db.write()
        .await
        .calls
        .insert(call.call_control_id.clone(), call.clone());
    data(call)
}

async fn retrieve_call(State(db): State<Db>, Path(id): Path<String>) -> ApiResult {
    let store = db.read().await;
    let call = store
        .calls
        .get(&id)
        .ok_or_else(|| ApiFailure::not_found(format!("call {id} does not exist")))?;
    data(call)
}

async fn answer_call(State(db): State<Db>, Path(id): Path<String>) -> ApiResult {
    let store = db.read().await;
    let call = store
        .calls
        .get(&id)
        .ok_or_else(|| ApiFailure::not_found(format!("call {id} does not exist")))?;
    if !call.is_alive {
        return Err(ApiFailure::invalid("/call_control_id", "call has already ended"));
    }
    action_ok()
}

async fn hangup_call(State(db): State<Db>, Path(id): Path<String>) -> ApiResult {
    let mut store = db.write().await;
    let call = store
        .calls
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::not_found(format!("call {id} does not exist")))?;
    call.is_alive = false;
    action_ok()
}

async fn ring_group(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: Result<Json<RingGroupRequest>, JsonRejection>,
) -> ApiResult {
    let Json(input) = body?;
    if !db.read().await.calls.contains_key(&id) {
        return Err(ApiFailure::not_found(format!("call {id} does not exist")));
    }
    if input.targets.is_empty() {
        return Err(ApiFailure::invalid("/targets", "at least one target is required"));
    }
    for target in &input.targets {
        tracing::info!(call = %id, name = %target.name, to = %target.to, "ringing target");
    }
    action_ok()
}

// --- messages ---

async fn send_message(
    State(db): State<Db>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult {
    let Json(input) = body?;
    if !input.to.starts_with('+') {
        return Err(ApiFailure::invalid("/to", "destination must be in E.164 format"));
    }
    let message_type = if input.media_urls.is_empty() { "SMS" } else { "MMS" };
    let message = MessageRecord {
        id: Uuid::new_v4(),
        record_type: "message".to_string(),
        direction: "outbound".to_string(),
        message_type: message_type.to_string(),
        from: Endpoint {
            phone_number: input.from.unwrap_or_else(|| "+18445550001".to_string()),
            status: None,
        },
        to: vec![Endpoint {
            phone_number: input.to,
            status: Some("queued".to_string()),
        }],
        text: input.text,
        webhook_url: input.webhook_url,
        parts: 1,
        cost: None,
        received_at: Some(MOCK_TIMESTAMP.to_string()),
        sent_at: None,
        completed_at: None,
    };
    db.write().await.messages.insert(message.id, message.clone());
    data(message)
}

async fn retrieve_message(State(db): State<Db>, Path(id): Path<String>) -> ApiResult {
    let store = db.read().await;
    let message = Uuid::parse_str(&id)
        .ok()
        .and_then(|id| store.messages.get(&id))
        .ok_or_else(|| ApiFailure::not_found(format!("message {id} does not exist")))?;
    data(message)
}

// --- phone numbers ---

fn matches_filter(number: &PhoneNumberRecord, query: &HashMap<String, String>) -> bool {
    query.iter().all(|(key, value)| match key.as_str() {
        "filter[phone_number]" | "filter[phone_number][eq]" => number.phone_number == *value,
        "filter[phone_number][contains]" => number.phone_number.contains(value.as_str()),
        "filter[phone_number][starts_with]" => number.phone_number.starts_with(value.as_str()),
        "filter[phone_number][ends_with]" => number.phone_number.ends_with(value.as_str()),
        "filter[status]" => number.status == *value,
        "filter[tag]" => number.tags.iter().any(|tag| tag == value),
        "filter[connection_id]" => number.connection_id.as_deref() == Some(value.as_str()),
        "filter[customer_reference]" => {
            number.customer_reference.as_deref() == Some(value.as_str())
        }
        _ => true,
    })
}

fn page_param(query: &HashMap<String, String>, key: &'static str, default: usize) -> Result<usize, ApiFailure> {
    match query.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or_else(|| ApiFailure::invalid(key, format!("{key} must be a positive integer"))),
    }
}

async fn list_phone_numbers(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiFailure> {
    let number = page_param(&query, "page[number]", 1)?;
    let size = page_param(&query, "page[size]", DEFAULT_PAGE_SIZE)?;
    let store = db.read().await;
    let matching: Vec<&PhoneNumberRecord> = store
        .phone_numbers
        .values()
        .filter(|record| matches_filter(record, &query))
        .collect();
    let total_results = matching.len();
    let total_pages = total_results.div_ceil(size).max(1);
    let page: Vec<&PhoneNumberRecord> = matching
        .into_iter()
        .skip((number - 1).saturating_mul(size))
        .take(size)
        .collect();
    Ok(Json(json!({
        "data": page,
        "meta": {
            "page_number": number,
            "page_size": size,
            "total_pages": total_pages,
            "total_results": total_results,
        }
    })))
}

async fn retrieve_phone_number(State(db): State<Db>, Path(id): Path<String>) -> ApiResult {
    let store = db.read().await;
    let number = store
        .phone_numbers
        .get(&id)
        .ok_or_else(|| ApiFailure::not_found(format!("phone number {id} does not exist")))?;
    data(number)
}

/// Optional string patch: absent keeps, `null` clears, a string replaces.
fn patch_string(
    target: &mut Option<String>,
    patch: &serde_json::Map<String, Value>,
    key: &'static str,
    pointer: &'static str,
) -> Result<(), ApiFailure> {
    match patch.get(key) {
        None => Ok(()),
        Some(Value::Null) => {
            *target = None;
            Ok(())
        }
        Some(Value::String(value)) => {
            *target = Some(value.clone());
            Ok(())
        }
        Some(_) => Err(ApiFailure::invalid(pointer, format!("{key} must be a string or null"))),
    }
}

async fn update_phone_number(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let patch = body
        .as_object()
        .ok_or_else(|| ApiFailure::invalid("/", "body must be an object"))?;
    let mut store = db.write().await;
    let number = store
        .phone_numbers
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::not_found(format!("phone number {id} does not exist")))?;
    if let Some(tags) = patch.get("tags") {
        number.tags = serde_json::from_value(tags.clone())
            .map_err(|_| ApiFailure::invalid("/tags", "tags must be a list of strings"))?;
    }
    patch_string(&mut number.customer_reference, patch, "customer_reference", "/customer_reference")?;
    patch_string(&mut number.connection_id, patch, "connection_id", "/connection_id")?;
    patch_string(&mut number.billing_group_id, patch, "billing_group_id", "/billing_group_id")?;
    data(number.clone())
}

async fn delete_phone_number(State(db): State<Db>, Path(id): Path<String>) -> ApiResult {
    let mut store = db.write().await;
    let mut number = store
        .phone_numbers
        .remove(&id)
        .ok_or_else(|| ApiFailure::not_found(format!("phone number {id} does not exist")))?;
    number.status = "deleted".to_string();
    data(number)
}

// --- number orders ---

async fn create_number_order(
    State(db): State<Db>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult {
    let Json(input) = body?;
    if input.phone_numbers.is_empty() {
        return Err(ApiFailure::invalid("/phone_numbers", "at least one phone number is required"));
    }
    let ordered: Vec<OrderedNumberRecord> = input
        .phone_numbers
        .into_iter()
        .map(|requested| OrderedNumberRecord {
            id: Uuid::new_v4().to_string(),
            record_type: "number_order_phone_number".to_string(),
            phone_number: requested.phone_number,
            status: "pending".to_string(),
        })
        .collect();
    let order = NumberOrderRecord {
        id: Uuid::new_v4().to_string(),
        record_type: "number_order".to_string(),
        status: "pending".to_string(),
        phone_numbers_count: ordered.len() as u32,
        phone_numbers: ordered,
        connection_id: input.connection_id,
        customer_reference: input.customer_reference,
        created_at: MOCK_TIMESTAMP.to_string(),
    };
    tracing::info!(id = %order.id, count = order.phone_numbers_count, "number order placed");
    db.write()
        .await
        .number_orders
        .insert(order.id.clone(), order.clone());
    data(order)
}

/// Orders settle on their first lookup; the ordered numbers then join the
/// inventory as active numbers.
async fn retrieve_number_order(State(db): State<Db>, Path(id): Path<String>) -> ApiResult {
    let mut store = db.write().await;
    let store = &mut *store;
    let order = store
        .number_orders
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::not_found(format!("number order {id} does not exist")))?;
    if order.status == "pending" {
        order.status = "success".to_string();
        for ordered in &mut order.phone_numbers {
            ordered.status = "success".to_string();
            let number_id = store.next_number_id.to_string();
            store.next_number_id += 1;
            store.phone_numbers.insert(
                number_id.clone(),
                PhoneNumberRecord {
                    id: number_id,
                    record_type: "phone_number".to_string(),
                    phone_number: ordered.phone_number.clone(),
                    status: "active".to_string(),
                    tags: Vec::new(),
                    phone_number_type: "longcode".to_string(),
                    connection_id: order.connection_id.clone(),
                    customer_reference: order.customer_reference.clone(),
                    billing_group_id: None,
                    purchased_at: MOCK_TIMESTAMP.to_string(),
                },
            );
        }
    }
    data(order.clone())
}
