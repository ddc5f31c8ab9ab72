//! In-memory stand-in for the load balancer pool and monitor endpoints.
//!
//! Every response is wrapped in the `{success, errors, messages, result}`
//! envelope; unknown ids answer 404 with a populated `errors` array.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const POOLS_PATH: &str = "/user/load_balancers/pools";
pub const MONITORS_PATH: &str = "/user/load_balancers/monitors";

const PER_PAGE: u64 = 20;
const NOT_FOUND_CODE: i64 = 1002;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Origin {
    pub name: String,
    pub address: String,
    pub enabled: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Pool {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
    pub description: String,
    pub name: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub monitor: String,
    pub origins: Vec<Origin>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notification_email: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Monitor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub monitor_type: String,
    pub description: String,
    pub method: String,
    pub path: String,
    pub header: std::collections::HashMap<String, Vec<String>>,
    pub timeout: i64,
    pub retries: i64,
    pub interval: i64,
    pub expected_body: String,
    pub expected_codes: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ResponseInfo {
    pub code: i64,
    pub message: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultInfo {
    pub page: u64,
    pub per_page: u64,
    pub count: u64,
    pub total_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub errors: Vec<ResponseInfo>,
    pub messages: Vec<ResponseInfo>,
    pub result: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_info: Option<ResultInfo>,
}

impl<T> Envelope<T> {
    fn ok(result: T) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            messages: Vec::new(),
            result: Some(result),
            result_info: None,
        }
    }
}

/// Result of a delete: only the id survives.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Deleted {
    pub id: String,
}

/// A resource the server stores and serves through the generic CRUD handlers.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Overwrite server-managed fields.
    fn stamp(&mut self, id: String, created_on: DateTime<Utc>, modified_on: DateTime<Utc>);

    fn created_on(&self) -> Option<DateTime<Utc>>;
}

impl Record for Pool {
    const KIND: &'static str = "pool";

    fn id(&self) -> &str {
        &self.id
    }

    fn stamp(&mut self, id: String, created_on: DateTime<Utc>, modified_on: DateTime<Utc>) {
        self.id = id;
        self.created_on = Some(created_on);
        self.modified_on = Some(modified_on);
    }

    fn created_on(&self) -> Option<DateTime<Utc>> {
        self.created_on
    }
}

impl Record for Monitor {
    const KIND: &'static str = "monitor";

    fn id(&self) -> &str {
        &self.id
    }

    fn stamp(&mut self, id: String, created_on: DateTime<Utc>, modified_on: DateTime<Utc>) {
        self.id = id;
        self.created_on = Some(created_on);
        self.modified_on = Some(modified_on);
    }

    fn created_on(&self) -> Option<DateTime<Utc>> {
        self.created_on
    }
}

/// Records in insertion order, so list responses are stable.
pub type Db<R> = Arc<RwLock<Vec<R>>>;

/// 404 answered with a failure envelope.
pub struct NotFound {
    kind: &'static str,
}

impl IntoResponse for NotFound {
    fn into_response(self) -> Response {
        let body = Envelope::<()> {
            success: false,
            errors: vec![ResponseInfo {
                code: NOT_FOUND_CODE,
                message: format!("{} not found", self.kind),
            }],
            messages: Vec::new(),
            result: None,
            result_info: None,
        };
        (StatusCode::NOT_FOUND, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    Router::new()
        .merge(resource_routes::<Pool>(POOLS_PATH))
        .merge(resource_routes::<Monitor>(MONITORS_PATH))
}

fn resource_routes<R: Record>(base: &str) -> Router {
    let db: Db<R> = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route(base, get(list::<R>).post(create::<R>))
        .route(
            &format!("{base}/{{id}}"),
            get(details::<R>).put(modify::<R>).delete(delete::<R>),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

async fn list<R: Record>(State(db): State<Db<R>>) -> Json<Envelope<Vec<R>>> {
    let records = db.read().await;
    let count = records.len() as u64;
    let mut envelope = Envelope::ok(records.clone());
    envelope.result_info = Some(ResultInfo {
        page: 1,
        per_page: PER_PAGE,
        count,
        total_count: count,
    });
    Json(envelope)
}

async fn create<R: Record>(
    State(db): State<Db<R>>,
    Json(mut input): Json<R>,
) -> Json<Envelope<R>> {
    let now = Utc::now();
    input.stamp(new_id(), now, now);
    info!(kind = R::KIND, id = input.id(), "created");
    db.write().await.push(input.clone());
    Json(Envelope::ok(input))
}

async fn details<R: Record>(
    State(db): State<Db<R>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<R>>, NotFound> {
    let records = db.read().await;
    records
        .iter()
        .find(|r| r.id() == id)
        .cloned()
        .map(|r| Json(Envelope::ok(r)))
        .ok_or(NotFound { kind: R::KIND })
}

async fn modify<R: Record>(
    State(db): State<Db<R>>,
    Path(id): Path<String>,
    Json(mut input): Json<R>,
) -> Result<Json<Envelope<R>>, NotFound> {
    let mut records = db.write().await;
    let slot = records
        .iter_mut()
        .find(|r| r.id() == id)
        .ok_or(NotFound { kind: R::KIND })?;
    let now = Utc::now();
    let created_on = slot.created_on().unwrap_or(now);
    input.stamp(id, created_on, now);
    *slot = input.clone();
    info!(kind = R::KIND, id = input.id(), "modified");
    Ok(Json(Envelope::ok(input)))
}

async fn delete<R: Record>(
    State(db): State<Db<R>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Deleted>>, NotFound> {
    let mut records = db.write().await;
    let pos = records
        .iter()
        .position(|r| r.id() == id)
        .ok_or(NotFound { kind: R::KIND })?;
    records.remove(pos);
    info!(kind = R::KIND, id = %id, "deleted");
    Ok(Json(Envelope::ok(Deleted { id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_32_hex_chars() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn stamp_overwrites_server_fields() {
        let mut pool = Pool {
            id: "client-supplied".to_string(),
            name: "p".to_string(),
            ..Default::default()
        };
        let now = Utc::now();
        pool.stamp("abc".to_string(), now, now);
        assert_eq!(pool.id, "abc");
        assert_eq!(pool.created_on, Some(now));
        assert_eq!(pool.name, "p");
    }

    #[test]
    fn pool_omits_empty_optional_fields() {
        let json = serde_json::to_value(Pool::default()).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("monitor").is_none());
        assert!(json.get("notification_email").is_none());
        assert_eq!(json["origins"], serde_json::json!([]));
    }

    #[test]
    fn monitor_accepts_type_field() {
        let monitor: Monitor =
            serde_json::from_str(r#"{"type":"https","path":"/health"}"#).unwrap();
        assert_eq!(monitor.monitor_type, "https");
        assert_eq!(monitor.path, "/health");
        assert!(monitor.header.is_empty());
    }

    #[test]
    fn ok_envelope_has_no_errors() {
        let env = Envelope::ok(Deleted {
            id: "x".to_string(),
        });
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["errors"], serde_json::json!([]));
        assert_eq!(json["result"]["id"], "x");
        assert!(json.get("result_info").is_none());
    }
}
