//! DTOs for the load balancer pool and monitor endpoints, plus the response
//! envelope every endpoint shares.
//!
//! # Design
//! Field names follow the remote JSON schema exactly. The mock-server crate
//! defines its own copies; integration tests catch drift between the two.
//! Fields the server treats as optional are skipped on the wire when empty,
//! and every field decodes to its default when absent so partial results (a
//! delete response carries only `id`) still parse.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A named group of origin servers behind a load balancer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoadBalancerPool {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
    pub description: String,
    pub name: String,
    pub enabled: bool,
    /// Id of the monitor attached to this pool.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub monitor: String,
    #[serde(deserialize_with = "null_as_default")]
    pub origins: Vec<LoadBalancerOrigin>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notification_email: String,
}

/// One backend server within a pool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoadBalancerOrigin {
    pub name: String,
    pub address: String,
    pub enabled: bool,
}

/// Health-check configuration that can be attached to a pool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoadBalancerMonitor {
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
    /// Request headers sent with each probe; a header may repeat.
    #[serde(deserialize_with = "null_as_default")]
    pub header: HashMap<String, Vec<String>>,
    pub timeout: i64,
    pub retries: i64,
    pub interval: i64,
    pub expected_body: String,
    /// Status code pattern such as `2xx` or `200`.
    pub expected_codes: String,
}

/// An entry in the envelope's `errors` or `messages` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResponseInfo {
    pub code: i64,
    pub message: String,
}

/// Pagination metadata carried by list responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResultInfo {
    pub page: u64,
    pub per_page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    pub count: u64,
    pub total_count: u64,
}

/// The `{success, errors, messages, result, result_info}` wrapper shared by
/// every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<ResponseInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<ResponseInfo>,
    pub result: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_info: Option<ResultInfo>,
}

/// Result of a list operation: the items plus the server's pagination data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    pub result: Vec<T>,
    pub result_info: Option<ResultInfo>,
}

impl<T> Paginated<T> {
    pub fn len(&self) -> usize {
        self.result.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.result.iter()
    }
}

impl<T> IntoIterator for Paginated<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.result.into_iter()
    }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_pool() -> LoadBalancerPool {
        LoadBalancerPool {
            id: "17b5962d775c646f3f9725cbc7a53df4".to_string(),
            created_on: Some(Utc.with_ymd_and_hms(2014, 1, 1, 5, 20, 0).unwrap()),
            modified_on: Some(Utc.with_ymd_and_hms(2014, 2, 1, 5, 20, 0).unwrap()),
            description: "Primary data center - Provider XYZ".to_string(),
            name: "primary-dc-1".to_string(),
            enabled: true,
            monitor: "f1aba936b94213e5b8dca0c0dbf1f9cc".to_string(),
            origins: vec![LoadBalancerOrigin {
                name: "app-server-1".to_string(),
                address: "0.0.0.0".to_string(),
                enabled: true,
            }],
            notification_email: "someone@example.com".to_string(),
        }
    }

    fn sample_monitor() -> LoadBalancerMonitor {
        let mut header = HashMap::new();
        header.insert("Host".to_string(), vec!["example.com".to_string()]);
        header.insert("X-App-ID".to_string(), vec!["abc123".to_string()]);
        LoadBalancerMonitor {
            id: "f1aba936b94213e5b8dca0c0dbf1f9cc".to_string(),
            created_on: Some(Utc.with_ymd_and_hms(2014, 1, 1, 5, 20, 0).unwrap()),
            modified_on: Some(Utc.with_ymd_and_hms(2014, 2, 1, 5, 20, 0).unwrap()),
            monitor_type: "https".to_string(),
            description: "Login page monitor".to_string(),
            method: "GET".to_string(),
            path: "/health".to_string(),
            header,
            timeout: 3,
            retries: 0,
            interval: 90,
            expected_body: "alive".to_string(),
            expected_codes: "2xx".to_string(),
        }
    }

    #[test]
    fn pool_omits_empty_optional_fields() {
        let pool = LoadBalancerPool {
            name: "primary-dc-1".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&pool).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["id", "created_on", "modified_on", "monitor", "notification_email"] {
            assert!(!obj.contains_key(key), "{key} should be omitted");
        }
        assert_eq!(json["description"], "");
        assert_eq!(json["name"], "primary-dc-1");
        assert_eq!(json["enabled"], false);
        assert_eq!(json["origins"], serde_json::json!([]));
    }

    #[test]
    fn monitor_serializes_type_field() {
        let json = serde_json::to_value(sample_monitor()).unwrap();
        assert_eq!(json["type"], "https");
        assert!(json.get("monitor_type").is_none());
        assert_eq!(json["header"]["Host"], serde_json::json!(["example.com"]));
        assert_eq!(json["expected_codes"], "2xx");
    }

    #[test]
    fn pool_parses_fractional_timestamps() {
        let pool: LoadBalancerPool = serde_json::from_str(
            r#"{"id":"abc","created_on":"2014-01-01T05:20:00.12345Z","name":"p"}"#,
        )
        .unwrap();
        let expected = Utc.with_ymd_and_hms(2014, 1, 1, 5, 20, 0).unwrap()
            + chrono::Duration::nanoseconds(123_450_000);
        assert_eq!(pool.created_on, Some(expected));
        assert_eq!(pool.modified_on, None);
        assert!(pool.origins.is_empty());
    }

    #[test]
    fn null_collections_decode_as_empty() {
        let monitor: LoadBalancerMonitor =
            serde_json::from_str(r#"{"id":"m","header":null}"#).unwrap();
        assert!(monitor.header.is_empty());
        let pool: LoadBalancerPool = serde_json::from_str(r#"{"origins":null}"#).unwrap();
        assert!(pool.origins.is_empty());
    }

    #[test]
    fn pool_roundtrips_through_json() {
        let pool = sample_pool();
        let json = serde_json::to_string(&pool).unwrap();
        let back: LoadBalancerPool = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pool);
    }

    #[test]
    fn monitor_roundtrips_through_json() {
        let monitor = sample_monitor();
        let json = serde_json::to_string(&monitor).unwrap();
        let back: LoadBalancerMonitor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, monitor);
    }

    #[test]
    fn envelope_decodes_result_info() {
        let env: Envelope<Vec<LoadBalancerPool>> = serde_json::from_str(
            r#"{"success":true,"errors":[],"messages":[],"result":[],
                "result_info":{"page":1,"per_page":20,"count":1,"total_count":2000}}"#,
        )
        .unwrap();
        assert!(env.success);
        assert_eq!(
            env.result_info,
            Some(ResultInfo {
                page: 1,
                per_page: 20,
                total_pages: None,
                count: 1,
                total_count: 2000,
            })
        );
    }

    #[test]
    fn envelope_requires_result() {
        let res: Result<Envelope<LoadBalancerPool>, _> =
            serde_json::from_str(r#"{"success":true,"errors":[],"messages":[]}"#);
        assert!(res.is_err());
    }
}
