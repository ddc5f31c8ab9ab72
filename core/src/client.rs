//! Stateless HTTP request builder and response parser for the load balancer
//! pool and monitor endpoints.
//!
//! # Design
//! `LoadBalancerClient` holds only its `ClientConfig` and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. `LoadBalancerApi` glues the two halves to a `Transport`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Envelope, LoadBalancerMonitor, LoadBalancerPool, Paginated};

pub const POOLS_PATH: &str = "/user/load_balancers/pools";
pub const MONITORS_PATH: &str = "/user/load_balancers/monitors";

/// Synchronous, stateless client for the load balancer API.
#[derive(Debug, Clone)]
pub struct LoadBalancerClient {
    config: ClientConfig,
}

impl LoadBalancerClient {
    /// Client without credentials, e.g. for the mock server.
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // --- pools ---

    /// API reference: https://api.cloudflare.com/#load-balancer-pools-create-a-pool
    pub fn build_create_pool(&self, pool: &LoadBalancerPool) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, POOLS_PATH.to_string(), pool)
    }

    /// API reference: https://api.cloudflare.com/#load-balancer-pools-list-pools
    pub fn build_list_pools(&self) -> HttpRequest {
        self.request(HttpMethod::Get, POOLS_PATH.to_string())
    }

    /// API reference: https://api.cloudflare.com/#load-balancer-pools-pool-details
    pub fn build_pool_details(&self, pool_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{POOLS_PATH}/{pool_id}"))
    }

    /// API reference: https://api.cloudflare.com/#load-balancer-pools-delete-a-pool
    pub fn build_delete_pool(&self, pool_id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("{POOLS_PATH}/{pool_id}"))
    }

    /// Full replace of the pool identified by `pool.id`.
    ///
    /// API reference: https://api.cloudflare.com/#load-balancer-pools-modify-a-pool
    pub fn build_modify_pool(&self, pool: &LoadBalancerPool) -> Result<HttpRequest, ApiError> {
        require_id("pool", &pool.id)?;
        self.json_request(HttpMethod::Put, format!("{POOLS_PATH}/{}", pool.id), pool)
    }

    pub fn parse_create_pool(&self, response: HttpResponse) -> Result<LoadBalancerPool, ApiError> {
        parse_result(response)
    }

    pub fn parse_list_pools(
        &self,
        response: HttpResponse,
    ) -> Result<Paginated<LoadBalancerPool>, ApiError> {
        parse_list(response)
    }

    pub fn parse_pool_details(&self, response: HttpResponse) -> Result<LoadBalancerPool, ApiError> {
        parse_result(response)
    }

    pub fn parse_delete_pool(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    pub fn parse_modify_pool(&self, response: HttpResponse) -> Result<LoadBalancerPool, ApiError> {
        parse_result(response)
    }

    // --- monitors ---

    /// API reference: https://api.cloudflare.com/#load-balancer-monitors-create-a-monitor
    pub fn build_create_monitor(
        &self,
        monitor: &LoadBalancerMonitor,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, MONITORS_PATH.to_string(), monitor)
    }

    /// API reference: https://api.cloudflare.com/#load-balancer-monitors-list-monitors
    pub fn build_list_monitors(&self) -> HttpRequest {
        self.request(HttpMethod::Get, MONITORS_PATH.to_string())
    }

    /// API reference: https://api.cloudflare.com/#load-balancer-monitors-monitor-details
    pub fn build_monitor_details(&self, monitor_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{MONITORS_PATH}/{monitor_id}"))
    }

    /// API reference: https://api.cloudflare.com/#load-balancer-monitors-delete-a-monitor
    pub fn build_delete_monitor(&self, monitor_id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("{MONITORS_PATH}/{monitor_id}"))
    }

    /// Full replace of the monitor identified by `monitor.id`.
    ///
    /// API reference: https://api.cloudflare.com/#load-balancer-monitors-modify-a-monitor
    pub fn build_modify_monitor(
        &self,
        monitor: &LoadBalancerMonitor,
    ) -> Result<HttpRequest, ApiError> {
        require_id("monitor", &monitor.id)?;
        self.json_request(
            HttpMethod::Put,
            format!("{MONITORS_PATH}/{}", monitor.id),
            monitor,
        )
    }

    pub fn parse_create_monitor(
        &self,
        response: HttpResponse,
    ) -> Result<LoadBalancerMonitor, ApiError> {
        parse_result(response)
    }

    pub fn parse_list_monitors(
        &self,
        response: HttpResponse,
    ) -> Result<Paginated<LoadBalancerMonitor>, ApiError> {
        parse_list(response)
    }

    pub fn parse_monitor_details(
        &self,
        response: HttpResponse,
    ) -> Result<LoadBalancerMonitor, ApiError> {
        parse_result(response)
    }

    pub fn parse_delete_monitor(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    pub fn parse_modify_monitor(
        &self,
        response: HttpResponse,
    ) -> Result<LoadBalancerMonitor, ApiError> {
        parse_result(response)
    }

    // --- shared plumbing ---

    fn request(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.config.base_url()),
            headers: self.config.credentials().headers(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut req = self.request(method, path);
        req.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        req.body = Some(body);
        Ok(req)
    }
}

fn require_id(kind: &str, id: &str) -> Result<(), ApiError> {
    if id.is_empty() {
        return Err(ApiError::InvalidRequest(format!(
            "{kind} id is required to modify a {kind}"
        )));
    }
    Ok(())
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Decode the envelope and reject `success: false` before looking at
/// `result`, which is usually `null` on failure.
fn decode_envelope<T: DeserializeOwned>(
    response: HttpResponse,
) -> Result<Envelope<Option<T>>, ApiError> {
    check_status(&response)?;
    let envelope: Envelope<Option<T>> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    if !envelope.success {
        return Err(ApiError::Api {
            errors: envelope.errors,
        });
    }
    Ok(envelope)
}

fn parse_result<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    decode_envelope(response)?
        .result
        .ok_or_else(|| ApiError::DeserializationError("response carried no result".to_string()))
}

fn parse_list<T: DeserializeOwned>(response: HttpResponse) -> Result<Paginated<T>, ApiError> {
    let envelope = decode_envelope::<Vec<T>>(response)?;
    Ok(Paginated {
        result: envelope.result.unwrap_or_default(),
        result_info: envelope.result_info,
    })
}

/// Deletes only need the status; the body is never read.
fn parse_empty(response: HttpResponse) -> Result<(), ApiError> {
    check_status(&response)
}
