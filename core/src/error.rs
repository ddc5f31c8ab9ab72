//! Error types for the load balancer API client.
//!
//! # Design
//! Failures fall into two families: the request could not be made or came back
//! with a non-success status (`Transport`, `NotFound`, `HttpError`, `Api`), and the
//! response body did not match the expected shape (`DeserializationError`). The
//! display text of each family carries the same prefix so log lines stay
//! greppable regardless of variant.

use thiserror::Error;

use crate::types::ResponseInfo;

/// Errors returned by `LoadBalancerClient` and `LoadBalancerApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, TLS, ...).
    #[error("error from makeRequest: transport failure: {0}")]
    Transport(String),

    /// The server returned 404, the requested pool or monitor does not exist.
    #[error("error from makeRequest: resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("error from makeRequest: HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The envelope decoded but reported `success: false`.
    #[error("error from makeRequest: API reported failure: {}", format_errors(.errors))]
    Api { errors: Vec<ResponseInfo> },

    /// The response body could not be deserialized into the expected envelope.
    #[error("error unmarshalling the JSON response: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request was rejected before any I/O, e.g. modify without an id.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Client configuration is incomplete or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// True for errors raised while making the request or interpreting its
    /// status, as opposed to decoding its body.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_) | ApiError::NotFound | ApiError::HttpError { .. } | ApiError::Api { .. }
        )
    }
}

fn format_errors(errors: &[ResponseInfo]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(|e| format!("{} ({})", e.message, e.code))
        .collect::<Vec<_>>()
        .join("; ")
}
