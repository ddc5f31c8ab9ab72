//! Typed client for the load balancer pool and monitor endpoints.
//!
//! # Overview
//! `LoadBalancerClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network. `LoadBalancerApi` pairs it with a
//! `Transport` (by default the blocking `UreqTransport`) so each operation is
//! a single method call that issues exactly one HTTP request.
//!
//! # Design
//! - `LoadBalancerClient` is stateless; it holds only its `ClientConfig`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and every request/response pair is testable as data.
//! - Every response is wrapped in the shared `Envelope`; list operations
//!   return `Paginated` so callers also see `result_info`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::LoadBalancerApi;
pub use client::LoadBalancerClient;
pub use config::{ClientConfig, Credentials};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use transport::UreqTransport;
pub use types::{
    Envelope, LoadBalancerMonitor, LoadBalancerOrigin, LoadBalancerPool, Paginated, ResponseInfo,
    ResultInfo,
};
