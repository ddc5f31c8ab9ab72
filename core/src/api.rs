//! One-call-per-operation facade over `LoadBalancerClient` and a `Transport`.

use tracing::{debug, warn};

use crate::client::LoadBalancerClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::transport::UreqTransport;
use crate::types::{LoadBalancerMonitor, LoadBalancerPool, Paginated};

/// Blocking API handle. Each method issues exactly one HTTP request.
#[derive(Debug, Clone)]
pub struct LoadBalancerApi<T = UreqTransport> {
    client: LoadBalancerClient,
    transport: T,
}

impl LoadBalancerApi<UreqTransport> {
    pub fn from_config(config: ClientConfig) -> Self {
        Self::new(LoadBalancerClient::with_config(config), UreqTransport::new())
    }
}

impl<T: Transport> LoadBalancerApi<T> {
    pub fn new(client: LoadBalancerClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &LoadBalancerClient {
        &self.client
    }

    pub fn create_pool(&self, pool: &LoadBalancerPool) -> Result<LoadBalancerPool, ApiError> {
        let req = self.client.build_create_pool(pool)?;
        self.call("create_pool", req, |c, r| c.parse_create_pool(r))
    }

    pub fn list_pools(&self) -> Result<Paginated<LoadBalancerPool>, ApiError> {
        let req = self.client.build_list_pools();
        self.call("list_pools", req, |c, r| c.parse_list_pools(r))
    }

    pub fn pool_details(&self, pool_id: &str) -> Result<LoadBalancerPool, ApiError> {
        let req = self.client.build_pool_details(pool_id);
        self.call("pool_details", req, |c, r| c.parse_pool_details(r))
    }

    pub fn delete_pool(&self, pool_id: &str) -> Result<(), ApiError> {
        let req = self.client.build_delete_pool(pool_id);
        self.call("delete_pool", req, |c, r| c.parse_delete_pool(r))
    }

    pub fn modify_pool(&self, pool: &LoadBalancerPool) -> Result<LoadBalancerPool, ApiError> {
        let req = self.client.build_modify_pool(pool)?;
        self.call("modify_pool", req, |c, r| c.parse_modify_pool(r))
    }

    pub fn create_monitor(
        &self,
        monitor: &LoadBalancerMonitor,
    ) -> Result<LoadBalancerMonitor, ApiError> {
        let req = self.client.build_create_monitor(monitor)?;
        self.call("create_monitor", req, |c, r| c.parse_create_monitor(r))
    }

    pub fn list_monitors(&self) -> Result<Paginated<LoadBalancerMonitor>, ApiError> {
        let req = self.client.build_list_monitors();
        self.call("list_monitors", req, |c, r| c.parse_list_monitors(r))
    }

    pub fn monitor_details(&self, monitor_id: &str) -> Result<LoadBalancerMonitor, ApiError> {
        let req = self.client.build_monitor_details(monitor_id);
        self.call("monitor_details", req, |c, r| c.parse_monitor_details(r))
    }

    pub fn delete_monitor(&self, monitor_id: &str) -> Result<(), ApiError> {
        let req = self.client.build_delete_monitor(monitor_id);
        self.call("delete_monitor", req, |c, r| c.parse_delete_monitor(r))
    }

    pub fn modify_monitor(
        &self,
        monitor: &LoadBalancerMonitor,
    ) -> Result<LoadBalancerMonitor, ApiError> {
        let req = self.client.build_modify_monitor(monitor)?;
        self.call("modify_monitor", req, |c, r| c.parse_modify_monitor(r))
    }

    fn call<R>(
        &self,
        operation: &'static str,
        req: HttpRequest,
        parse: impl FnOnce(&LoadBalancerClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        debug!(operation, method = req.method.as_str(), url = %req.path, "sending request");
        let result = self.transport.execute(req).and_then(|response| {
            debug!(operation, status = response.status, "received response");
            parse(&self.client, response)
        });
        if let Err(ref e) = result {
            warn!(operation, error = %e, "load balancer API call failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::http::HttpMethod;

    /// Replays canned responses and records every request it sees.
    struct Recorder {
        responses: RefCell<Vec<HttpResponse>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Recorder {
        fn new(responses: Vec<(u16, &str)>) -> Self {
            let responses = responses
                .into_iter()
                .rev()
                .map(|(status, body)| HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.to_string(),
                })
                .collect();
            Self {
                responses: RefCell::new(responses),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Recorder {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop()
                .ok_or_else(|| ApiError::Transport("no canned response left".to_string()))
        }
    }

    fn api(recorder: &Recorder) -> LoadBalancerApi<&Recorder> {
        LoadBalancerApi::new(LoadBalancerClient::new("http://lb.test"), recorder)
    }

    #[test]
    fn pool_details_issues_one_get() {
        let recorder = Recorder::new(vec![(
            200,
            r#"{"success":true,"errors":[],"messages":[],"result":{"id":"p1","name":"primary","origins":[]}}"#,
        )]);
        let pool = api(&recorder).pool_details("p1").unwrap();
        assert_eq!(pool.id, "p1");
        assert_eq!(pool.name, "primary");

        let seen = recorder.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].path, "http://lb.test/user/load_balancers/pools/p1");
    }

    #[test]
    fn delete_unknown_monitor_surfaces_not_found() {
        let recorder = Recorder::new(vec![(
            404,
            r#"{"success":false,"errors":[{"code":1002,"message":"not found"}],"messages":[],"result":null}"#,
        )]);
        let err = api(&recorder).delete_monitor("bar").unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(recorder.seen.borrow()[0].method, HttpMethod::Delete);
    }

    #[test]
    fn modify_without_id_never_reaches_transport() {
        let recorder = Recorder::new(Vec::new());
        let err = api(&recorder)
            .modify_monitor(&LoadBalancerMonitor::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert!(recorder.seen.borrow().is_empty());
    }

    #[test]
    fn transport_failure_is_propagated() {
        let recorder = Recorder::new(Vec::new());
        let err = api(&recorder).list_monitors().unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
