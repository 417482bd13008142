#![allow(dead_code, missing_docs, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use larder::api::{
    ClientBuilder, HttpClient, HttpClientError, HttpRequest, HttpResponse, LarderClient,
    TenantContext,
};
use serde_json::{Value, json};
use tokio::sync::Notify;

struct Scripted {
    response: Result<HttpResponse, HttpClientError>,
    gate: Option<Arc<Notify>>,
}

#[derive(Default)]
struct Script {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

/// An [`HttpClient`] that replays queued responses in order and records every request.
///
/// A response queued with [`MockHttp::respond_after`] is held back until its gate is notified.
#[derive(Clone, Default)]
pub struct MockHttp(Arc<Script>);

fn ok(status: u16, body: &Value) -> HttpResponse {
    HttpResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers: HeaderMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

impl MockHttp {
    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.push(Ok(ok(status, &body)), None)
    }

    pub fn respond_after(&self, gate: &Arc<Notify>, status: u16, body: Value) -> &Self {
        self.push(Ok(ok(status, &body)), Some(Arc::clone(gate)))
    }

    pub fn fail(&self, err: HttpClientError) -> &Self {
        self.push(Err(err), None)
    }

    fn push(&self, response: Result<HttpResponse, HttpClientError>, gate: Option<Arc<Notify>>) -> &Self {
        self.0
            .responses
            .lock()
            .unwrap()
            .push_back(Scripted { response, gate });
        self
    }

    pub fn request_count(&self) -> usize {
        self.0.requests.lock().unwrap().len()
    }

    /// Parsed JSON bodies of every request, in send order.
    pub fn bodies(&self) -> Vec<Value> {
        self.0
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| serde_json::from_slice(r.body.as_ref().unwrap()).unwrap())
            .collect()
    }

    /// The `after` variable of every request; `None` for first-page fetches.
    pub fn afters(&self) -> Vec<Option<String>> {
        self.bodies()
            .iter()
            .map(|b| b["variables"]["after"].as_str().map(ToOwned::to_owned))
            .collect()
    }
}

impl HttpClient for MockHttp {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpClientError>> + Send {
        self.0.requests.lock().unwrap().push(request);
        let next = self.0.responses.lock().unwrap().pop_front();
        async move {
            let Some(scripted) = next else {
                return Err(HttpClientError::Connection("script exhausted".to_owned()));
            };
            if let Some(gate) = scripted.gate {
                gate.notified().await;
            }
            scripted.response
        }
    }
}

pub fn client(http: &MockHttp) -> LarderClient<MockHttp> {
    ClientBuilder::new("sk_test")
        .base_url("https://api.test")
        .retry_delay(Duration::from_millis(1))
        .build_with(http.clone())
}

pub fn tenant() -> TenantContext {
    TenantContext::new("biz_1")
}

pub fn customer(id: &str) -> Value {
    json!({
        "id": id,
        "firstName": "Grace",
        "lastName": "Hopper",
        "email": format!("{id}@example.com"),
        "status": "ACTIVE",
        "creditBalanceCents": 0,
        "createdAt": "2025-03-01T09:00:00Z"
    })
}

/// A `data.result` connection envelope of customers.
pub fn customer_page(ids: &[&str], end_cursor: Option<&str>, has_next: bool) -> Value {
    let edges: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "cursor": format!("cur_{id}"), "node": customer(id) }))
        .collect();
    json!({
        "data": {
            "result": {
                "edges": edges,
                "pageInfo": {
                    "hasNextPage": has_next,
                    "hasPreviousPage": false,
                    "endCursor": end_cursor
                }
            }
        }
    })
}

/// A `data.result.entity` mutation envelope.
pub fn payload(entity: Value) -> Value {
    json!({ "data": { "result": { "entity": entity } } })
}

/// A GraphQL error envelope carrying `code`.
pub fn graphql_error(code: &str) -> Value {
    json!({ "data": null, "errors": [{ "message": code.to_lowercase(), "extensions": { "code": code } }] })
}
