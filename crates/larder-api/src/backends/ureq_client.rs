//! Ureq-based HTTP backend (blocking).
//!
//! `send` blocks the calling thread for the duration of the request. Good enough for one-off CLI
//! invocations; prefer the reqwest backend inside a busy runtime.

use std::io::Read as _;
use std::time::Duration;

use bytes::Bytes;

use crate::error::HttpClientError;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};

/// An [`HttpClient`] backed by a [`ureq::Agent`].
#[derive(Debug)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Create an agent whose requests give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            // GraphQL error envelopes ride on 4xx/5xx bodies, so statuses are ours to interpret.
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl HttpClient for UreqClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpClientError> {
        let mut builder = http::Request::builder()
            .method(request.method)
            .uri(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let body = request.body.map(|b| b.to_vec()).unwrap_or_default();
        let req = builder
            .body(body)
            .map_err(|e| HttpClientError::Other(Box::new(e)))?;

        match self.agent.run(req) {
            Ok(resp) => into_response(resp),
            Err(ureq::Error::Timeout(_)) => Err(HttpClientError::Timeout),
            Err(ureq::Error::HostNotFound) => {
                Err(HttpClientError::Connection("host not found".to_owned()))
            }
            Err(ureq::Error::Io(e)) => Err(HttpClientError::Connection(e.to_string())),
            Err(e) => Err(HttpClientError::Other(Box::new(e))),
        }
    }
}

fn into_response(response: http::Response<ureq::Body>) -> Result<HttpResponse, HttpClientError> {
    let (parts, body) = response.into_parts();
    let mut buf = Vec::new();
    body.into_reader()
        .read_to_end(&mut buf)
        .map_err(|e| HttpClientError::Connection(e.to_string()))?;

    Ok(HttpResponse {
        status: parts.status,
        headers: parts.headers,
        body: Bytes::from(buf),
    })
}
