//! Transport seam: the GraphQL client talks to the network only through [`HttpClient`].

use std::borrow::Cow;
use std::future::Future;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};

use crate::error::HttpClientError;

/// A single HTTP exchange issued by the GraphQL client.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method. Always `POST` for GraphQL operations.
    pub method: Method,
    /// The fully-qualified endpoint URL.
    pub url: String,
    /// Request headers, including authorization.
    pub headers: HeaderMap,
    /// Serialized JSON body.
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Build a JSON `POST` to `url`.
    #[must_use]
    pub fn post_json(url: String, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method: Method::POST,
            url,
            headers,
            body: Some(body),
        }
    }
}

/// The raw response handed back by an [`HttpClient`] backend.
#[derive(Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body bytes.
    pub body: Bytes,
}

impl HttpResponse {
    /// The body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Pluggable HTTP backend.
///
/// Edition 2024 return-position `impl Future` keeps this free of `async-trait`.
pub trait HttpClient: Send + Sync {
    /// Send a request and return the response, whatever its status.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpClientError>> + Send;
}
