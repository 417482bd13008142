//! The GraphQL client and its builder.

use std::sync::Arc;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable as _};
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret as _, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::{HttpClientError, LarderError};
use crate::graphql::{GraphQlRequest, GraphQlResponse, OperationKind, Rooted};
use crate::http_client::{HttpClient, HttpRequest};
use crate::resources::{
    BusinessResource, CouponsResource, CustomersResource, DeliveryRulesResource,
    LocationsResource, OrdersResource, PlansResource, ProductsResource, SubscriptionsResource,
};

/// Production endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.larder.app";

/// Page size shared by every connection read.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_QUERY_RETRIES: usize = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Immutable settings of a [`LarderClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: SecretString,
    pub timeout: Duration,
    pub user_agent: String,
    pub page_size: u32,
    /// Retries for queries on transient failures. Mutations are never retried.
    pub query_retries: usize,
    /// First backoff delay; later delays grow exponentially.
    pub retry_delay: Duration,
}

impl ClientConfig {
    fn endpoint(&self) -> String {
        format!("{}/graphql", self.base_url.trim_end_matches('/'))
    }
}

/// Builder for [`LarderClient`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            config: ClientConfig {
                base_url: DEFAULT_BASE_URL.to_owned(),
                api_key: SecretString::from(api_key.into()),
                timeout: DEFAULT_TIMEOUT,
                user_agent: concat!("larder/", env!("CARGO_PKG_VERSION")).to_owned(),
                page_size: DEFAULT_PAGE_SIZE,
                query_retries: DEFAULT_QUERY_RETRIES,
                retry_delay: DEFAULT_RETRY_DELAY,
            },
        }
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Zero is clamped to one.
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn query_retries(mut self, retries: usize) -> Self {
        self.config.query_retries = retries;
        self
    }

    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// Build a client over an explicit backend.
    pub fn build_with<C: HttpClient>(self, http: C) -> LarderClient<C> {
        LarderClient {
            inner: Arc::new(ClientInner {
                config: self.config,
                http,
            }),
        }
    }

    /// Build a client over the reqwest backend.
    #[cfg(feature = "reqwest-client")]
    #[must_use]
    pub fn build(self) -> LarderClient<crate::backends::ReqwestClient> {
        let http = crate::backends::ReqwestClient::new(self.config.timeout);
        self.build_with(http)
    }
}

pub(crate) struct ClientInner<C: HttpClient> {
    pub(crate) config: ClientConfig,
    http: C,
}

impl<C: HttpClient> ClientInner<C> {
    /// Execute an operation whose root field is aliased to `result`.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        kind: OperationKind,
        request: &GraphQlRequest<'_>,
    ) -> Result<T, LarderError> {
        let retries = match kind {
            OperationKind::Query => self.config.query_retries,
            OperationKind::Mutation => 0,
        };

        let rooted: Rooted<T> = if retries == 0 {
            self.send_once(request).await?
        } else {
            (|| self.send_once(request))
                .retry(
                    ExponentialBuilder::default()
                        .with_min_delay(self.config.retry_delay)
                        .with_max_delay(MAX_RETRY_DELAY)
                        .with_max_times(retries)
                        .with_jitter(),
                )
                .when(LarderError::is_transient)
                .notify(|err, dur| {
                    warn!(
                        operation = request.operation_name,
                        error = %err,
                        "query failed, retrying after {:.2}s",
                        dur.as_secs_f64()
                    );
                })
                .await?
        };
        Ok(rooted.result)
    }

    async fn send_once<D: DeserializeOwned>(
        &self,
        request: &GraphQlRequest<'_>,
    ) -> Result<D, LarderError> {
        let body = Bytes::from(serde_json::to_vec(request)?);
        let http_request = HttpRequest::post_json(self.config.endpoint(), self.headers()?, body);

        let response = self.http.send(http_request).await?;
        debug!(
            operation = request.operation_name,
            status = response.status.as_u16(),
            "received response"
        );

        if !response.status.is_success() {
            // Servers may carry the GraphQL error envelope on a 4xx/5xx; prefer it when present.
            return match serde_json::from_slice::<GraphQlResponse<serde_json::Value>>(&response.body)
            {
                Ok(envelope) => match envelope.into_result() {
                    Err(err @ LarderError::GraphQl(_)) => Err(err),
                    _ => Err(LarderError::Http {
                        status: response.status.as_u16(),
                        body: response.body_text().into_owned(),
                    }),
                },
                Err(_) => Err(LarderError::Http {
                    status: response.status.as_u16(),
                    body: response.body_text().into_owned(),
                }),
            };
        }

        serde_json::from_slice::<GraphQlResponse<D>>(&response.body)?.into_result()
    }

    fn headers(&self) -> Result<HeaderMap, LarderError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {}", self.config.api_key.expose_secret()))
                .map_err(|e| HttpClientError::Other(Box::new(e)))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        if let Ok(agent) = HeaderValue::from_str(&self.config.user_agent) {
            headers.insert(USER_AGENT, agent);
        }
        Ok(headers)
    }
}

/// Client for the larder merchant GraphQL API.
///
/// Cheap to clone; clones share the backend.
pub struct LarderClient<C: HttpClient> {
    pub(crate) inner: Arc<ClientInner<C>>,
}

impl<C: HttpClient> Clone for LarderClient<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: HttpClient> std::fmt::Debug for LarderClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LarderClient")
            .field("base_url", &self.inner.config.base_url)
            .field("page_size", &self.inner.config.page_size)
            .finish_non_exhaustive()
    }
}

impl<C: HttpClient> LarderClient<C> {
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.inner.config.page_size
    }

    /// Run a read-only operation. Transient failures are retried.
    #[instrument(name = "LarderClient::query", skip(self, query, variables))]
    pub async fn query<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, LarderError> {
        let request = GraphQlRequest {
            query,
            operation_name,
            variables,
        };
        self.inner.execute(OperationKind::Query, &request).await
    }

    /// Run a write. Never retried, so a timed-out create is not duplicated.
    #[instrument(name = "LarderClient::mutate", skip(self, query, variables))]
    pub async fn mutate<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, LarderError> {
        let request = GraphQlRequest {
            query,
            operation_name,
            variables,
        };
        self.inner.execute(OperationKind::Mutation, &request).await
    }

    pub fn customers(&self) -> CustomersResource<'_, C> {
        CustomersResource::new(self)
    }

    pub fn orders(&self) -> OrdersResource<'_, C> {
        OrdersResource::new(self)
    }

    pub fn subscriptions(&self) -> SubscriptionsResource<'_, C> {
        SubscriptionsResource::new(self)
    }

    pub fn coupons(&self) -> CouponsResource<'_, C> {
        CouponsResource::new(self)
    }

    pub fn plans(&self) -> PlansResource<'_, C> {
        PlansResource::new(self)
    }

    pub fn products(&self) -> ProductsResource<'_, C> {
        ProductsResource::new(self)
    }

    pub fn locations(&self) -> LocationsResource<'_, C> {
        LocationsResource::new(self)
    }

    pub fn delivery_rules(&self) -> DeliveryRulesResource<'_, C> {
        DeliveryRulesResource::new(self)
    }

    pub fn business(&self) -> BusinessResource<'_, C> {
        BusinessResource::new(self)
    }
}

/// The reqwest-backed client most callers want.
#[cfg(feature = "reqwest-client")]
pub type Larder = LarderClient<crate::backends::ReqwestClient>;

#[cfg(feature = "reqwest-client")]
impl Larder {
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }
}
