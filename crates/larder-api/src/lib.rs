//! Rust SDK for the larder merchant GraphQL API.

pub mod backends;
mod client;
pub mod error;
mod graphql;
mod http_client;
pub mod models;
mod pagination;
pub mod resources;
mod tenant;

pub use client::{ClientBuilder, ClientConfig, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, LarderClient};
#[cfg(feature = "reqwest-client")]
pub use client::Larder;
pub use error::{
    BusinessErrorCode, ConsumerErrorCode, CouponErrorCode, CreditErrorCode, DeliveryErrorCode,
    HttpClientError, LarderError, PlanErrorCode, ProductErrorCode, SubscriptionErrorCode,
};
pub use graphql::{ErrorExtensions, GraphQlError};
pub use http_client::{HttpClient, HttpRequest, HttpResponse};
pub use pagination::{ConnectionQuery, ConnectionStream};
pub use tenant::TenantContext;
