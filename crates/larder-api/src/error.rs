//! Error types for the larder SDK.

use std::str::FromStr;

use thiserror::Error;

use crate::graphql::GraphQlError;

mod codes;

pub use codes::{
    BusinessErrorCode, ConsumerErrorCode, CouponErrorCode, CreditErrorCode, DeliveryErrorCode,
    PlanErrorCode, ProductErrorCode, SubscriptionErrorCode,
};

/// Failures raised by an [`HttpClient`](crate::HttpClient) backend before any response arrived.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The connection could not be established or was dropped.
    #[error("connection error: {0}")]
    Connection(String),

    /// Anything else the backend reported.
    #[error("http client error: {0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Every way a call against the larder API can fail.
#[derive(Debug, Error)]
pub enum LarderError {
    #[error("transport error: {0}")]
    Transport(#[from] HttpClientError),

    /// Non-2xx response whose body was not a GraphQL error envelope.
    #[error("API returned HTTP {status}")]
    Http { status: u16, body: String },

    /// The API answered with a GraphQL `errors` array.
    #[error("API error: {}", first_message(.0))]
    GraphQl(Vec<GraphQlError>),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope had neither `data` nor `errors`.
    #[error("response contained no data")]
    MissingData,
}

fn first_message(errors: &[GraphQlError]) -> &str {
    errors.first().map_or("unknown error", |e| e.message.as_str())
}

impl LarderError {
    /// The raw `extensions.code` of the first GraphQL error, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::GraphQl(errors) => errors.first().and_then(GraphQlError::code),
            _ => None,
        }
    }

    /// The first error's code, parsed into a domain enum such as [`CouponErrorCode`].
    ///
    /// Returns `None` for non-GraphQL failures and for codes outside the domain.
    #[must_use]
    pub fn domain_code<C: FromStr>(&self) -> Option<C> {
        self.code().and_then(|c| c.parse().ok())
    }

    /// Whether retrying the same request could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::GraphQl(_) | Self::Decode(_) | Self::MissingData => false,
        }
    }
}
