//! GraphQL request and response envelopes.
//!
//! Every operation document aliases its root field to `result`, so a single [`Rooted`] wrapper
//! deserializes any operation's `data`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::LarderError;

/// Whether an operation reads or writes. Only reads are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// The JSON body posted to the GraphQL endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub operation_name: &'a str,
    pub variables: serde_json::Value,
}

/// One entry of the response `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<ErrorExtensions>,
}

impl GraphQlError {
    /// The domain error code, when the server attached one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.code.as_deref()
    }
}

/// Server-defined metadata on a GraphQL error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<D> {
    data: Option<D>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

impl<D: DeserializeOwned> GraphQlResponse<D> {
    /// Errors win over partial data: a write that reports an error is treated as failed.
    pub(crate) fn into_result(self) -> Result<D, LarderError> {
        if !self.errors.is_empty() {
            return Err(LarderError::GraphQl(self.errors));
        }
        self.data.ok_or(LarderError::MissingData)
    }
}

/// `data` of an operation whose root field is aliased to `result`.
#[derive(Debug, Deserialize)]
pub(crate) struct Rooted<T> {
    pub(crate) result: T,
}

/// Mutation payload wrapping the affected entity, aliased to `entity` in every document.
#[derive(Debug, Deserialize)]
pub(crate) struct Payload<T> {
    pub(crate) entity: T,
}
