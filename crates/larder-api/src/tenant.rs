//! The tenant scope every API call runs under.

use serde::{Deserialize, Serialize};

/// Business, location, and producer identifiers scoping an operation.
///
/// Passed by reference into every resource call; the SDK holds no ambient tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TenantContext {
    pub business_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer_id: Option<String>,
}

impl TenantContext {
    #[must_use]
    pub fn new(business_id: impl Into<String>) -> Self {
        Self {
            business_id: business_id.into(),
            location_id: None,
            producer_id: None,
        }
    }

    /// Narrow the scope to a single location.
    #[must_use]
    pub fn with_location(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    #[must_use]
    pub fn with_producer(mut self, producer_id: impl Into<String>) -> Self {
        self.producer_id = Some(producer_id.into());
        self
    }

    /// Base GraphQL variables carrying this scope.
    pub(crate) fn variables(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut vars = serde_json::Map::new();
        vars.insert("businessId".to_owned(), self.business_id.clone().into());
        if let Some(location) = &self.location_id {
            vars.insert("locationId".to_owned(), location.clone().into());
        }
        if let Some(producer) = &self.producer_id {
            vars.insert("producerId".to_owned(), producer.clone().into());
        }
        vars
    }
}
