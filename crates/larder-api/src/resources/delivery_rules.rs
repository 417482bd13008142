//! Delivery rules of a location.

use serde_json::{Map, Value};

use super::{scoped, single};
use crate::client::LarderClient;
use crate::error::LarderError;
use crate::graphql::Payload;
use crate::http_client::HttpClient;
use crate::models::{Archived, Connection, DeliveryRule, DeliveryRuleInput, PageArgs};
use crate::pagination::{ConnectionQuery, ConnectionStream};
use crate::tenant::TenantContext;

macro_rules! rule_fields {
    () => {
        "id locationId weekday cutoffHours feeCents postalCodes"
    };
}

const CREATE_RULE: &str = concat!(
    "mutation CreateDeliveryRule($businessId: ID!, $locationId: ID!, $input: DeliveryRuleInput!) { ",
    "result: createDeliveryRule(businessId: $businessId, locationId: $locationId, input: $input) { ",
    "entity: deliveryRule { ",
    rule_fields!(),
    " } } }"
);

const ARCHIVE_RULE: &str = concat!(
    "mutation ArchiveDeliveryRule($businessId: ID!, $ruleId: ID!) { ",
    "result: archiveDeliveryRule(businessId: $businessId, ruleId: $ruleId) { entity: deliveryRule { id archived } } }"
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRulesQuery {
    pub location_id: String,
}

impl ConnectionQuery for DeliveryRulesQuery {
    type Node = DeliveryRule;

    const OPERATION: &'static str = "ListDeliveryRules";
    const DOCUMENT: &'static str = concat!(
        "query ListDeliveryRules($businessId: ID!, $locationId: ID!, $first: Int!, $after: String) { ",
        "result: deliveryRules(businessId: $businessId, locationId: $locationId, first: $first, after: $after) { ",
        "edges { cursor node { ",
        rule_fields!(),
        " } } ",
        page_info_selection!(),
        " } }"
    );

    fn variables(&self) -> Result<Map<String, Value>, serde_json::Error> {
        single("locationId", &self.location_id)
    }
}

/// Delivery rule operations. Mutation failures carry a
/// [`DeliveryErrorCode`](crate::DeliveryErrorCode).
pub struct DeliveryRulesResource<'c, C: HttpClient> {
    client: &'c LarderClient<C>,
}

impl<'c, C: HttpClient> DeliveryRulesResource<'c, C> {
    pub(crate) fn new(client: &'c LarderClient<C>) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        tenant: &TenantContext,
        location_id: &str,
        page: &PageArgs,
    ) -> Result<Connection<DeliveryRule>, LarderError> {
        let query = DeliveryRulesQuery {
            location_id: location_id.to_owned(),
        };
        self.client.connection(tenant, &query, page).await
    }

    #[must_use]
    pub fn stream(
        &self,
        tenant: &TenantContext,
        location_id: &str,
    ) -> ConnectionStream<C, DeliveryRulesQuery> {
        let query = DeliveryRulesQuery {
            location_id: location_id.to_owned(),
        };
        self.client.stream(tenant, query)
    }

    pub async fn create(
        &self,
        tenant: &TenantContext,
        location_id: &str,
        input: &DeliveryRuleInput,
    ) -> Result<DeliveryRule, LarderError> {
        let vars = scoped(
            tenant,
            [
                ("locationId", location_id.into()),
                ("input", serde_json::to_value(input)?),
            ],
        );
        let payload: Payload<DeliveryRule> = self
            .client
            .mutate("CreateDeliveryRule", CREATE_RULE, vars)
            .await?;
        Ok(payload.entity)
    }

    pub async fn archive(
        &self,
        tenant: &TenantContext,
        rule_id: &str,
    ) -> Result<Archived, LarderError> {
        let vars = scoped(tenant, [("ruleId", rule_id.into())]);
        let payload: Payload<Archived> = self
            .client
            .mutate("ArchiveDeliveryRule", ARCHIVE_RULE, vars)
            .await?;
        Ok(payload.entity)
    }
}
