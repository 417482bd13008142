//! Subscription resource, including each subscription's invoice history.

use serde_json::{Map, Value};

use super::{scoped, single};
use crate::client::LarderClient;
use crate::error::LarderError;
use crate::graphql::Payload;
use crate::http_client::HttpClient;
use crate::models::{Connection, Invoice, PageArgs, Subscription, SubscriptionFilter};
use crate::pagination::{ConnectionQuery, ConnectionStream};
use crate::tenant::TenantContext;

macro_rules! subscription_fields {
    () => {
        "id customerName planName status nextDeliveryDate"
    };
}

macro_rules! lifecycle_mutation {
    ($op:literal, $field:literal) => {
        concat!(
            "mutation ",
            $op,
            "($businessId: ID!, $subscriptionId: ID!) { result: ",
            $field,
            "(businessId: $businessId, subscriptionId: $subscriptionId) { entity: subscription { ",
            subscription_fields!(),
            " } } }"
        )
    };
}

const PAUSE: &str = lifecycle_mutation!("PauseSubscription", "pauseSubscription");
const RESUME: &str = lifecycle_mutation!("ResumeSubscription", "resumeSubscription");
const CANCEL: &str = lifecycle_mutation!("CancelSubscription", "cancelSubscription");

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubscriptionsQuery {
    pub filter: SubscriptionFilter,
}

impl ConnectionQuery for SubscriptionsQuery {
    type Node = Subscription;

    const OPERATION: &'static str = "ListSubscriptions";
    const DOCUMENT: &'static str = concat!(
        "query ListSubscriptions($businessId: ID!, $first: Int!, $after: String, $filter: SubscriptionFilter) { ",
        "result: subscriptions(businessId: $businessId, first: $first, after: $after, filter: $filter) { ",
        "edges { cursor node { ",
        subscription_fields!(),
        " } } ",
        page_info_selection!(),
        " } }"
    );

    fn variables(&self) -> Result<Map<String, Value>, serde_json::Error> {
        single("filter", &self.filter)
    }
}

/// Invoices of one subscription, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicesQuery {
    pub subscription_id: String,
}

impl ConnectionQuery for InvoicesQuery {
    type Node = Invoice;

    const OPERATION: &'static str = "ListSubscriptionInvoices";
    const DOCUMENT: &'static str = concat!(
        "query ListSubscriptionInvoices($businessId: ID!, $subscriptionId: ID!, $first: Int!, $after: String) { ",
        "result: subscriptionInvoices(businessId: $businessId, subscriptionId: $subscriptionId, first: $first, after: $after) { ",
        "edges { cursor node { id amountCents status issuedAt } } ",
        page_info_selection!(),
        " } }"
    );

    fn variables(&self) -> Result<Map<String, Value>, serde_json::Error> {
        single("subscriptionId", &self.subscription_id)
    }
}

pub struct SubscriptionsResource<'c, C: HttpClient> {
    client: &'c LarderClient<C>,
}

impl<'c, C: HttpClient> SubscriptionsResource<'c, C> {
    pub(crate) fn new(client: &'c LarderClient<C>) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        tenant: &TenantContext,
        filter: &SubscriptionFilter,
        page: &PageArgs,
    ) -> Result<Connection<Subscription>, LarderError> {
        let query = SubscriptionsQuery {
            filter: filter.clone(),
        };
        self.client.connection(tenant, &query, page).await
    }

    #[must_use]
    pub fn stream(
        &self,
        tenant: &TenantContext,
        filter: SubscriptionFilter,
    ) -> ConnectionStream<C, SubscriptionsQuery> {
        self.client.stream(tenant, SubscriptionsQuery { filter })
    }

    pub async fn invoices(
        &self,
        tenant: &TenantContext,
        subscription_id: &str,
        page: &PageArgs,
    ) -> Result<Connection<Invoice>, LarderError> {
        let query = InvoicesQuery {
            subscription_id: subscription_id.to_owned(),
        };
        self.client.connection(tenant, &query, page).await
    }

    /// Failures carry a [`SubscriptionErrorCode`](crate::SubscriptionErrorCode).
    pub async fn pause(
        &self,
        tenant: &TenantContext,
        subscription_id: &str,
    ) -> Result<Subscription, LarderError> {
        self.transition(tenant, subscription_id, "PauseSubscription", PAUSE)
            .await
    }

    pub async fn resume(
        &self,
        tenant: &TenantContext,
        subscription_id: &str,
    ) -> Result<Subscription, LarderError> {
        self.transition(tenant, subscription_id, "ResumeSubscription", RESUME)
            .await
    }

    pub async fn cancel(
        &self,
        tenant: &TenantContext,
        subscription_id: &str,
    ) -> Result<Subscription, LarderError> {
        self.transition(tenant, subscription_id, "CancelSubscription", CANCEL)
            .await
    }

    async fn transition(
        &self,
        tenant: &TenantContext,
        subscription_id: &str,
        operation: &str,
        document: &str,
    ) -> Result<Subscription, LarderError> {
        let vars = scoped(tenant, [("subscriptionId", subscription_id.into())]);
        let payload: Payload<Subscription> = self.client.mutate(operation, document, vars).await?;
        Ok(payload.entity)
    }
}
