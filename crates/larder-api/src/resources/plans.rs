//! Meal-plan resource, including each plan's subscribers.

use serde_json::{Map, Value};

use super::{scoped, single};
use crate::client::LarderClient;
use crate::error::LarderError;
use crate::graphql::Payload;
use crate::http_client::HttpClient;
use crate::models::{Archived, Connection, PageArgs, Plan, PlanFilter, PlanInput, PlanSubscriber};
use crate::pagination::{ConnectionQuery, ConnectionStream};
use crate::tenant::TenantContext;

macro_rules! plan_fields {
    () => {
        "id name priceCents interval mealsPerDelivery archived locationIds"
    };
}

const CREATE_PLAN: &str = concat!(
    "mutation CreatePlan($businessId: ID!, $input: PlanInput!) { ",
    "result: createPlan(businessId: $businessId, input: $input) { entity: plan { ",
    plan_fields!(),
    " } } }"
);

const UPDATE_PLAN: &str = concat!(
    "mutation UpdatePlan($businessId: ID!, $planId: ID!, $input: PlanInput!) { ",
    "result: updatePlan(businessId: $businessId, planId: $planId, input: $input) { entity: plan { ",
    plan_fields!(),
    " } } }"
);

const ARCHIVE_PLAN: &str = concat!(
    "mutation ArchivePlan($businessId: ID!, $planId: ID!) { ",
    "result: archivePlan(businessId: $businessId, planId: $planId) { entity: plan { id archived } } }"
);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlansQuery {
    pub filter: PlanFilter,
}

impl ConnectionQuery for PlansQuery {
    type Node = Plan;

    const OPERATION: &'static str = "ListPlans";
    const DOCUMENT: &'static str = concat!(
        "query ListPlans($businessId: ID!, $first: Int!, $after: String, $filter: PlanFilter) { ",
        "result: plans(businessId: $businessId, first: $first, after: $after, filter: $filter) { ",
        "edges { cursor node { ",
        plan_fields!(),
        " } } ",
        page_info_selection!(),
        " } }"
    );

    fn variables(&self) -> Result<Map<String, Value>, serde_json::Error> {
        single("filter", &self.filter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSubscribersQuery {
    pub plan_id: String,
}

impl ConnectionQuery for PlanSubscribersQuery {
    type Node = PlanSubscriber;

    const OPERATION: &'static str = "ListPlanSubscribers";
    const DOCUMENT: &'static str = concat!(
        "query ListPlanSubscribers($businessId: ID!, $planId: ID!, $first: Int!, $after: String) { ",
        "result: planSubscribers(businessId: $businessId, planId: $planId, first: $first, after: $after) { ",
        "edges { cursor node { subscriptionId customerName email startedAt } } ",
        page_info_selection!(),
        " } }"
    );

    fn variables(&self) -> Result<Map<String, Value>, serde_json::Error> {
        single("planId", &self.plan_id)
    }
}

/// Plan operations. Mutation failures carry a [`PlanErrorCode`](crate::PlanErrorCode).
pub struct PlansResource<'c, C: HttpClient> {
    client: &'c LarderClient<C>,
}

impl<'c, C: HttpClient> PlansResource<'c, C> {
    pub(crate) fn new(client: &'c LarderClient<C>) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        tenant: &TenantContext,
        filter: &PlanFilter,
        page: &PageArgs,
    ) -> Result<Connection<Plan>, LarderError> {
        let query = PlansQuery {
            filter: filter.clone(),
        };
        self.client.connection(tenant, &query, page).await
    }

    #[must_use]
    pub fn stream(&self, tenant: &TenantContext, filter: PlanFilter) -> ConnectionStream<C, PlansQuery> {
        self.client.stream(tenant, PlansQuery { filter })
    }

    pub async fn subscribers(
        &self,
        tenant: &TenantContext,
        plan_id: &str,
        page: &PageArgs,
    ) -> Result<Connection<PlanSubscriber>, LarderError> {
        let query = PlanSubscribersQuery {
            plan_id: plan_id.to_owned(),
        };
        self.client.connection(tenant, &query, page).await
    }

    pub async fn create(&self, tenant: &TenantContext, input: &PlanInput) -> Result<Plan, LarderError> {
        let vars = scoped(tenant, [("input", serde_json::to_value(input)?)]);
        let payload: Payload<Plan> = self.client.mutate("CreatePlan", CREATE_PLAN, vars).await?;
        Ok(payload.entity)
    }

    pub async fn update(
        &self,
        tenant: &TenantContext,
        plan_id: &str,
        input: &PlanInput,
    ) -> Result<Plan, LarderError> {
        let vars = scoped(
            tenant,
            [
                ("planId", plan_id.into()),
                ("input", serde_json::to_value(input)?),
            ],
        );
        let payload: Payload<Plan> = self.client.mutate("UpdatePlan", UPDATE_PLAN, vars).await?;
        Ok(payload.entity)
    }

    pub async fn archive(&self, tenant: &TenantContext, plan_id: &str) -> Result<Archived, LarderError> {
        let vars = scoped(tenant, [("planId", plan_id.into())]);
        let payload: Payload<Archived> = self
            .client
            .mutate("ArchivePlan", ARCHIVE_PLAN, vars)
            .await?;
        Ok(payload.entity)
    }
}
