//! Customer resource.

use serde_json::{Map, Value};

use super::{scoped, single};
use crate::client::LarderClient;
use crate::error::LarderError;
use crate::graphql::Payload;
use crate::http_client::HttpClient;
use crate::models::{
    Connection, Customer, CustomerFilter, IssueCreditInput, PageArgs, UpdateCustomerInput,
};
use crate::pagination::{ConnectionQuery, ConnectionStream};
use crate::tenant::TenantContext;

macro_rules! customer_fields {
    () => {
        "id firstName lastName email phone status creditBalanceCents createdAt"
    };
}

const UPDATE_CUSTOMER: &str = concat!(
    "mutation UpdateCustomer($businessId: ID!, $customerId: ID!, $input: UpdateCustomerInput!) { ",
    "result: updateCustomer(businessId: $businessId, customerId: $customerId, input: $input) { ",
    "entity: customer { ",
    customer_fields!(),
    " } } }"
);

const ISSUE_CREDIT: &str = concat!(
    "mutation IssueCustomerCredit($businessId: ID!, $customerId: ID!, $input: IssueCreditInput!) { ",
    "result: issueCustomerCredit(businessId: $businessId, customerId: $customerId, input: $input) { ",
    "entity: customer { ",
    customer_fields!(),
    " } } }"
);

/// The customer table, filtered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomersQuery {
    pub filter: CustomerFilter,
}

impl ConnectionQuery for CustomersQuery {
    type Node = Customer;

    const OPERATION: &'static str = "ListCustomers";
    const DOCUMENT: &'static str = concat!(
        "query ListCustomers($businessId: ID!, $first: Int!, $after: String, $filter: CustomerFilter) { ",
        "result: customers(businessId: $businessId, first: $first, after: $after, filter: $filter) { ",
        "edges { cursor node { ",
        customer_fields!(),
        " } } ",
        page_info_selection!(),
        " } }"
    );

    fn variables(&self) -> Result<Map<String, Value>, serde_json::Error> {
        single("filter", &self.filter)
    }
}

/// Operations on the business's customers.
pub struct CustomersResource<'c, C: HttpClient> {
    client: &'c LarderClient<C>,
}

impl<'c, C: HttpClient> CustomersResource<'c, C> {
    pub(crate) fn new(client: &'c LarderClient<C>) -> Self {
        Self { client }
    }

    /// One page of customers.
    pub async fn list(
        &self,
        tenant: &TenantContext,
        filter: &CustomerFilter,
        page: &PageArgs,
    ) -> Result<Connection<Customer>, LarderError> {
        let query = CustomersQuery {
            filter: filter.clone(),
        };
        self.client.connection(tenant, &query, page).await
    }

    /// Every customer matching `filter`.
    #[must_use]
    pub fn stream(
        &self,
        tenant: &TenantContext,
        filter: CustomerFilter,
    ) -> ConnectionStream<C, CustomersQuery> {
        self.client.stream(tenant, CustomersQuery { filter })
    }

    /// Edit contact details. Failures carry a [`ConsumerErrorCode`](crate::ConsumerErrorCode).
    pub async fn update(
        &self,
        tenant: &TenantContext,
        customer_id: &str,
        input: &UpdateCustomerInput,
    ) -> Result<Customer, LarderError> {
        let vars = scoped(
            tenant,
            [
                ("customerId", customer_id.into()),
                ("input", serde_json::to_value(input)?),
            ],
        );
        let payload: Payload<Customer> = self
            .client
            .mutate("UpdateCustomer", UPDATE_CUSTOMER, vars)
            .await?;
        Ok(payload.entity)
    }

    /// Grant store credit. Failures carry a [`CreditErrorCode`](crate::CreditErrorCode).
    pub async fn issue_credit(
        &self,
        tenant: &TenantContext,
        customer_id: &str,
        input: &IssueCreditInput,
    ) -> Result<Customer, LarderError> {
        let vars = scoped(
            tenant,
            [
                ("customerId", customer_id.into()),
                ("input", serde_json::to_value(input)?),
            ],
        );
        let payload: Payload<Customer> = self
            .client
            .mutate("IssueCustomerCredit", ISSUE_CREDIT, vars)
            .await?;
        Ok(payload.entity)
    }
}
