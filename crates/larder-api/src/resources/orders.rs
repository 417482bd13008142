//! Order resource. Read-only: orders are placed by customers, not by merchants.

use serde_json::{Map, Value};

use super::single;
use crate::client::LarderClient;
use crate::error::LarderError;
use crate::http_client::HttpClient;
use crate::models::{Connection, Order, OrderFilter, PageArgs};
use crate::pagination::{ConnectionQuery, ConnectionStream};
use crate::tenant::TenantContext;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrdersQuery {
    pub filter: OrderFilter,
}

impl ConnectionQuery for OrdersQuery {
    type Node = Order;

    const OPERATION: &'static str = "ListOrders";
    const DOCUMENT: &'static str = concat!(
        "query ListOrders($businessId: ID!, $first: Int!, $after: String, $filter: OrderFilter) { ",
        "result: orders(businessId: $businessId, first: $first, after: $after, filter: $filter) { ",
        "edges { cursor node { id number customerName status totalCents fulfillmentDate locationId } } ",
        page_info_selection!(),
        " } }"
    );

    fn variables(&self) -> Result<Map<String, Value>, serde_json::Error> {
        single("filter", &self.filter)
    }
}

pub struct OrdersResource<'c, C: HttpClient> {
    client: &'c LarderClient<C>,
}

impl<'c, C: HttpClient> OrdersResource<'c, C> {
    pub(crate) fn new(client: &'c LarderClient<C>) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        tenant: &TenantContext,
        filter: &OrderFilter,
        page: &PageArgs,
    ) -> Result<Connection<Order>, LarderError> {
        let query = OrdersQuery {
            filter: filter.clone(),
        };
        self.client.connection(tenant, &query, page).await
    }

    #[must_use]
    pub fn stream(&self, tenant: &TenantContext, filter: OrderFilter) -> ConnectionStream<C, OrdersQuery> {
        self.client.stream(tenant, OrdersQuery { filter })
    }
}
