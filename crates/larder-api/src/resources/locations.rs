//! Location resource.

use serde_json::{Map, Value};

use super::scoped;
use crate::client::LarderClient;
use crate::error::LarderError;
use crate::graphql::Payload;
use crate::http_client::HttpClient;
use crate::models::{Connection, Location, LocationInput, PageArgs};
use crate::pagination::{ConnectionQuery, ConnectionStream};
use crate::tenant::TenantContext;

macro_rules! location_fields {
    () => {
        "id name address pickupEnabled deliveryEnabled"
    };
}

const CREATE_LOCATION: &str = concat!(
    "mutation CreateLocation($businessId: ID!, $input: LocationInput!) { ",
    "result: createLocation(businessId: $businessId, input: $input) { entity: location { ",
    location_fields!(),
    " } } }"
);

const UPDATE_LOCATION: &str = concat!(
    "mutation UpdateLocation($businessId: ID!, $locationId: ID!, $input: LocationInput!) { ",
    "result: updateLocation(businessId: $businessId, locationId: $locationId, input: $input) { entity: location { ",
    location_fields!(),
    " } } }"
);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationsQuery;

impl ConnectionQuery for LocationsQuery {
    type Node = Location;

    const OPERATION: &'static str = "ListLocations";
    const DOCUMENT: &'static str = concat!(
        "query ListLocations($businessId: ID!, $first: Int!, $after: String) { ",
        "result: locations(businessId: $businessId, first: $first, after: $after) { ",
        "edges { cursor node { ",
        location_fields!(),
        " } } ",
        page_info_selection!(),
        " } }"
    );

    fn variables(&self) -> Result<Map<String, Value>, serde_json::Error> {
        Ok(Map::new())
    }
}

/// Location operations. Mutation failures carry a [`BusinessErrorCode`](crate::BusinessErrorCode).
pub struct LocationsResource<'c, C: HttpClient> {
    client: &'c LarderClient<C>,
}

impl<'c, C: HttpClient> LocationsResource<'c, C> {
    pub(crate) fn new(client: &'c LarderClient<C>) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        tenant: &TenantContext,
        page: &PageArgs,
    ) -> Result<Connection<Location>, LarderError> {
        self.client.connection(tenant, &LocationsQuery, page).await
    }

    /// Businesses have a handful of locations, so this is usually a single page.
    #[must_use]
    pub fn stream(&self, tenant: &TenantContext) -> ConnectionStream<C, LocationsQuery> {
        self.client.stream(tenant, LocationsQuery)
    }

    pub async fn create(
        &self,
        tenant: &TenantContext,
        input: &LocationInput,
    ) -> Result<Location, LarderError> {
        let vars = scoped(tenant, [("input", serde_json::to_value(input)?)]);
        let payload: Payload<Location> = self
            .client
            .mutate("CreateLocation", CREATE_LOCATION, vars)
            .await?;
        Ok(payload.entity)
    }

    pub async fn update(
        &self,
        tenant: &TenantContext,
        location_id: &str,
        input: &LocationInput,
    ) -> Result<Location, LarderError> {
        let vars = scoped(
            tenant,
            [
                ("locationId", location_id.into()),
                ("input", serde_json::to_value(input)?),
            ],
        );
        let payload: Payload<Location> = self
            .client
            .mutate("UpdateLocation", UPDATE_LOCATION, vars)
            .await?;
        Ok(payload.entity)
    }
}
