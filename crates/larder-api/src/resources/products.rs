//! Product resource.

use serde_json::{Map, Value};

use super::{scoped, single};
use crate::client::LarderClient;
use crate::error::LarderError;
use crate::graphql::Payload;
use crate::http_client::HttpClient;
use crate::models::{
    Archived, Connection, PageArgs, Product, ProductFilter, ProductInput, TagChanges,
};
use crate::pagination::{ConnectionQuery, ConnectionStream};
use crate::tenant::TenantContext;

macro_rules! product_fields {
    () => {
        "id name description priceCents tags imageUrl archived"
    };
}

const GET_PRODUCT: &str = concat!(
    "query GetProduct($businessId: ID!, $productId: ID!) { ",
    "result: product(businessId: $businessId, productId: $productId) { ",
    product_fields!(),
    " } }"
);

const CREATE_PRODUCT: &str = concat!(
    "mutation CreateProduct($businessId: ID!, $input: ProductInput!) { ",
    "result: createProduct(businessId: $businessId, input: $input) { entity: product { ",
    product_fields!(),
    " } } }"
);

const UPDATE_PRODUCT: &str = concat!(
    "mutation UpdateProduct($businessId: ID!, $productId: ID!, $input: ProductInput!) { ",
    "result: updateProduct(businessId: $businessId, productId: $productId, input: $input) { entity: product { ",
    product_fields!(),
    " } } }"
);

const ARCHIVE_PRODUCT: &str = concat!(
    "mutation ArchiveProduct($businessId: ID!, $productId: ID!) { ",
    "result: archiveProduct(businessId: $businessId, productId: $productId) { entity: product { id archived } } }"
);

const SET_PRODUCT_TAGS: &str = concat!(
    "mutation SetProductTags($businessId: ID!, $productId: ID!, $changes: TagChanges!) { ",
    "result: setProductTags(businessId: $businessId, productId: $productId, changes: $changes) { entity: product { ",
    product_fields!(),
    " } } }"
);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductsQuery {
    pub filter: ProductFilter,
}

impl ConnectionQuery for ProductsQuery {
    type Node = Product;

    const OPERATION: &'static str = "ListProducts";
    const DOCUMENT: &'static str = concat!(
        "query ListProducts($businessId: ID!, $first: Int!, $after: String, $filter: ProductFilter) { ",
        "result: products(businessId: $businessId, first: $first, after: $after, filter: $filter) { ",
        "edges { cursor node { ",
        product_fields!(),
        " } } ",
        page_info_selection!(),
        " } }"
    );

    fn variables(&self) -> Result<Map<String, Value>, serde_json::Error> {
        single("filter", &self.filter)
    }
}

/// Product operations. Mutation failures carry a [`ProductErrorCode`](crate::ProductErrorCode).
pub struct ProductsResource<'c, C: HttpClient> {
    client: &'c LarderClient<C>,
}

impl<'c, C: HttpClient> ProductsResource<'c, C> {
    pub(crate) fn new(client: &'c LarderClient<C>) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        tenant: &TenantContext,
        filter: &ProductFilter,
        page: &PageArgs,
    ) -> Result<Connection<Product>, LarderError> {
        let query = ProductsQuery {
            filter: filter.clone(),
        };
        self.client.connection(tenant, &query, page).await
    }

    #[must_use]
    pub fn stream(&self, tenant: &TenantContext, filter: ProductFilter) -> ConnectionStream<C, ProductsQuery> {
        self.client.stream(tenant, ProductsQuery { filter })
    }

    pub async fn get(&self, tenant: &TenantContext, product_id: &str) -> Result<Product, LarderError> {
        let vars = scoped(tenant, [("productId", product_id.into())]);
        self.client.query("GetProduct", GET_PRODUCT, vars).await
    }

    pub async fn create(
        &self,
        tenant: &TenantContext,
        input: &ProductInput,
    ) -> Result<Product, LarderError> {
        let vars = scoped(tenant, [("input", serde_json::to_value(input)?)]);
        let payload: Payload<Product> = self
            .client
            .mutate("CreateProduct", CREATE_PRODUCT, vars)
            .await?;
        Ok(payload.entity)
    }

    pub async fn update(
        &self,
        tenant: &TenantContext,
        product_id: &str,
        input: &ProductInput,
    ) -> Result<Product, LarderError> {
        let vars = scoped(
            tenant,
            [
                ("productId", product_id.into()),
                ("input", serde_json::to_value(input)?),
            ],
        );
        let payload: Payload<Product> = self
            .client
            .mutate("UpdateProduct", UPDATE_PRODUCT, vars)
            .await?;
        Ok(payload.entity)
    }

    pub async fn archive(
        &self,
        tenant: &TenantContext,
        product_id: &str,
    ) -> Result<Archived, LarderError> {
        let vars = scoped(tenant, [("productId", product_id.into())]);
        let payload: Payload<Archived> = self
            .client
            .mutate("ArchiveProduct", ARCHIVE_PRODUCT, vars)
            .await?;
        Ok(payload.entity)
    }

    /// Apply tag additions and removals in one write.
    pub async fn set_tags(
        &self,
        tenant: &TenantContext,
        product_id: &str,
        changes: &TagChanges,
    ) -> Result<Product, LarderError> {
        let vars = scoped(
            tenant,
            [
                ("productId", product_id.into()),
                ("changes", serde_json::to_value(changes)?),
            ],
        );
        let payload: Payload<Product> = self
            .client
            .mutate("SetProductTags", SET_PRODUCT_TAGS, vars)
            .await?;
        Ok(payload.entity)
    }
}
