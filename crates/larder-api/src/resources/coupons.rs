//! Coupon resource, including each coupon's redemption history.

use serde_json::{Map, Value};

use super::{scoped, single};
use crate::client::LarderClient;
use crate::error::LarderError;
use crate::graphql::Payload;
use crate::http_client::HttpClient;
use crate::models::{
    Archived, Connection, Coupon, CouponFilter, CouponInput, CouponRedemption, PageArgs,
};
use crate::pagination::{ConnectionQuery, ConnectionStream};
use crate::tenant::TenantContext;

macro_rules! coupon_fields {
    () => {
        "id code discountKind amount redemptionLimit redemptions expiresAt archived locationIds"
    };
}

const CREATE_COUPON: &str = concat!(
    "mutation CreateCoupon($businessId: ID!, $input: CouponInput!) { ",
    "result: createCoupon(businessId: $businessId, input: $input) { entity: coupon { ",
    coupon_fields!(),
    " } } }"
);

const UPDATE_COUPON: &str = concat!(
    "mutation UpdateCoupon($businessId: ID!, $couponId: ID!, $input: CouponInput!) { ",
    "result: updateCoupon(businessId: $businessId, couponId: $couponId, input: $input) { entity: coupon { ",
    coupon_fields!(),
    " } } }"
);

const ARCHIVE_COUPON: &str = concat!(
    "mutation ArchiveCoupon($businessId: ID!, $couponId: ID!) { ",
    "result: archiveCoupon(businessId: $businessId, couponId: $couponId) { entity: coupon { id archived } } }"
);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CouponsQuery {
    pub filter: CouponFilter,
}

impl ConnectionQuery for CouponsQuery {
    type Node = Coupon;

    const OPERATION: &'static str = "ListCoupons";
    const DOCUMENT: &'static str = concat!(
        "query ListCoupons($businessId: ID!, $first: Int!, $after: String, $filter: CouponFilter) { ",
        "result: coupons(businessId: $businessId, first: $first, after: $after, filter: $filter) { ",
        "edges { cursor node { ",
        coupon_fields!(),
        " } } ",
        page_info_selection!(),
        " } }"
    );

    fn variables(&self) -> Result<Map<String, Value>, serde_json::Error> {
        single("filter", &self.filter)
    }
}

/// Orders that redeemed one coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRedemptionsQuery {
    pub coupon_id: String,
}

impl ConnectionQuery for CouponRedemptionsQuery {
    type Node = CouponRedemption;

    const OPERATION: &'static str = "ListCouponRedemptions";
    const DOCUMENT: &'static str = concat!(
        "query ListCouponRedemptions($businessId: ID!, $couponId: ID!, $first: Int!, $after: String) { ",
        "result: couponRedemptions(businessId: $businessId, couponId: $couponId, first: $first, after: $after) { ",
        "edges { cursor node { orderId orderNumber customerName discountCents placedAt } } ",
        page_info_selection!(),
        " } }"
    );

    fn variables(&self) -> Result<Map<String, Value>, serde_json::Error> {
        single("couponId", &self.coupon_id)
    }
}

/// Coupon operations. Mutation failures carry a [`CouponErrorCode`](crate::CouponErrorCode).
pub struct CouponsResource<'c, C: HttpClient> {
    client: &'c LarderClient<C>,
}

impl<'c, C: HttpClient> CouponsResource<'c, C> {
    pub(crate) fn new(client: &'c LarderClient<C>) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        tenant: &TenantContext,
        filter: &CouponFilter,
        page: &PageArgs,
    ) -> Result<Connection<Coupon>, LarderError> {
        let query = CouponsQuery {
            filter: filter.clone(),
        };
        self.client.connection(tenant, &query, page).await
    }

    #[must_use]
    pub fn stream(&self, tenant: &TenantContext, filter: CouponFilter) -> ConnectionStream<C, CouponsQuery> {
        self.client.stream(tenant, CouponsQuery { filter })
    }

    pub async fn order_history(
        &self,
        tenant: &TenantContext,
        coupon_id: &str,
        page: &PageArgs,
    ) -> Result<Connection<CouponRedemption>, LarderError> {
        let query = CouponRedemptionsQuery {
            coupon_id: coupon_id.to_owned(),
        };
        self.client.connection(tenant, &query, page).await
    }

    pub async fn create(
        &self,
        tenant: &TenantContext,
        input: &CouponInput,
    ) -> Result<Coupon, LarderError> {
        let vars = scoped(tenant, [("input", serde_json::to_value(input)?)]);
        let payload: Payload<Coupon> = self
            .client
            .mutate("CreateCoupon", CREATE_COUPON, vars)
            .await?;
        Ok(payload.entity)
    }

    pub async fn update(
        &self,
        tenant: &TenantContext,
        coupon_id: &str,
        input: &CouponInput,
    ) -> Result<Coupon, LarderError> {
        let vars = scoped(
            tenant,
            [
                ("couponId", coupon_id.into()),
                ("input", serde_json::to_value(input)?),
            ],
        );
        let payload: Payload<Coupon> = self
            .client
            .mutate("UpdateCoupon", UPDATE_COUPON, vars)
            .await?;
        Ok(payload.entity)
    }

    pub async fn archive(
        &self,
        tenant: &TenantContext,
        coupon_id: &str,
    ) -> Result<Archived, LarderError> {
        let vars = scoped(tenant, [("couponId", coupon_id.into())]);
        let payload: Payload<Archived> = self
            .client
            .mutate("ArchiveCoupon", ARCHIVE_COUPON, vars)
            .await?;
        Ok(payload.entity)
    }
}
