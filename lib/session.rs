//! An operator's working session: one client, one tenant scope.

use larder_api::models::{
    CouponFilter, CustomerFilter, OrderFilter, PayoutAccount, PlanFilter, Product, ProductFilter,
    SubscriptionFilter, TagChanges,
};
use larder_api::resources::{
    CouponRedemptionsQuery, CouponsQuery, CustomersQuery, DeliveryRulesQuery, InvoicesQuery,
    LocationsQuery, OrdersQuery, PlanSubscribersQuery, PlansQuery, ProductsQuery,
    SubscriptionsQuery,
};
use larder_api::{ConnectionQuery, HttpClient, LarderClient, LarderError, TenantContext};
use tracing::{info, instrument};

use crate::one_shot::{OneShot, Phase, RunError};
use crate::pagination::ConnectionPager;
use crate::selection::Selection;

/// Binds a [`LarderClient`] to the tenant every call runs under, and owns the state that must
/// outlive a single call, such as the payout finalization guard.
pub struct AdminSession<C: HttpClient> {
    client: LarderClient<C>,
    tenant: TenantContext,
    payouts: OneShot<PayoutAccount>,
}

impl<C: HttpClient> AdminSession<C> {
    pub fn new(client: LarderClient<C>, tenant: TenantContext) -> Self {
        Self {
            client,
            tenant,
            payouts: OneShot::new(),
        }
    }

    #[must_use]
    pub fn client(&self) -> &LarderClient<C> {
        &self.client
    }

    #[must_use]
    pub fn tenant(&self) -> &TenantContext {
        &self.tenant
    }

    /// A pager over any connection query, scoped to this session's tenant.
    pub fn pager<Q: ConnectionQuery>(&self, query: Q) -> ConnectionPager<C, Q> {
        ConnectionPager::new(self.client.clone(), self.tenant.clone(), query)
    }

    pub fn customers(&self, filter: CustomerFilter) -> ConnectionPager<C, CustomersQuery> {
        self.pager(CustomersQuery { filter })
    }

    pub fn orders(&self, filter: OrderFilter) -> ConnectionPager<C, OrdersQuery> {
        self.pager(OrdersQuery { filter })
    }

    pub fn subscriptions(&self, filter: SubscriptionFilter) -> ConnectionPager<C, SubscriptionsQuery> {
        self.pager(SubscriptionsQuery { filter })
    }

    pub fn invoices(&self, subscription_id: impl Into<String>) -> ConnectionPager<C, InvoicesQuery> {
        self.pager(InvoicesQuery {
            subscription_id: subscription_id.into(),
        })
    }

    pub fn coupons(&self, filter: CouponFilter) -> ConnectionPager<C, CouponsQuery> {
        self.pager(CouponsQuery { filter })
    }

    pub fn coupon_history(
        &self,
        coupon_id: impl Into<String>,
    ) -> ConnectionPager<C, CouponRedemptionsQuery> {
        self.pager(CouponRedemptionsQuery {
            coupon_id: coupon_id.into(),
        })
    }

    pub fn plans(&self, filter: PlanFilter) -> ConnectionPager<C, PlansQuery> {
        self.pager(PlansQuery { filter })
    }

    pub fn plan_subscribers(
        &self,
        plan_id: impl Into<String>,
    ) -> ConnectionPager<C, PlanSubscribersQuery> {
        self.pager(PlanSubscribersQuery {
            plan_id: plan_id.into(),
        })
    }

    pub fn products(&self, filter: ProductFilter) -> ConnectionPager<C, ProductsQuery> {
        self.pager(ProductsQuery { filter })
    }

    pub fn delivery_rules(
        &self,
        location_id: impl Into<String>,
    ) -> ConnectionPager<C, DeliveryRulesQuery> {
        self.pager(DeliveryRulesQuery {
            location_id: location_id.into(),
        })
    }

    pub fn locations(&self) -> ConnectionPager<C, LocationsQuery> {
        self.pager(LocationsQuery)
    }

    /// Link the payout account, at most once per session.
    ///
    /// A concurrent second call is refused while the first is in flight; once one succeeds,
    /// every later call is refused. A failed attempt can be retried.
    #[instrument(name = "AdminSession::finalize_payouts", skip(self), fields(business = %self.tenant.business_id))]
    pub async fn finalize_payouts(&self) -> Result<PayoutAccount, RunError<LarderError>> {
        let finalize = move || async move {
            self.client.business().finalize_payouts(&self.tenant).await
        };
        let account = self.payouts.run(finalize).await?;
        info!(account = %account.id, "payout account finalized");
        Ok(account)
    }

    #[must_use]
    pub fn payouts_phase(&self) -> Phase {
        self.payouts.phase()
    }

    /// Push the locally edited tag selection of a product.
    ///
    /// Returns `Ok(None)` without a request when nothing changed. On success the selection is
    /// committed; on failure it is rolled back to the last confirmed tags.
    pub async fn apply_product_tags(
        &self,
        product_id: &str,
        tags: &mut Selection<String>,
    ) -> Result<Option<Product>, LarderError> {
        let diff = tags.diff();
        if diff.is_empty() {
            return Ok(None);
        }
        let changes = TagChanges {
            add: diff.added,
            remove: diff.removed,
        };
        match self
            .client
            .products()
            .set_tags(&self.tenant, product_id, &changes)
            .await
        {
            Ok(product) => {
                tags.commit();
                Ok(Some(product))
            }
            Err(err) => {
                tags.rollback();
                Err(err)
            }
        }
    }
}
