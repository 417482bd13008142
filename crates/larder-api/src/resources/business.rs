//! The business account itself.

use super::scoped;
use crate::client::LarderClient;
use crate::error::LarderError;
use crate::graphql::Payload;
use crate::http_client::HttpClient;
use crate::models::{Business, BusinessSettingsInput, PayoutAccount};
use crate::tenant::TenantContext;

macro_rules! business_fields {
    () => {
        "id name currency timezone supportEmail payoutsEnabled"
    };
}

const GET_BUSINESS: &str = concat!(
    "query GetBusiness($businessId: ID!) { result: business(businessId: $businessId) { ",
    business_fields!(),
    " } }"
);

const UPDATE_SETTINGS: &str = concat!(
    "mutation UpdateBusinessSettings($businessId: ID!, $input: BusinessSettingsInput!) { ",
    "result: updateBusinessSettings(businessId: $businessId, input: $input) { entity: business { ",
    business_fields!(),
    " } } }"
);

const FINALIZE_PAYOUTS: &str = concat!(
    "mutation FinalizePayoutAccount($businessId: ID!) { ",
    "result: finalizePayoutAccount(businessId: $businessId) { ",
    "entity: payoutAccount { id payoutsEnabled dashboardUrl } } }"
);

/// Business-level operations. Mutation failures carry a
/// [`BusinessErrorCode`](crate::BusinessErrorCode).
pub struct BusinessResource<'c, C: HttpClient> {
    client: &'c LarderClient<C>,
}

impl<'c, C: HttpClient> BusinessResource<'c, C> {
    pub(crate) fn new(client: &'c LarderClient<C>) -> Self {
        Self { client }
    }

    pub async fn get(&self, tenant: &TenantContext) -> Result<Business, LarderError> {
        let vars = scoped(tenant, []);
        self.client.query("GetBusiness", GET_BUSINESS, vars).await
    }

    pub async fn update_settings(
        &self,
        tenant: &TenantContext,
        input: &BusinessSettingsInput,
    ) -> Result<Business, LarderError> {
        let vars = scoped(tenant, [("input", serde_json::to_value(input)?)]);
        let payload: Payload<Business> = self
            .client
            .mutate("UpdateBusinessSettings", UPDATE_SETTINGS, vars)
            .await?;
        Ok(payload.entity)
    }

    /// Link the payout account once provider onboarding has completed.
    ///
    /// The server rejects a second call with `PAYOUTS_ALREADY_CONNECTED`; callers that may race
    /// should funnel through a single-flight guard.
    pub async fn finalize_payouts(&self, tenant: &TenantContext) -> Result<PayoutAccount, LarderError> {
        let vars = scoped(tenant, []);
        let payload: Payload<PayoutAccount> = self
            .client
            .mutate("FinalizePayoutAccount", FINALIZE_PAYOUTS, vars)
            .await?;
        Ok(payload.entity)
    }
}
