//! Business account models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub timezone: String,
    #[serde(default)]
    pub support_email: Option<String>,
    #[serde(default)]
    pub payouts_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSettingsInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,
}

/// The payout account linked once onboarding with the payment provider settles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutAccount {
    pub id: String,
    pub payouts_enabled: bool,
    #[serde(default)]
    pub dashboard_url: Option<String>,
}
