//! Meal-plan models.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::common::Cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BillingInterval {
    Weekly,
    Biweekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price_cents: Cents,
    pub interval: BillingInterval,
    pub meals_per_delivery: u32,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub location_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFilter {
    pub include_archived: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    pub name: String,
    pub price_cents: Cents,
    pub interval: BillingInterval,
    pub meals_per_delivery: u32,
    pub location_ids: Vec<String>,
}

/// A customer subscribed to a plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSubscriber {
    pub subscription_id: String,
    pub customer_name: String,
    pub email: String,
    pub started_at: String,
}
