//! Order models.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::common::{Cents, DateRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Fulfilled,
    Refunded,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub number: String,
    pub customer_name: String,
    pub status: OrderStatus,
    pub total_cents: Cents,
    #[serde(default)]
    pub fulfillment_date: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "DateRange::is_empty")]
    pub fulfillment: DateRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}
