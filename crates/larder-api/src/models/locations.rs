//! Location and delivery-rule models.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::common::Cents;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub pickup_enabled: bool,
    #[serde(default)]
    pub delivery_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    pub name: String,
    pub address: String,
    pub pickup_enabled: bool,
    pub delivery_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// When and at what cost a location delivers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRule {
    pub id: String,
    pub location_id: String,
    pub weekday: Weekday,
    /// Hours before delivery after which orders roll to the next slot.
    pub cutoff_hours: u32,
    pub fee_cents: Cents,
    #[serde(default)]
    pub postal_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRuleInput {
    pub weekday: Weekday,
    pub cutoff_hours: u32,
    pub fee_cents: Cents,
    pub postal_codes: Vec<String>,
}
