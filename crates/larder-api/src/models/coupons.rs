//! Coupon models.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::common::Cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DiscountKind {
    /// `amount` is a percentage, 1..=100.
    Percentage,
    /// `amount` is in cents.
    FixedAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    pub code: String,
    pub discount_kind: DiscountKind,
    pub amount: i64,
    #[serde(default)]
    pub redemption_limit: Option<u32>,
    #[serde(default)]
    pub redemptions: u32,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub archived: bool,
    /// Locations the coupon is restricted to; empty means every location.
    #[serde(default)]
    pub location_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub include_archived: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponInput {
    pub code: String,
    pub discount_kind: DiscountKind,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redemption_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub location_ids: Vec<String>,
}

/// An order that redeemed a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRedemption {
    pub order_id: String,
    pub order_number: String,
    pub customer_name: String,
    pub discount_cents: Cents,
    pub placed_at: String,
}
