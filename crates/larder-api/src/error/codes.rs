//! Per-domain `extensions.code` values the API attaches to GraphQL errors.
//!
//! Wire codes are SCREAMING_SNAKE_CASE renderings of the variant names.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Errors from coupon mutations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum CouponErrorCode {
    CouponNotFound,
    CouponCodeTaken,
    CouponLimitExceeded,
    CouponExpired,
    CouponArchived,
    InvalidDiscount,
}

/// Errors from meal-plan mutations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum PlanErrorCode {
    PlanNotFound,
    PlanNameTaken,
    PlanLimitExceeded,
    PlanHasActiveSubscribers,
    InvalidPlanPrice,
}

/// Errors from product mutations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ProductErrorCode {
    ProductNotFound,
    ProductNameTaken,
    ProductInUse,
    ProductLimitExceeded,
    TagNotFound,
}

/// Errors from issuing store credit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum CreditErrorCode {
    CreditLimitExceeded,
    InvalidCreditAmount,
    InsufficientCreditBalance,
}

/// Errors from customer (consumer) mutations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ConsumerErrorCode {
    ConsumerNotFound,
    ConsumerEmailTaken,
    ConsumerPhoneTaken,
}

/// Errors from business, location, and payout mutations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum BusinessErrorCode {
    BusinessNotFound,
    LocationNotFound,
    LocationNameTaken,
    PayoutsAlreadyConnected,
    PayoutOnboardingIncomplete,
}

/// Errors from delivery-rule mutations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum DeliveryErrorCode {
    DeliveryRuleNotFound,
    DeliveryRuleConflict,
    InvalidDeliveryCutoff,
}

/// Errors from subscription lifecycle mutations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum SubscriptionErrorCode {
    SubscriptionNotFound,
    SubscriptionAlreadyPaused,
    SubscriptionNotPaused,
    SubscriptionCancelled,
}
