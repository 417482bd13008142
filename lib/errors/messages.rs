//! Message tables for each error domain.

use larder_api::{
    BusinessErrorCode, ConsumerErrorCode, CouponErrorCode, CreditErrorCode, DeliveryErrorCode,
    PlanErrorCode, ProductErrorCode, SubscriptionErrorCode,
};

use super::DomainErrorCode;

macro_rules! message_table {
    ($code:ty, $domain:literal { $($variant:ident => $message:literal,)+ }) => {
        impl DomainErrorCode for $code {
            const DOMAIN: &'static str = $domain;
            const TABLE: &'static [(Self, &'static str)] = &[$((Self::$variant, $message),)+];
        }
    };
}

message_table!(CouponErrorCode, "coupon" {
    CouponNotFound => "This coupon no longer exists.",
    CouponCodeTaken => "A coupon with this code already exists. Choose a different code.",
    CouponLimitExceeded => "You have reached the maximum number of active coupons.",
    CouponExpired => "This coupon has expired.",
    CouponArchived => "This coupon is archived and can no longer be changed.",
    InvalidDiscount => "The discount amount is not valid for this discount type.",
});

message_table!(PlanErrorCode, "plan" {
    PlanNotFound => "This meal plan no longer exists.",
    PlanNameTaken => "A meal plan with this name already exists.",
    PlanLimitExceeded => "You have reached the maximum number of meal plans.",
    PlanHasActiveSubscribers => "This plan still has active subscribers. Move or cancel them first.",
    InvalidPlanPrice => "The plan price is not valid.",
});

message_table!(ProductErrorCode, "product" {
    ProductNotFound => "This product no longer exists.",
    ProductNameTaken => "A product with this name already exists.",
    ProductInUse => "This product is part of an active plan and cannot be archived.",
    ProductLimitExceeded => "You have reached the maximum number of products.",
    TagNotFound => "One of the selected tags does not exist.",
});

message_table!(CreditErrorCode, "credit" {
    CreditLimitExceeded => "This credit exceeds the maximum allowed for a customer.",
    InvalidCreditAmount => "Enter a credit amount greater than zero.",
    InsufficientCreditBalance => "The customer does not have enough credit for this change.",
});

message_table!(ConsumerErrorCode, "consumer" {
    ConsumerNotFound => "This customer no longer exists.",
    ConsumerEmailTaken => "Another customer already uses this email address.",
    ConsumerPhoneTaken => "Another customer already uses this phone number.",
});

message_table!(BusinessErrorCode, "business" {
    BusinessNotFound => "Your business account could not be found.",
    LocationNotFound => "This location no longer exists.",
    LocationNameTaken => "A location with this name already exists.",
    PayoutsAlreadyConnected => "Payouts are already connected for this business.",
    PayoutOnboardingIncomplete => "Finish payout onboarding with the payment provider, then try again.",
});

message_table!(DeliveryErrorCode, "delivery" {
    DeliveryRuleNotFound => "This delivery rule no longer exists.",
    DeliveryRuleConflict => "Another delivery rule already covers this day.",
    InvalidDeliveryCutoff => "The order cutoff must fall before the delivery time.",
});

message_table!(SubscriptionErrorCode, "subscription" {
    SubscriptionNotFound => "This subscription no longer exists.",
    SubscriptionAlreadyPaused => "This subscription is already paused.",
    SubscriptionNotPaused => "This subscription is not paused.",
    SubscriptionCancelled => "This subscription has been cancelled and can no longer be changed.",
});

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;
    use crate::errors::{ErrorCatalog, FALLBACK_MESSAGE};

    fn assert_complete<C>()
    where
        C: DomainErrorCode + IntoEnumIterator + std::hash::Hash + std::fmt::Display,
    {
        let catalog = ErrorCatalog::<C>::new();
        let mut seen = HashSet::new();
        for code in C::iter() {
            let message = catalog.resolve(Some(&code.to_string()));
            assert_ne!(message, FALLBACK_MESSAGE, "{} code {code} has no message", C::DOMAIN);
            assert!(seen.insert(code), "{} code {code} listed twice", C::DOMAIN);
        }
        assert_eq!(C::TABLE.len(), seen.len(), "{} table has stray entries", C::DOMAIN);
    }

    #[test]
    fn every_code_has_a_message() {
        assert_complete::<CouponErrorCode>();
        assert_complete::<PlanErrorCode>();
        assert_complete::<ProductErrorCode>();
        assert_complete::<CreditErrorCode>();
        assert_complete::<ConsumerErrorCode>();
        assert_complete::<BusinessErrorCode>();
        assert_complete::<DeliveryErrorCode>();
        assert_complete::<SubscriptionErrorCode>();
    }
}
