//! Request and response types for the larder API.

mod business;
mod common;
mod coupons;
mod customers;
mod locations;
mod orders;
mod pagination;
mod plans;
mod products;
mod subscriptions;

pub use business::{Business, BusinessSettingsInput, PayoutAccount};
pub use common::{Archived, Cents, DateRange};
pub use coupons::{Coupon, CouponFilter, CouponInput, CouponRedemption, DiscountKind};
pub use customers::{Customer, CustomerFilter, CustomerStatus, IssueCreditInput, UpdateCustomerInput};
pub use locations::{DeliveryRule, DeliveryRuleInput, Location, LocationInput, Weekday};
pub use orders::{Order, OrderFilter, OrderStatus};
pub use pagination::{Connection, Edge, PageArgs, PageInfo};
pub use plans::{BillingInterval, Plan, PlanFilter, PlanInput, PlanSubscriber};
pub use products::{Product, ProductFilter, ProductInput, TagChanges};
pub use subscriptions::{Invoice, InvoiceStatus, Subscription, SubscriptionFilter, SubscriptionStatus};
