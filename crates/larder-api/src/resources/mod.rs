//! Resource namespaces for the larder API.
//!
//! Every document aliases its root field to `result` and, for mutations, the wrapped entity to
//! `entity`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::tenant::TenantContext;

macro_rules! page_info_selection {
    () => {
        "pageInfo { hasNextPage hasPreviousPage startCursor endCursor }"
    };
}

mod business;
mod coupons;
mod customers;
mod delivery_rules;
mod locations;
mod orders;
mod plans;
mod products;
mod subscriptions;

pub use business::BusinessResource;
pub use coupons::{CouponRedemptionsQuery, CouponsQuery, CouponsResource};
pub use customers::{CustomersQuery, CustomersResource};
pub use delivery_rules::{DeliveryRulesQuery, DeliveryRulesResource};
pub use locations::{LocationsQuery, LocationsResource};
pub use orders::{OrdersQuery, OrdersResource};
pub use plans::{PlanSubscribersQuery, PlansQuery, PlansResource};
pub use products::{ProductsQuery, ProductsResource};
pub use subscriptions::{InvoicesQuery, SubscriptionsQuery, SubscriptionsResource};

/// Variables holding a single serialized value under `key`.
fn single<T: Serialize>(key: &str, value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    let mut vars = Map::new();
    vars.insert(key.to_owned(), serde_json::to_value(value)?);
    Ok(vars)
}

/// Mutation variables: the tenant scope plus `extra`.
fn scoped<const N: usize>(tenant: &TenantContext, extra: [(&str, Value); N]) -> Value {
    let mut vars = tenant.variables();
    for (key, value) in extra {
        vars.insert(key.to_owned(), value);
    }
    Value::Object(vars)
}
