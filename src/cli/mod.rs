//! Subcommands and their dispatch onto an [`AdminSession`].

mod browse;
pub mod table;

use std::slice;

use clap::{Args, Subcommand};
use colored::Colorize as _;
use larder::api::models::{
    CouponFilter, CustomerFilter, CustomerStatus, DateRange, IssueCreditInput, OrderFilter,
    OrderStatus, PlanFilter, ProductFilter, SubscriptionFilter, SubscriptionStatus,
};
use larder::api::resources::{
    CouponRedemptionsQuery, CouponsQuery, CustomersQuery, DeliveryRulesQuery, InvoicesQuery,
    LocationsQuery, OrdersQuery, PlanSubscribersQuery, PlansQuery, ProductsQuery,
    SubscriptionsQuery,
};
use larder::api::{
    BusinessErrorCode, ConnectionQuery, ConsumerErrorCode, CouponErrorCode, CreditErrorCode,
    DeliveryErrorCode, HttpClient, LarderError, PlanErrorCode, ProductErrorCode,
    SubscriptionErrorCode,
};
use larder::errors::{DomainErrorCode, describe};
use larder::one_shot::{OneShotError, RunError};
use larder::selection::Selection;
use larder::session::AdminSession;
use thiserror::Error;
use tracing::info;

use self::table::{Tabular, render};

#[derive(Debug, Error)]
pub enum CliError {
    /// An API failure, carrying the operator-facing message for its domain.
    #[error("{message}")]
    Api {
        message: &'static str,
        #[source]
        source: LarderError,
    },

    #[error("Refused: {0}")]
    Refused(OneShotError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),
}

impl CliError {
    fn api<C: DomainErrorCode>(source: LarderError) -> Self {
        Self::Api {
            message: describe::<C>(&source),
            source,
        }
    }
}

/// Flags shared by every list command.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct Listing {
    /// Print every page at once instead of paging interactively.
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Customers of the business.
    Customers {
        #[command(subcommand)]
        action: CustomersCmd,
    },

    /// Orders placed with the business.
    Orders {
        #[command(subcommand)]
        action: OrdersCmd,
    },

    /// Recurring meal subscriptions.
    Subscriptions {
        #[command(subcommand)]
        action: SubscriptionsCmd,
    },

    /// Discount coupons.
    Coupons {
        #[command(subcommand)]
        action: CouponsCmd,
    },

    /// Meal plans customers subscribe to.
    Plans {
        #[command(subcommand)]
        action: PlansCmd,
    },

    /// Products on the menu.
    Products {
        #[command(subcommand)]
        action: ProductsCmd,
    },

    /// Pickup and delivery locations.
    Locations {
        #[command(subcommand)]
        action: LocationsCmd,
    },

    /// Delivery rules of a location.
    DeliveryRules {
        #[command(subcommand)]
        action: DeliveryRulesCmd,
    },

    /// The business account.
    Business {
        #[command(subcommand)]
        action: BusinessCmd,
    },
}

#[derive(Debug, Subcommand)]
pub enum CustomersCmd {
    List {
        /// Match against name or email.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<CustomerStatus>,
        #[command(flatten)]
        listing: Listing,
    },

    /// Add store credit to a customer.
    Credit {
        id: String,
        amount_cents: i64,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum OrdersCmd {
    List {
        #[arg(long)]
        status: Option<OrderStatus>,
        /// First fulfillment date, `YYYY-MM-DD`.
        #[arg(long)]
        from: Option<String>,
        /// Last fulfillment date, `YYYY-MM-DD`.
        #[arg(long)]
        to: Option<String>,
        /// Only orders fulfilled at this location.
        #[arg(long = "fulfilled-at", value_name = "LOCATION")]
        location: Option<String>,
        #[command(flatten)]
        listing: Listing,
    },
}

#[derive(Debug, Subcommand)]
pub enum SubscriptionsCmd {
    List {
        #[arg(long)]
        status: Option<SubscriptionStatus>,
        #[arg(long)]
        plan: Option<String>,
        #[command(flatten)]
        listing: Listing,
    },

    /// Billing history of one subscription.
    Invoices {
        id: String,
        #[command(flatten)]
        listing: Listing,
    },

    Pause { id: String },

    Resume { id: String },

    Cancel { id: String },
}

#[derive(Debug, Subcommand)]
pub enum CouponsCmd {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        include_archived: bool,
        #[command(flatten)]
        listing: Listing,
    },

    /// Orders that redeemed a coupon.
    History {
        id: String,
        #[command(flatten)]
        listing: Listing,
    },

    Archive { id: String },
}

#[derive(Debug, Subcommand)]
pub enum PlansCmd {
    List {
        #[arg(long)]
        include_archived: bool,
        #[command(flatten)]
        listing: Listing,
    },

    /// Customers subscribed to a plan.
    Subscribers {
        id: String,
        #[command(flatten)]
        listing: Listing,
    },

    Archive { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ProductsCmd {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        include_archived: bool,
        #[command(flatten)]
        listing: Listing,
    },

    Archive { id: String },

    /// Add or remove product tags in a single write.
    Tags {
        id: String,
        #[arg(long = "add", value_name = "TAG")]
        add: Vec<String>,
        #[arg(long = "remove", value_name = "TAG")]
        remove: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum LocationsCmd {
    List {
        #[command(flatten)]
        listing: Listing,
    },
}

#[derive(Debug, Subcommand)]
pub enum DeliveryRulesCmd {
    List {
        location: String,
        #[command(flatten)]
        listing: Listing,
    },

    Archive { id: String },
}

#[derive(Debug, Subcommand)]
pub enum BusinessCmd {
    Show,

    /// Link the payout account once onboarding with the payment provider is done.
    FinalizePayouts,
}

/// Run one command. `E` picks the message table for list failures.
async fn list<C, Q, E>(
    session: &AdminSession<C>,
    query: Q,
    listing: Listing,
) -> Result<(), CliError>
where
    C: HttpClient,
    Q: ConnectionQuery,
    Q::Node: Tabular,
    E: DomainErrorCode,
{
    if listing.all {
        browse::dump::<C, Q, E>(session, query).await
    } else {
        browse::browse::<C, Q, E>(session.pager(query)).await
    }
}

fn print_one<T: Tabular>(entity: &T) {
    print!("{}", render(slice::from_ref(entity)));
}

pub async fn run<C: HttpClient>(
    command: Command,
    session: &AdminSession<C>,
) -> Result<(), CliError> {
    let client = session.client();
    let tenant = session.tenant();

    match command {
        Command::Customers { action } => match action {
            CustomersCmd::List {
                search,
                status,
                listing,
            } => {
                let filter = CustomerFilter { search, status };
                list::<_, _, ConsumerErrorCode>(session, CustomersQuery { filter }, listing)
                    .await
            }
            CustomersCmd::Credit {
                id,
                amount_cents,
                reason,
            } => {
                let input = IssueCreditInput {
                    amount_cents,
                    reason,
                };
                let customer = client
                    .customers()
                    .issue_credit(tenant, &id, &input)
                    .await
                    .map_err(CliError::api::<CreditErrorCode>)?;
                info!(customer = %customer.id, amount = amount_cents, "issued credit");
                print_one(&customer);
                Ok(())
            }
        },

        Command::Orders { action } => match action {
            OrdersCmd::List {
                status,
                from,
                to,
                location,
                listing,
            } => {
                let filter = OrderFilter {
                    status,
                    fulfillment: DateRange { from, to },
                    location_id: location,
                };
                list::<_, _, BusinessErrorCode>(session, OrdersQuery { filter }, listing)
                    .await
            }
        },

        Command::Subscriptions { action } => match action {
            SubscriptionsCmd::List {
                status,
                plan,
                listing,
            } => {
                let filter = SubscriptionFilter {
                    status,
                    plan_id: plan,
                };
                let query = SubscriptionsQuery { filter };
                list::<_, _, SubscriptionErrorCode>(session, query, listing).await
            }
            SubscriptionsCmd::Invoices { id, listing } => {
                let query = InvoicesQuery {
                    subscription_id: id,
                };
                list::<_, _, SubscriptionErrorCode>(session, query, listing).await
            }
            SubscriptionsCmd::Pause { id } => {
                let sub = client.subscriptions().pause(tenant, &id).await;
                let sub = sub.map_err(CliError::api::<SubscriptionErrorCode>)?;
                print_one(&sub);
                Ok(())
            }
            SubscriptionsCmd::Resume { id } => {
                let sub = client.subscriptions().resume(tenant, &id).await;
                let sub = sub.map_err(CliError::api::<SubscriptionErrorCode>)?;
                print_one(&sub);
                Ok(())
            }
            SubscriptionsCmd::Cancel { id } => {
                let sub = client.subscriptions().cancel(tenant, &id).await;
                let sub = sub.map_err(CliError::api::<SubscriptionErrorCode>)?;
                print_one(&sub);
                Ok(())
            }
        },

        Command::Coupons { action } => match action {
            CouponsCmd::List {
                search,
                include_archived,
                listing,
            } => {
                let filter = CouponFilter {
                    search,
                    include_archived,
                };
                list::<_, _, CouponErrorCode>(session, CouponsQuery { filter }, listing)
                    .await
            }
            CouponsCmd::History { id, listing } => {
                let query = CouponRedemptionsQuery { coupon_id: id };
                list::<_, _, CouponErrorCode>(session, query, listing).await
            }
            CouponsCmd::Archive { id } => {
                let archived = client.coupons().archive(tenant, &id).await;
                let archived = archived.map_err(CliError::api::<CouponErrorCode>)?;
                println!("Archived coupon {}.", archived.id);
                Ok(())
            }
        },

        Command::Plans { action } => match action {
            PlansCmd::List {
                include_archived,
                listing,
            } => {
                let filter = PlanFilter { include_archived };
                list::<_, _, PlanErrorCode>(session, PlansQuery { filter }, listing).await
            }
            PlansCmd::Subscribers { id, listing } => {
                let query = PlanSubscribersQuery { plan_id: id };
                list::<_, _, PlanErrorCode>(session, query, listing).await
            }
            PlansCmd::Archive { id } => {
                let archived = client.plans().archive(tenant, &id).await;
                let archived = archived.map_err(CliError::api::<PlanErrorCode>)?;
                println!("Archived plan {}.", archived.id);
                Ok(())
            }
        },

        Command::Products { action } => match action {
            ProductsCmd::List {
                search,
                tag,
                include_archived,
                listing,
            } => {
                let filter = ProductFilter {
                    search,
                    tag,
                    include_archived,
                };
                list::<_, _, ProductErrorCode>(session, ProductsQuery { filter }, listing)
                    .await
            }
            ProductsCmd::Archive { id } => {
                let archived = client.products().archive(tenant, &id).await;
                let archived = archived.map_err(CliError::api::<ProductErrorCode>)?;
                println!("Archived product {}.", archived.id);
                Ok(())
            }
            ProductsCmd::Tags { id, add, remove } => {
                edit_tags(session, &id, &add, &remove).await
            }
        },

        Command::Locations { action } => match action {
            LocationsCmd::List { listing } => {
                list::<_, _, BusinessErrorCode>(session, LocationsQuery, listing).await
            }
        },

        Command::DeliveryRules { action } => match action {
            DeliveryRulesCmd::List { location, listing } => {
                let query = DeliveryRulesQuery {
                    location_id: location,
                };
                list::<_, _, DeliveryErrorCode>(session, query, listing).await
            }
            DeliveryRulesCmd::Archive { id } => {
                let archived = client.delivery_rules().archive(tenant, &id).await;
                let archived = archived.map_err(CliError::api::<DeliveryErrorCode>)?;
                println!("Archived delivery rule {}.", archived.id);
                Ok(())
            }
        },

        Command::Business { action } => match action {
            BusinessCmd::Show => {
                let business = client.business().get(tenant).await;
                let business = business.map_err(CliError::api::<BusinessErrorCode>)?;
                let support = business.support_email.as_deref().unwrap_or("-");
                println!("{}", business.name.bold());
                println!("  id        {}", business.id);
                println!("  currency  {}", business.currency);
                println!("  timezone  {}", business.timezone);
                println!("  support   {support}");
                println!("  payouts   {}", if business.payouts_enabled { "enabled" } else { "not set up" });
                Ok(())
            }
            BusinessCmd::FinalizePayouts => {
                let account = session.finalize_payouts().await.map_err(|err| match err {
                    RunError::Refused(refused) => CliError::Refused(refused),
                    RunError::Failed(api) => CliError::api::<BusinessErrorCode>(api),
                })?;
                println!("Payout account {} linked.", account.id);
                if let Some(url) = &account.dashboard_url {
                    println!("  dashboard  {url}");
                }
                Ok(())
            }
        },
    }
}

/// Fetch the product's tags, apply `add` and `remove` locally, then push the difference.
async fn edit_tags<C: HttpClient>(
    session: &AdminSession<C>,
    product_id: &str,
    add: &[String],
    remove: &[String],
) -> Result<(), CliError> {
    let product = session
        .client()
        .products()
        .get(session.tenant(), product_id)
        .await
        .map_err(CliError::api::<ProductErrorCode>)?;

    let mut tags = Selection::new(product.tags);
    for tag in add {
        tags.select(tag.clone());
    }
    for tag in remove {
        tags.deselect(tag);
    }

    let diff = tags.diff();
    for tag in &diff.added {
        println!("{}", format!("+ {tag}").dimmed());
    }
    for tag in &diff.removed {
        println!("{}", format!("- {tag}").dimmed());
    }

    match session
        .apply_product_tags(product_id, &mut tags)
        .await
        .map_err(CliError::api::<ProductErrorCode>)?
    {
        Some(updated) => print_one(&updated),
        None => println!("Tags unchanged."),
    }
    Ok(())
}
