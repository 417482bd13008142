//! Run a larder meal-subscription business from the terminal.
use std::path::PathBuf;

use clap::Parser;
use larder::session::AdminSession;
use tracing::{debug, error};

mod app_config;
mod cli;
mod onboarding;
mod term;
mod trc;

use crate::app_config::Config;
use crate::cli::{CliError, Command};
use crate::trc::Trc;

#[cfg(feature = "reqwest-client")]
type Backend = larder::api::backends::ReqwestClient;

#[cfg(all(feature = "ureq-client", not(feature = "reqwest-client")))]
type Backend = larder::api::backends::UreqClient;

#[cfg(not(any(feature = "reqwest-client", feature = "ureq-client")))]
compile_error!("enable one of the `reqwest-client` or `ureq-client` features");

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")");

#[derive(Parser)]
#[command(
    version = VERSION,
    about = "Merchant admin for larder meal-subscription businesses."
)]
struct Args {
    #[arg(
        short,
        long,
        value_parser,
        help = "Optional path to a larder config TOML."
    )]
    config_path: Option<PathBuf>,

    /// Act on a single location instead of the configured scope.
    #[arg(long, global = true)]
    location: Option<String>,

    /// More log output. Repeat for trace logs.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Main entry point for the application.
fn main() {
    let args = Args::parse();

    // Errors use eprintln since tracing isn't initialized yet.
    if let Err(e) = Trc::default().with_verbosity(args.verbose).init() {
        eprintln!(
            "Failed to initialize logging. Without logging, we can't provide any useful error \
             messages, so we have to exit: {e}"
        );
        std::process::exit(1);
    }

    let config = match Config::load_or_create(args.config_path.as_deref()) {
        Ok(config) => config,
        Err(app_config::ConfigError::ValidationErrors(messages)) => {
            error!("Configuration is invalid.");
            for msg in &messages {
                error!(" - {msg}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let mut tenant = config.tenant.clone();
    if let Some(location) = args.location {
        tenant = tenant.with_location(location);
    }
    debug!(tenant = ?tenant, base_url = %config.api.base_url, "starting session");

    let http = Backend::new(std::time::Duration::from_secs(config.api.timeout_secs));
    let session = AdminSession::new(config.client_builder().build_with(http), tenant);
    colored::control::set_override(term::should_use_color(&std::io::stdout()));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create Tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(cli::run(args.command, &session)) {
        match &e {
            CliError::Api { source, .. } => {
                debug!(error = %source, code = ?source.code(), "request failed");
            }
            CliError::Refused(_) | CliError::Prompt(_) => {}
        }
        error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;
    use larder::api::models::CustomerStatus;

    use super::*;
    use crate::cli::{CustomersCmd, OrdersCmd, ProductsCmd};

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn list_filters_parse_into_domain_types() {
        let args = Args::try_parse_from([
            "larder", "customers", "list", "--status", "blocked", "--all",
        ])
        .unwrap();
        match args.command {
            Command::Customers {
                action: CustomersCmd::List { status, listing, .. },
            } => {
                assert_eq!(status, Some(CustomerStatus::Blocked));
                assert!(listing.all);
            }
            _ => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn tag_flags_repeat() {
        let args = Args::try_parse_from([
            "larder", "--location", "loc_1", "products", "tags", "prod_1", "--add", "vegan",
            "--add", "spicy", "--remove", "mild",
        ])
        .unwrap();
        assert_eq!(args.location.as_deref(), Some("loc_1"));
        match args.command {
            Command::Products {
                action: ProductsCmd::Tags { id, add, remove },
            } => {
                assert_eq!(id, "prod_1");
                assert_eq!(add, ["vegan", "spicy"]);
                assert_eq!(remove, ["mild"]);
            }
            _ => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn order_location_filter_is_separate_from_tenant_location() {
        let args = Args::try_parse_from([
            "larder", "--location", "loc_1", "orders", "list", "--fulfilled-at", "loc_9",
        ])
        .unwrap();
        assert_eq!(args.location.as_deref(), Some("loc_1"));
        match args.command {
            Command::Orders {
                action: OrdersCmd::List { location, .. },
            } => assert_eq!(location.as_deref(), Some("loc_9")),
            _ => panic!("parsed the wrong command"),
        }

        let args =
            Args::try_parse_from(["larder", "orders", "list", "--fulfilled-at", "loc_9"]).unwrap();
        assert_eq!(args.location, None);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(Args::try_parse_from(["larder", "orders", "list", "--status", "lost"]).is_err());
    }
}
