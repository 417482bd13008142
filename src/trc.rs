//! Tracing configuration and initialization.

use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{
    EnvFilter,
    fmt::format::FmtSpan,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

use crate::term;

/// Env filter checked before `RUST_LOG`.
const LOG_ENV: &str = "LARDER_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrcMode {
    /// Compact output with spinners for in-flight requests.
    Pretty,
    /// Plain fmt output with span enter/close events.
    Ugly,
}

pub struct Trc {
    mode: TrcMode,
    env_filter: EnvFilter,
}

impl Default for Trc {
    fn default() -> Self {
        let maybe_env_filter =
            EnvFilter::try_from_env(LOG_ENV).or_else(|_| EnvFilter::try_from_default_env());

        match maybe_env_filter {
            // An explicit filter means someone is debugging; skip the spinners.
            Ok(env_filter) => Self {
                mode: TrcMode::Ugly,
                env_filter,
            },
            Err(_) => Self {
                mode: TrcMode::Pretty,
                env_filter: EnvFilter::new("warn,larder=info,larder_api=info"),
            },
        }
    }
}

impl Trc {
    /// Raise the default filter for `-v` flags. Ignored when an env filter is set.
    #[must_use]
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        if self.mode == TrcMode::Pretty && verbose > 0 {
            let level = if verbose == 1 { "debug" } else { "trace" };
            self.env_filter = EnvFilter::new(format!("warn,larder={level},larder_api={level}"));
        }
        self
    }

    pub fn init(self) -> Result<(), TryInitError> {
        match self.mode {
            TrcMode::Ugly => self.init_ugly_mode(),
            TrcMode::Pretty => self.init_pretty_mode(),
        }
    }

    fn init_ugly_mode(self) -> Result<(), TryInitError> {
        tracing_subscriber::fmt()
            .with_env_filter(self.env_filter)
            .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .with_ansi(term::should_use_color(&std::io::stderr()))
            .finish()
            .try_init()
    }

    fn init_pretty_mode(self) -> Result<(), TryInitError> {
        let indicatif_layer = IndicatifLayer::new();
        tracing_subscriber::registry()
            .with(self.env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(indicatif_layer.get_stderr_writer())
                    .with_ansi(term::should_use_color(&std::io::stderr()))
                    .with_target(false)
                    .without_time()
                    .compact(),
            )
            .with(indicatif_layer)
            .try_init()
    }
}
