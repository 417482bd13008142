//! Mapping of API error codes to messages an operator can act on.
//!
//! Every domain (coupons, plans, credit, ...) has its own code enum in `larder_api`. A single
//! generic [`ErrorCatalog`] resolves any of them, driven by the domain's [`DomainErrorCode`]
//! table.

use std::marker::PhantomData;
use std::str::FromStr;

use larder_api::LarderError;
use tracing::debug;

mod messages;

/// Shown for transport failures, unknown codes, and errors without a code.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// A family of error codes sharing one message table.
pub trait DomainErrorCode: Copy + Eq + FromStr + 'static {
    /// Short domain name, used in logs.
    const DOMAIN: &'static str;

    /// One message per known code.
    const TABLE: &'static [(Self, &'static str)];

    /// Parse a wire code such as `COUPON_NOT_FOUND`.
    fn parse(code: &str) -> Option<Self> {
        code.parse().ok()
    }
}

/// Resolves codes of domain `C` to messages.
#[derive(Debug, Clone, Copy)]
pub struct ErrorCatalog<C: DomainErrorCode> {
    fallback: &'static str,
    _domain: PhantomData<C>,
}

impl<C: DomainErrorCode> Default for ErrorCatalog<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DomainErrorCode> ErrorCatalog<C> {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_fallback(FALLBACK_MESSAGE)
    }

    #[must_use]
    pub const fn with_fallback(fallback: &'static str) -> Self {
        Self {
            fallback,
            _domain: PhantomData,
        }
    }

    /// The message for a parsed code.
    #[must_use]
    pub fn message(&self, code: C) -> &'static str {
        C::TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map_or(self.fallback, |(_, msg)| msg)
    }

    /// The message for a raw wire code. Missing and foreign codes get the fallback.
    #[must_use]
    pub fn resolve(&self, code: Option<&str>) -> &'static str {
        match code.map(|raw| (raw, C::parse(raw))) {
            Some((_, Some(parsed))) => self.message(parsed),
            Some((raw, None)) => {
                debug!(domain = C::DOMAIN, code = raw, "unmapped error code");
                self.fallback
            }
            None => self.fallback,
        }
    }

    /// The message for a failed call.
    #[must_use]
    pub fn describe(&self, err: &LarderError) -> &'static str {
        self.resolve(err.code())
    }
}

/// [`ErrorCatalog::describe`] with the default fallback.
#[must_use]
pub fn describe<C: DomainErrorCode>(err: &LarderError) -> &'static str {
    ErrorCatalog::<C>::new().describe(err)
}
