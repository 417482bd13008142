//! Interactive onboarding wizard for first-time configuration.

use inquire::{Confirm, Password, Text, validator::Validation};
use larder::api::TenantContext;
use secrecy::SecretString;

use crate::app_config::{ApiConfig, Config};

/// Error type for onboarding wizard failures.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    /// An error occurred while prompting the user.
    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),
}

fn not_blank(label: &'static str) -> impl Fn(&str) -> Result<Validation, inquire::CustomUserError> + Clone {
    move |input: &str| {
        if input.trim().is_empty() {
            return Ok(Validation::Invalid(format!("{label} cannot be empty.").into()));
        }
        if input.contains(char::is_whitespace) {
            return Ok(Validation::Invalid(format!("{label} cannot contain spaces.").into()));
        }
        Ok(Validation::Valid)
    }
}

fn optional(input: String) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Runs the interactive onboarding wizard.
///
/// The returned config holds the real API key; it is only masked on serialization.
///
/// # Errors
///
/// Returns `OnboardingError::Prompt` on inquire errors.
pub fn run_wizard() -> Result<Config, OnboardingError> {
    println!("Welcome to larder! Let's connect to your business.\n");

    let defaults = ApiConfig::default();

    let api_key = Password::new("API key:")
        .with_help_message("Found under Settings > Developers in the merchant dashboard.")
        .with_validator(not_blank("API key"))
        .without_confirmation()
        .prompt()?;

    let business_id = Text::new("Business ID:")
        .with_help_message("e.g. 'biz_4f2a'")
        .with_validator(not_blank("Business ID"))
        .prompt()?;

    let location_id = Text::new("Default location ID (optional):")
        .with_help_message("Leave empty to act on every location.")
        .prompt()
        .map(optional)?;

    let base_url = if Confirm::new("Use a non-production API endpoint?")
        .with_default(false)
        .prompt()?
    {
        Text::new("API base URL:")
            .with_default(&defaults.base_url)
            .prompt()?
    } else {
        defaults.base_url.clone()
    };

    let mut tenant = TenantContext::new(business_id.trim());
    if let Some(location) = location_id {
        tenant = tenant.with_location(location);
    }

    Ok(Config {
        api: ApiConfig {
            base_url,
            api_key: SecretString::from(api_key),
            ..defaults
        },
        tenant,
    })
}
