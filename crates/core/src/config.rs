//! Application configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! flow as an explicit value. Nothing below the binaries reads process-wide
//! environment variables during request handling.

use smart_client::{ClientError, SmartConfig};
use std::path::PathBuf;

/// Default path of the static answer key file.
pub const DEFAULT_ANSWERS_PATH: &str = "demo_icd_answers.json";

/// Errors resolving the application configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Startup configuration for both viewer binaries.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Clinical server connection and credentials.
    pub smart: SmartConfig,

    /// Path of the static answer key file.
    pub answers_path: PathBuf,

    /// Patient id for the single-patient flow; the browse flow ignores it.
    pub patient_id: Option<String>,
}

impl AppConfig {
    /// Resolve the configuration from process environment variables.
    ///
    /// # Environment Variables
    /// - `DDV_FHIR_BASE_URL`: clinical server base URL (required)
    /// - `DDV_CLIENT_ID`: OAuth2 client id (required)
    /// - `DDV_CLIENT_SECRET`: OAuth2 client secret (default: empty)
    /// - `DDV_SCOPE`: requested scope (default: `system/*.read`)
    /// - `DDV_TOKEN_URL`: token endpoint, skipping discovery (optional)
    /// - `DDV_ANSWERS_PATH`: answer key file (default: `demo_icd_answers.json`)
    /// - `DDV_PATIENT_ID`: patient id for the single-patient flow (optional)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or the
    /// client settings are invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the configuration from an arbitrary variable lookup.
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url =
            var("DDV_FHIR_BASE_URL").ok_or(ConfigError::MissingVar("DDV_FHIR_BASE_URL"))?;
        let client_id = var("DDV_CLIENT_ID").ok_or(ConfigError::MissingVar("DDV_CLIENT_ID"))?;
        let client_secret = var("DDV_CLIENT_SECRET").unwrap_or_default();

        let mut smart = SmartConfig::new(base_url, client_id, client_secret)?;
        if let Some(scope) = var("DDV_SCOPE") {
            smart = smart.with_scope(scope);
        }
        if let Some(token_url) = var("DDV_TOKEN_URL") {
            smart = smart.with_token_url(token_url);
        }

        let answers_path = var("DDV_ANSWERS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ANSWERS_PATH));

        Ok(Self {
            smart,
            answers_path,
            patient_id: var("DDV_PATIENT_ID"),
        })
    }
}
