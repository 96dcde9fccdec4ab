//! Client configuration.
//!
//! Configuration is resolved once at process startup and passed into
//! [`crate::SmartClient::ready`]. Nothing in this crate reads environment
//! variables mid-flight.

use crate::{ClientError, ClientResult};

/// Default scope requested during the client-credentials grant.
pub const DEFAULT_SCOPE: &str = "system/*.read";

/// Connection and authorization settings for a clinical resource server.
#[derive(Clone, Debug)]
pub struct SmartConfig {
    base_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
    token_url: Option<String>,
}

impl SmartConfig {
    /// Create a new `SmartConfig`.
    ///
    /// A trailing `/` on `base_url` is trimmed so queries can always be joined
    /// with a single separator.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] if `base_url` or `client_id` is
    /// empty.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> ClientResult<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.trim().is_empty() {
            return Err(ClientError::InvalidConfig("base_url cannot be empty".into()));
        }

        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "client_id cannot be empty".into(),
            ));
        }

        Ok(Self {
            base_url,
            client_id,
            client_secret: client_secret.into(),
            scope: DEFAULT_SCOPE.to_string(),
            token_url: None,
        })
    }

    /// Override the requested scope.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Skip token endpoint discovery and use this URL directly.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = Some(token_url.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn token_url(&self) -> Option<&str> {
        self.token_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let config = SmartConfig::new("https://fhir.example.org/r4/", "demo-app", "secret")
            .expect("valid config");
        assert_eq!(config.base_url(), "https://fhir.example.org/r4");
    }

    #[test]
    fn rejects_empty_base_url() {
        let err = SmartConfig::new("", "demo-app", "secret").expect_err("should reject");
        match err {
            ClientError::InvalidConfig(msg) => assert!(msg.contains("base_url")),
            other => panic!("expected InvalidConfig error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_client_id() {
        let err =
            SmartConfig::new("https://fhir.example.org/r4", "", "secret").expect_err("reject");
        match err {
            ClientError::InvalidConfig(msg) => assert!(msg.contains("client_id")),
            other => panic!("expected InvalidConfig error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_scope_and_allows_overrides() {
        let config = SmartConfig::new("https://fhir.example.org/r4", "demo-app", "secret")
            .expect("valid config")
            .with_scope("system/Observation.read")
            .with_token_url("https://auth.example.org/token");

        assert_eq!(config.scope(), "system/Observation.read");
        assert_eq!(config.token_url(), Some("https://auth.example.org/token"));
    }
}
