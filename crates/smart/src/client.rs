//! SMART-style authorized client.
//!
//! [`SmartClient::ready`] runs the authorization handshake once:
//!
//! 1. discover the token endpoint from the server's
//!    `.well-known/smart-configuration` document (skipped when the config
//!    names a token URL directly), then
//! 2. obtain a bearer token via an OAuth2 client-credentials grant.
//!
//! After `ready` resolves, [`SmartClient`] satisfies [`DataSource`] by
//! attaching the token to plain FHIR JSON GETs. Tokens are not refreshed; a
//! demo session is far shorter than any sane token lifetime.

use crate::{ClientError, ClientResult, DataSource, SmartConfig};
use serde::Deserialize;
use serde_json::Value;

const SMART_CONFIGURATION_PATH: &str = ".well-known/smart-configuration";
const FHIR_JSON: &str = "application/fhir+json";

/// Token endpoint response, per RFC 6749 §5.1. Only the token itself matters.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// An authorized clinical data client.
#[derive(Clone, Debug)]
pub struct SmartClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl SmartClient {
    /// Complete the authorization handshake and return a ready client.
    ///
    /// # Arguments
    ///
    /// * `config` - Server and credential settings resolved at startup.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the discovery document cannot be fetched or
    /// lacks a token endpoint, or if the token request is refused.
    pub async fn ready(config: &SmartConfig) -> ClientResult<Self> {
        let http = reqwest::Client::new();

        let token_url = match config.token_url() {
            Some(url) => url.to_string(),
            None => discover_token_endpoint(&http, config.base_url()).await?,
        };

        let access_token = fetch_token(&http, &token_url, config).await?;
        tracing::info!(base_url = config.base_url(), "authorization handshake complete");

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            access_token,
        })
    }
}

impl DataSource for SmartClient {
    async fn request(&self, query: &str) -> ClientResult<Value> {
        let url = format!("{}/{}", self.base_url, query.trim_start_matches('/'));
        tracing::debug!(%url, "issuing FHIR request");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, FHIR_JSON)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                query: query.to_string(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Read the token endpoint out of the server's SMART configuration document.
async fn discover_token_endpoint(http: &reqwest::Client, base_url: &str) -> ClientResult<String> {
    let url = format!("{base_url}/{SMART_CONFIGURATION_PATH}");

    let response = http.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Discovery(format!(
            "'{url}' returned status {status}"
        )));
    }

    let document = response.json::<Value>().await?;
    document
        .get("token_endpoint")
        .and_then(Value::as_str)
        .filter(|endpoint| !endpoint.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ClientError::Discovery(format!("'{url}' has no token_endpoint field"))
        })
}

/// Exchange client credentials for a bearer token.
async fn fetch_token(
    http: &reqwest::Client,
    token_url: &str,
    config: &SmartConfig,
) -> ClientResult<String> {
    let response = http
        .post(token_url)
        .basic_auth(config.client_id(), Some(config.client_secret()))
        .form(&[
            ("grant_type", "client_credentials"),
            ("scope", config.scope()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Token(format!(
            "'{token_url}' returned status {status}"
        )));
    }

    let token = response
        .json::<TokenResponse>()
        .await
        .map_err(|err| ClientError::Token(format!("malformed token response: {err}")))?;

    Ok(token.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_parses_and_ignores_extras() {
        let token: TokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": "abc123",
            "token_type": "bearer",
            "expires_in": 300,
            "scope": "system/*.read"
        }))
        .expect("parse token response");
        assert_eq!(token.access_token, "abc123");
    }

    #[test]
    fn status_error_names_the_query() {
        let err = ClientError::Status {
            status: 404,
            query: "Patient/demo-000001".into(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("Patient/demo-000001"));
    }
}
