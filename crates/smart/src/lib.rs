//! Authorization-and-fetch client for a clinical resource server.
//!
//! The rest of the workspace talks to the server through one narrow contract,
//! the [`DataSource`] trait: hand over a search/read query, get back the
//! decoded JSON or a failure. This crate also ships the one conforming
//! implementation, [`SmartClient`], whose `ready` constructor performs a
//! SMART-style authorization handshake (token endpoint discovery followed by
//! an OAuth2 client-credentials grant).
//!
//! Everything about the handshake beyond "ready resolves or it fails" is an
//! implementation detail of this crate; consumers never see tokens or HTTP.

pub mod client;
pub mod config;

// Re-export facades
pub use client::SmartClient;
pub use config::SmartConfig;

use serde_json::Value;

/// Errors returned by the clinical data client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("authorization metadata discovery failed: {0}")]
    Discovery(String),

    #[error("token request failed: {0}")]
    Token(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned status {status} for '{query}'")]
    Status { status: u16, query: String },
}

/// Type alias for Results that can fail with a [`ClientError`].
pub type ClientResult<T> = Result<T, ClientError>;

/// A source of clinical data reachable by query string.
///
/// `query` is a FHIR search or read path relative to the server base, for
/// example `Patient/demo-000001` or
/// `Observation?code=11506-3&_sort=-_lastUpdated&_count=200`.
///
/// Implementations resolve with the decoded JSON body or fail; they impose no
/// retry or timeout policy of their own beyond what the transport enforces.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    /// Execute one search or read against the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be sent, the server
    /// answers with a non-success status, or the body is not valid JSON.
    async fn request(&self, query: &str) -> ClientResult<Value>;
}
