//! # DDV Core
//!
//! Core flow logic for the Discharge Demo Viewer:
//! - demo-case discovery (matching server observations against the answer key)
//! - case selection and the per-case patient detail fetch
//! - answer reveal formatting
//! - the display surface contract the binaries render through
//!
//! **No transport concerns**: the authorization handshake and HTTP live behind
//! the `smart-client` crate's `DataSource` trait; this crate only consumes it.

pub mod config;
pub mod discovery;
pub mod preview;
pub mod reveal;
pub mod session;
pub mod surface;

pub use config::AppConfig;
pub use discovery::{discover, latest_observation, DemoCase};
pub use reveal::reveal;
pub use session::{SelectionState, SessionContext};
pub use surface::{Surface, TerminalSurface};

/// Errors from core operations against the clinical data source.
///
/// Whether a failure is fatal or recovered is decided by the caller, not the
/// error type: a failed discovery search ends the flow, while a failed patient
/// detail fetch only degrades one display region.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("clinical data request failed: {0}")]
    Client(#[from] smart_client::ClientError),

    #[error("malformed server resource: {0}")]
    Fhir(#[from] fhir::FhirError),
}

/// Type alias for Results that can fail with a [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
