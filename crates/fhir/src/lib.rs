//! FHIR wire/boundary support for the Discharge Demo Viewer.
//!
//! This crate provides **wire models** and **translation helpers** for the FHIR
//! JSON resources the viewer reads back from a clinical resource server:
//! - search result bundles
//! - `Observation` resources carrying discharge-summary text
//! - `Patient` resources for the detail pane
//!
//! This crate focuses on:
//! - decoding server JSON into narrow domain views (only the fields the viewer uses)
//! - FHIR semantic alignment (subject references, resourceType discrimination)
//!
//! Unlike an on-disk record store, server JSON is open-world: resources routinely
//! carry fields this viewer never reads, so the inbound wire structs here do NOT
//! use `deny_unknown_fields`. Strictness is limited to the fields we depend on,
//! with `serde_path_to_error` surfacing the failing path on a schema mismatch.

pub mod bundle;
pub mod observation;
pub mod patient;

// Re-export facades
pub use bundle::Bundle;
pub use observation::Observation;
pub use patient::{Patient, PatientSummary};

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
