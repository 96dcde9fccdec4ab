//! FHIR-aligned patient wire model and translation helpers.
//!
//! This module provides both a domain-level summary type and a wire model for
//! patient resources fetched from the server.
//!
//! Responsibilities:
//! - Define a tolerant wire model for server JSON deserialisation
//! - Provide translation from the wire model to a flat display summary
//! - Validate resourceType and report the failing path on schema mismatch
//!
//! Notes:
//! - The wire format supports multiple names and identifiers; the flat summary
//!   extracts the first of each, matching what the detail pane shows.

use crate::{FhirError, FhirResult};
use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Flat display summary of a patient resource.
///
/// Every field except `id` is optional; the display layer substitutes a
/// placeholder for absent values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientSummary {
    /// FHIR resource id.
    pub id: String,

    /// Display name: the first name's `text`, or given names + family joined.
    pub name: Option<String>,

    /// Administrative gender code as the server sent it.
    pub gender: Option<String>,

    /// Date of birth (ISO 8601 date format: YYYY-MM-DD).
    pub birth_date: Option<String>,

    /// First identifier value, used by the demo sandbox as a test id.
    pub identifier: Option<String>,
}

// ============================================================================
// Public Patient operations
// ============================================================================

/// Patient resource operations.
///
/// This is a zero-sized type used for namespacing patient-related operations.
/// All methods are associated functions.
pub struct Patient;

impl Patient {
    /// Parse a patient resource from a JSON value into a display summary.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort "path" (e.g.
    /// `name.0.given`) to the failing field when the JSON does not match the
    /// wire schema.
    ///
    /// # Arguments
    ///
    /// * `value` - JSON value expected to represent a patient resource.
    ///
    /// # Returns
    ///
    /// Returns a [`PatientSummary`] with the display fields extracted from the
    /// resource.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if:
    /// - the JSON does not decode against the wire schema,
    /// - `id` is missing, or
    /// - resourceType is not "Patient".
    pub fn parse(value: &Value) -> FhirResult<PatientSummary> {
        let wire = match serde_path_to_error::deserialize::<_, PatientWire>(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(FhirError::Translation(format!(
                    "Patient schema mismatch at {path}: {source}"
                )));
            }
        };

        if wire.resource_type != "Patient" {
            return Err(FhirError::InvalidInput(format!(
                "Expected resourceType 'Patient', got '{}'",
                wire.resource_type
            )));
        }

        wire_to_summary(wire)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Wire representation of a patient resource as received from the server.
///
/// Server resources are open-world; unknown fields are ignored rather than
/// rejected.
#[derive(Clone, Debug, Deserialize)]
struct PatientWire {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    pub id: Option<String>,

    #[serde(default)]
    pub name: Vec<HumanNameWire>,

    pub gender: Option<String>,

    #[serde(rename = "birthDate")]
    pub birth_date: Option<String>,

    #[serde(default)]
    pub identifier: Vec<IdentifierWire>,
}

/// Wire representation of a human name.
#[derive(Clone, Debug, Deserialize)]
struct HumanNameWire {
    pub text: Option<String>,

    pub family: Option<String>,

    #[serde(default)]
    pub given: Vec<String>,
}

/// Wire representation of an identifier.
#[derive(Clone, Debug, Deserialize)]
struct IdentifierWire {
    pub value: Option<String>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

/// Convert wire format to the flat display summary.
fn wire_to_summary(wire: PatientWire) -> FhirResult<PatientSummary> {
    let id = wire
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| FhirError::Translation("Patient resource has no id".into()))?;

    let name = wire.name.first().and_then(display_name);
    let identifier = wire
        .identifier
        .first()
        .and_then(|i| i.value.clone())
        .filter(|v| !v.is_empty());

    Ok(PatientSummary {
        id,
        name,
        gender: wire.gender.filter(|g| !g.is_empty()),
        birth_date: wire.birth_date.filter(|b| !b.is_empty()),
        identifier,
    })
}

/// Prefer the name's `text`; otherwise assemble "given... family".
fn display_name(name: &HumanNameWire) -> Option<String> {
    if let Some(text) = name.text.as_deref() {
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    let mut parts: Vec<&str> = name.given.iter().map(String::as_str).collect();
    if let Some(family) = name.family.as_deref() {
        parts.push(family);
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
