//! FHIR search result bundles.
//!
//! A search against the resource server answers with a `Bundle` whose entries
//! each wrap one resource. The viewer only walks the entries in server order;
//! paging links, scores and the rest of the bundle envelope are ignored.

use crate::{FhirError, FhirResult};
use serde::Deserialize;
use serde_json::Value;

/// Wire representation of a search result bundle.
///
/// Entries stay as raw JSON values; callers discriminate on `resourceType`
/// themselves (see [`crate::Observation::parse`]).
#[derive(Clone, Debug, Deserialize)]
pub struct Bundle {
    #[serde(rename = "resourceType")]
    resource_type: String,

    #[serde(default)]
    entry: Vec<BundleEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct BundleEntry {
    #[serde(default)]
    resource: Option<Value>,
}

impl Bundle {
    /// Parse a search result bundle from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if the value does not decode as a bundle envelope
    /// or its `resourceType` is not `Bundle`. The error message carries the
    /// JSON path of the failing field.
    pub fn parse(value: &Value) -> FhirResult<Self> {
        let bundle = match serde_path_to_error::deserialize::<_, Bundle>(value) {
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
                    "Bundle schema mismatch at {path}: {source}"
                )));
            }
        };

        if bundle.resource_type != "Bundle" {
            return Err(FhirError::InvalidInput(format!(
                "Expected resourceType 'Bundle', got '{}'",
                bundle.resource_type
            )));
        }

        Ok(bundle)
    }

    /// Entry resources in server-returned order. Entries without a resource
    /// (for example OperationOutcome-only entries) are skipped.
    pub fn resources(&self) -> impl Iterator<Item = &Value> {
        self.entry.iter().filter_map(|e| e.resource.as_ref())
    }

    /// Number of entries carrying a resource.
    pub fn len(&self) -> usize {
        self.resources().count()
    }

    /// True when no entry carries a resource.
    pub fn is_empty(&self) -> bool {
        self.resources().next().is_none()
    }
}
