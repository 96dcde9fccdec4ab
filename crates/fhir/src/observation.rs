//! FHIR-aligned observation wire model.
//!
//! The viewer reads exactly two things from an `Observation`: the free-text
//! value (the discharge summary itself) and the subject reference (which
//! patient the summary belongs to). Everything else the server sends along
//! (codes, effective dates, performers) is ignored.

use crate::{FhirError, FhirResult};
use serde::Deserialize;
use serde_json::Value;

/// Narrow view of an `Observation` resource.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Observation {
    #[serde(rename = "resourceType")]
    resource_type: String,

    #[serde(default)]
    pub id: Option<String>,

    /// Free-text observation value, the discharge-summary body.
    #[serde(rename = "valueString", default)]
    pub value_string: Option<String>,

    #[serde(default)]
    subject: Option<Reference>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
struct Reference {
    #[serde(default)]
    reference: Option<String>,
}

impl Observation {
    /// Parse an observation from a JSON resource value.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if the value does not decode or its
    /// `resourceType` is not `Observation`.
    pub fn parse(value: &Value) -> FhirResult<Self> {
        let obs = match serde_path_to_error::deserialize::<_, Observation>(value) {
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
                    "Observation schema mismatch at {path}: {source}"
                )));
            }
        };

        if obs.resource_type != "Observation" {
            return Err(FhirError::InvalidInput(format!(
                "Expected resourceType 'Observation', got '{}'",
                obs.resource_type
            )));
        }

        Ok(obs)
    }

    /// The patient id this observation is about, if the subject reference
    /// identifies a patient.
    ///
    /// Accepts relative (`Patient/demo-000001`) and absolute
    /// (`https://host/fhir/Patient/demo-000001`) reference forms. References
    /// to other resource types, contained references (`#p1`) and logical
    /// references without a path yield `None`.
    pub fn patient_id(&self) -> Option<&str> {
        let reference = self.subject.as_ref()?.reference.as_deref()?;
        // Strip query and fragment; contained refs start with '#' and drop out here.
        let path = reference.split(['?', '#']).next().unwrap_or(reference);
        let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
        let id = segments.next()?;
        let resource_type = segments.next()?;
        (resource_type == "Patient").then_some(id)
    }

    /// The observation text, empty when the server sent none.
    pub fn text(&self) -> &str {
        self.value_string.as_deref().unwrap_or_default()
    }
}
