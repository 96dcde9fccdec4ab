//! Case selection and session state.
//!
//! [`SessionContext`] is the explicit, request-scoped home of everything the
//! flow mutates after startup: the immutable answer key and case list, and
//! the single mutable [`SelectionState`]. The controller is the only writer
//! of the selection; the answer reveal only reads it.

use crate::discovery::{encode_id, DemoCase};
use crate::surface::Surface;
use crate::CoreResult;
use answer_key::AnswerKeyStore;
use fhir::{Patient, PatientSummary};
use smart_client::DataSource;

/// The currently selected patient, if any.
///
/// Written exactly once per selection, *before* the detail fetch is issued,
/// so the answer reveal works even when the detail fetch fails.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    current_patient_id: Option<String>,
}

impl SelectionState {
    /// Selection for a patient known out-of-band. Used by the single-patient
    /// flow, where the id comes from the patient read rather than a case list.
    pub fn for_patient(patient_id: &str) -> Self {
        Self {
            current_patient_id: Some(patient_id.to_string()),
        }
    }

    pub fn current_patient_id(&self) -> Option<&str> {
        self.current_patient_id.as_deref()
    }

    pub(crate) fn select(&mut self, patient_id: &str) {
        self.current_patient_id = Some(patient_id.to_string());
    }
}

/// Session-scoped context for the browse flow.
pub struct SessionContext {
    answers: AnswerKeyStore,
    cases: Vec<DemoCase>,
    selection: SelectionState,
}

impl SessionContext {
    /// Build a session from the loaded answer key and the discovered cases.
    pub fn new(answers: AnswerKeyStore, cases: Vec<DemoCase>) -> Self {
        Self {
            answers,
            cases,
            selection: SelectionState::default(),
        }
    }

    pub fn answers(&self) -> &AnswerKeyStore {
        &self.answers
    }

    pub fn cases(&self) -> &[DemoCase] {
        &self.cases
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Load one case's display state.
    ///
    /// An out-of-range index is a silent no-op. Otherwise the selection is
    /// recorded immediately, the locally held observation text is shown, and
    /// one patient detail read is issued. A detail failure only degrades the
    /// patient-info region; the observation text is never lost to it.
    ///
    /// Selections are not queued and in-flight fetches are not cancelled;
    /// whichever invocation finishes last owns the displayed state.
    pub async fn select_case<S, V>(&mut self, index: usize, source: &S, surface: &mut V)
    where
        S: DataSource,
        V: Surface,
    {
        let Some(case) = self.cases.get(index) else {
            tracing::debug!(index, cases = self.cases.len(), "selection out of range, ignored");
            return;
        };

        self.selection.select(&case.patient_id);
        surface.set_observation_text(case.observation.text());

        match fetch_patient(source, &case.patient_id).await {
            Ok(patient) => surface.render_patient(&patient),
            Err(err) => {
                tracing::warn!(
                    patient_id = %case.patient_id,
                    error = %err,
                    "patient detail fetch failed"
                );
                surface.patient_unavailable(&case.patient_id);
            }
        }
    }
}

/// Read one patient resource by id.
///
/// # Errors
///
/// Returns [`crate::CoreError`] if the read fails or the resource does not
/// parse as a patient.
pub async fn fetch_patient<S: DataSource>(
    source: &S,
    patient_id: &str,
) -> CoreResult<PatientSummary> {
    let value = source
        .request(&format!("Patient/{}", encode_id(patient_id)))
        .await?;
    Ok(Patient::parse(&value)?)
}
