//! Answer reveal.
//!
//! Pure, read-only formatting of the reference answer for the currently
//! selected patient. The stored answer-key preview is shown verbatim here;
//! the recomputed preview on [`crate::DemoCase`] belongs to the case list
//! only, and the two are never compared.

use crate::session::SelectionState;
use answer_key::AnswerKeyStore;

/// Shown when no patient has been selected yet.
pub const NOT_READY_MESSAGE: &str = "No patient selected yet. Load or select a case, then try again.";

/// Message for a selected patient absent from the answer key.
pub fn not_a_demo_case_message(patient_id: &str) -> String {
    format!(
        "Patient id ({patient_id}) is not in the demo answer key.\n\
         (Probably a sandbox built-in patient rather than demo-0000xx data.)"
    )
}

/// Format the reveal block for the current selection.
///
/// Combines the answer record's stored preview and its reference answer
/// verbatim; no transformation or truncation is applied here.
pub fn reveal(selection: &SelectionState, answers: &AnswerKeyStore) -> String {
    let Some(patient_id) = selection.current_patient_id() else {
        return NOT_READY_MESSAGE.to_string();
    };

    let Some(record) = answers.get(patient_id) else {
        return not_a_demo_case_message(patient_id);
    };

    format!(
        "(Demo) This shows the answer key's assistant column,\n\
         standing in for model output in this walkthrough.\n\
         \n\
         Summary preview (first 80 chars, for comparison):\n\
         {}\n\
         \n\
         Reference answer (verbatim):\n\
         {}",
        record.dis_preview, record.assistant
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use answer_key::AnswerRecord;

    fn answers() -> AnswerKeyStore {
        [(
            "demo-000001".to_string(),
            AnswerRecord {
                assistant: "I50.9".into(),
                dis_preview: "CHF pt...".into(),
            },
        )]
        .into_iter()
        .collect()
    }

    fn selected(patient_id: &str) -> SelectionState {
        let mut state = SelectionState::default();
        state.select(patient_id);
        state
    }

    #[test]
    fn no_selection_yields_not_ready_message() {
        let text = reveal(&SelectionState::default(), &answers());
        assert_eq!(text, NOT_READY_MESSAGE);

        // Independent of the answer key contents.
        let text = reveal(&SelectionState::default(), &AnswerKeyStore::default());
        assert_eq!(text, NOT_READY_MESSAGE);
    }

    #[test]
    fn unknown_patient_message_names_the_id() {
        let text = reveal(&selected("demo-999999"), &answers());
        assert!(text.contains("demo-999999"));
        assert!(text.contains("not in the demo answer key"));
    }

    #[test]
    fn known_patient_gets_preview_and_answer_verbatim() {
        let text = reveal(&selected("demo-000001"), &answers());
        assert!(text.contains("CHF pt..."));
        assert!(text.contains("I50.9"));
    }

    #[test]
    fn answer_strings_are_not_transformed() {
        let answers: AnswerKeyStore = [(
            "demo-000002".to_string(),
            AnswerRecord {
                assistant: "  I50.9 \n J18.9  ".into(),
                dis_preview: "  spaced   preview  ".into(),
            },
        )]
        .into_iter()
        .collect();

        let text = reveal(&selected("demo-000002"), &answers);
        assert!(text.contains("  I50.9 \n J18.9  "));
        assert!(text.contains("  spaced   preview  "));
    }
}
