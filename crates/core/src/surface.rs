//! Display surface contract.
//!
//! The flow writes to five regions: status line, patient info, observation
//! text, case list, and the answer block. The surface never feeds anything
//! back into the flow. All externally sourced text passes through
//! [`sanitize`] before it reaches an output stream, so a resource field can
//! never smuggle terminal control sequences into the display.

use crate::discovery::DemoCase;
use fhir::PatientSummary;

/// Placeholder for absent patient fields.
pub const NOT_PROVIDED: &str = "(not provided)";

/// Strip control characters from externally sourced text, keeping newlines
/// and tabs.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(*c, '\n' | '\t'))
        .collect()
}

/// The five display regions the flow writes to.
pub trait Surface {
    /// Replace the status line.
    fn set_status(&mut self, text: &str);

    /// Show patient details in the patient-info region.
    fn render_patient(&mut self, patient: &PatientSummary);

    /// Flag the patient-info region as unavailable for this patient. The
    /// observation-text region is unaffected.
    fn patient_unavailable(&mut self, patient_id: &str);

    /// Replace the observation-text region with the discharge summary body.
    fn set_observation_text(&mut self, text: &str);

    /// Show the discovered case list.
    fn render_case_list(&mut self, cases: &[DemoCase]);

    /// Show a reveal block in the answer region.
    fn show_answer(&mut self, text: &str);
}

/// Surface writing labelled regions to stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        Self
    }
}

fn field(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => sanitize(v),
        _ => NOT_PROVIDED.to_string(),
    }
}

impl Surface for TerminalSurface {
    fn set_status(&mut self, text: &str) {
        println!("== {}", sanitize(text));
    }

    fn render_patient(&mut self, patient: &PatientSummary) {
        println!("Patient");
        println!("  FHIR resource id: {}", sanitize(&patient.id));
        println!("  Name:             {}", field(patient.name.as_deref()));
        println!("  Gender:           {}", field(patient.gender.as_deref()));
        println!("  Birth date:       {}", field(patient.birth_date.as_deref()));
        println!("  Test identifier:  {}", field(patient.identifier.as_deref()));
    }

    fn patient_unavailable(&mut self, patient_id: &str) {
        println!("Patient");
        println!(
            "  Details could not be loaded for {} (discharge summary below is unaffected).",
            sanitize(patient_id)
        );
    }

    fn set_observation_text(&mut self, text: &str) {
        println!("Discharge summary");
        if text.is_empty() {
            println!("  (empty)");
        } else {
            for line in sanitize(text).lines() {
                println!("  {line}");
            }
        }
    }

    fn render_case_list(&mut self, cases: &[DemoCase]) {
        println!("Demo cases");
        for (index, case) in cases.iter().enumerate() {
            println!(
                "  {:>3}. {}  {}",
                index + 1,
                sanitize(&case.patient_id),
                sanitize(&case.dis_preview)
            );
        }
    }

    fn show_answer(&mut self, text: &str) {
        println!("Answer");
        for line in sanitize(text).lines() {
            println!("  {line}");
        }
    }
}
