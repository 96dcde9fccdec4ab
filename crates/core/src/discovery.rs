//! Demo-case discovery.
//!
//! One search against the clinical data source yields candidate observations;
//! each is kept only if it is a well-formed `Observation`, references a
//! patient, and that patient has an entry in the answer key. The filter is
//! stable: discovered cases keep the server's most-recently-updated-first
//! order, and the result set is immutable once built.

use crate::preview;
use crate::CoreResult;
use answer_key::AnswerKeyStore;
use fhir::{Bundle, Observation};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use smart_client::DataSource;

/// LOINC code for discharge-summary observations.
pub const DISCHARGE_SUMMARY_CODE: &str = "11506-3";

/// Maximum number of candidate observations fetched in the discovery search.
pub const DISCOVERY_PAGE_SIZE: usize = 200;

/// One browsable demo case discovered from the server.
#[derive(Clone, Debug)]
pub struct DemoCase {
    /// Patient id extracted from the observation's subject reference.
    /// Guaranteed to have had an answer-key entry at discovery time.
    pub patient_id: String,

    /// The discharge-summary observation, kept locally so its text survives a
    /// later patient-detail fetch failure.
    pub observation: Observation,

    /// Display preview recomputed from the observation text
    /// (see [`crate::preview::dis_preview`]).
    pub dis_preview: String,
}

/// Discover the browsable demo cases.
///
/// Issues a single discharge-summary search (most recently updated first,
/// capped at [`DISCOVERY_PAGE_SIZE`]) and filters the returned bundle in
/// order. An empty result is a valid outcome, not an error.
///
/// # Errors
///
/// Returns [`crate::CoreError`] if the search fails or the bundle envelope is
/// malformed; discovery has no partial-result recovery.
pub async fn discover<S: DataSource>(
    source: &S,
    answers: &AnswerKeyStore,
) -> CoreResult<Vec<DemoCase>> {
    let query = format!(
        "Observation?code={DISCHARGE_SUMMARY_CODE}&_sort=-_lastUpdated&_count={DISCOVERY_PAGE_SIZE}"
    );
    let value = source.request(&query).await?;
    let bundle = Bundle::parse(&value)?;

    let mut cases = Vec::new();
    for resource in bundle.resources() {
        // Skip anything that is not a patient-referencing observation.
        let Ok(observation) = Observation::parse(resource) else {
            continue;
        };
        let Some(patient_id) = observation.patient_id() else {
            continue;
        };
        if !answers.contains(patient_id) {
            continue;
        }

        let patient_id = patient_id.to_string();
        let dis_preview = preview::dis_preview(observation.text());
        cases.push(DemoCase {
            patient_id,
            observation,
            dis_preview,
        });
    }

    tracing::info!(
        candidates = bundle.len(),
        cases = cases.len(),
        "demo case discovery complete"
    );
    Ok(cases)
}

/// Percent-encode a patient id for interpolation into a request.
///
/// Subject references are server-sourced; an id must never be able to smuggle
/// extra query parameters or path segments into a query string.
pub(crate) fn encode_id(patient_id: &str) -> String {
    utf8_percent_encode(patient_id, NON_ALPHANUMERIC).to_string()
}

/// Fetch the most recent discharge-summary observation for one patient.
///
/// This is the single-patient variant of discovery: same code and sort order,
/// capped at one result. `None` means the patient has no such observation.
///
/// # Errors
///
/// Returns [`crate::CoreError`] if the search fails, the bundle envelope is
/// malformed, or the single returned resource is not a valid observation.
pub async fn latest_observation<S: DataSource>(
    source: &S,
    patient_id: &str,
) -> CoreResult<Option<Observation>> {
    let query = format!(
        "Observation?patient={}&code={DISCHARGE_SUMMARY_CODE}&_sort=-_lastUpdated&_count=1",
        encode_id(patient_id)
    );
    let value = source.request(&query).await?;
    let bundle = Bundle::parse(&value)?;

    let first = bundle.resources().next();
    match first {
        None => Ok(None),
        Some(resource) => Ok(Some(Observation::parse(resource)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answer_key::AnswerRecord;
    use serde_json::{json, Value};
    use smart_client::{ClientError, ClientResult};

    /// Data source answering every request with one canned bundle.
    struct CannedSource {
        bundle: Value,
    }

    impl DataSource for CannedSource {
        async fn request(&self, _query: &str) -> ClientResult<Value> {
            Ok(self.bundle.clone())
        }
    }

    /// Data source recording each query it serves.
    struct RecordingSource {
        bundle: Value,
        queries: std::sync::Mutex<Vec<String>>,
    }

    impl DataSource for RecordingSource {
        async fn request(&self, query: &str) -> ClientResult<Value> {
            self.queries.lock().expect("lock").push(query.to_string());
            Ok(self.bundle.clone())
        }
    }

    /// Data source failing every request.
    struct FailingSource;

    impl DataSource for FailingSource {
        async fn request(&self, query: &str) -> ClientResult<Value> {
            Err(ClientError::Status {
                status: 500,
                query: query.to_string(),
            })
        }
    }

    fn answers(ids: &[&str]) -> AnswerKeyStore {
        ids.iter()
            .map(|id| {
                (
                    id.to_string(),
                    AnswerRecord {
                        assistant: "I50.9".into(),
                        dis_preview: "CHF pt...".into(),
                    },
                )
            })
            .collect()
    }

    fn observation(patient_ref: &str, text: &str) -> Value {
        json!({
            "resourceType": "Observation",
            "status": "final",
            "code": { "coding": [ { "system": "http://loinc.org", "code": "11506-3" } ] },
            "subject": { "reference": patient_ref },
            "valueString": text
        })
    }

    fn bundle(resources: Vec<Value>) -> Value {
        let entries: Vec<Value> = resources.into_iter().map(|r| json!({ "resource": r })).collect();
        json!({ "resourceType": "Bundle", "type": "searchset", "entry": entries })
    }

    #[tokio::test]
    async fn keeps_only_answer_key_matches() {
        let source = CannedSource {
            bundle: bundle(vec![
                observation("Patient/demo-000001", "CHF patient admitted..."),
                observation("Patient/demo-999999", "Unknown patient summary"),
            ]),
        };

        let cases = discover(&source, &answers(&["demo-000001"]))
            .await
            .expect("discovery succeeds");

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].patient_id, "demo-000001");
        assert_eq!(cases[0].dis_preview, "CHF patient admitted...");
    }

    #[tokio::test]
    async fn preserves_bundle_order() {
        let source = CannedSource {
            bundle: bundle(vec![
                observation("Patient/demo-000003", "third"),
                observation("Patient/demo-000009", "skipped"),
                observation("Patient/demo-000001", "first"),
                observation("Patient/demo-000002", "second"),
            ]),
        };
        let key = answers(&["demo-000001", "demo-000002", "demo-000003"]);

        let cases = discover(&source, &key).await.expect("discovery succeeds");

        let ids: Vec<&str> = cases.iter().map(|c| c.patient_id.as_str()).collect();
        assert_eq!(ids, vec!["demo-000003", "demo-000001", "demo-000002"]);
    }

    #[tokio::test]
    async fn skips_non_observations_and_missing_subjects() {
        let source = CannedSource {
            bundle: bundle(vec![
                json!({ "resourceType": "DiagnosticReport", "id": "dr-1" }),
                json!({ "resourceType": "Observation", "valueString": "no subject" }),
                observation("Group/inpatients", "not a patient subject"),
                observation("Patient/demo-000001", "kept"),
            ]),
        };

        let cases = discover(&source, &answers(&["demo-000001"]))
            .await
            .expect("discovery succeeds");

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].patient_id, "demo-000001");
    }

    #[tokio::test]
    async fn empty_bundle_is_a_valid_empty_result() {
        let source = CannedSource {
            bundle: json!({ "resourceType": "Bundle", "type": "searchset", "total": 0 }),
        };

        let cases = discover(&source, &answers(&["demo-000001"]))
            .await
            .expect("discovery succeeds");
        assert!(cases.is_empty());
    }

    #[tokio::test]
    async fn search_failure_is_fatal() {
        let result = discover(&FailingSource, &answers(&["demo-000001"])).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn preview_is_derived_from_observation_text() {
        let long_text = "CHF patient admitted with worsening dyspnea over three days, \
                         bilateral crackles on exam, elevated BNP and reduced EF on echo";
        let source = CannedSource {
            bundle: bundle(vec![observation("Patient/demo-000001", long_text)]),
        };

        let cases = discover(&source, &answers(&["demo-000001"]))
            .await
            .expect("discovery succeeds");

        let expected = crate::preview::dis_preview(long_text);
        assert_eq!(cases[0].dis_preview, expected);
        assert!(expected.chars().count() <= crate::preview::PREVIEW_CHARS);
    }

    #[tokio::test]
    async fn latest_observation_returns_first_entry() {
        let source = CannedSource {
            bundle: bundle(vec![observation("Patient/demo-000001", "latest summary")]),
        };

        let obs = latest_observation(&source, "demo-000001")
            .await
            .expect("query succeeds")
            .expect("observation present");
        assert_eq!(obs.text(), "latest summary");
    }

    #[tokio::test]
    async fn latest_observation_takes_first_of_many() {
        let source = CannedSource {
            bundle: bundle(vec![
                observation("Patient/demo-000001", "newest summary"),
                observation("Patient/demo-000001", "older summary"),
            ]),
        };

        let obs = latest_observation(&source, "demo-000001")
            .await
            .expect("query succeeds")
            .expect("observation present");
        assert_eq!(obs.text(), "newest summary");
    }

    #[tokio::test]
    async fn latest_observation_percent_encodes_the_patient_id() {
        let source = RecordingSource {
            bundle: json!({ "resourceType": "Bundle", "type": "searchset", "total": 0 }),
            queries: std::sync::Mutex::new(Vec::new()),
        };

        latest_observation(&source, "a&code=99999-9")
            .await
            .expect("query succeeds");

        let queries = source.queries.lock().expect("lock");
        assert_eq!(
            queries.as_slice(),
            ["Observation?patient=a%26code%3D99999%2D9&code=11506-3&_sort=-_lastUpdated&_count=1"]
        );
    }

    #[tokio::test]
    async fn latest_observation_none_for_empty_bundle() {
        let source = CannedSource {
            bundle: json!({ "resourceType": "Bundle", "type": "searchset", "total": 0 }),
        };

        let obs = latest_observation(&source, "demo-000001")
            .await
            .expect("query succeeds");
        assert!(obs.is_none());
    }
}
