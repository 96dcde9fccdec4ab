//! Static demo answer key.
//!
//! The demo ships a JSON file mapping patient ids to pre-computed reference
//! answers. The store is loaded once at startup, concurrently with the
//! authorization handshake, and is immutable afterwards.
//!
//! Loading is deliberately forgiving: a missing or malformed file degrades to
//! an empty store with a logged warning. The demo still runs, it just has no
//! cases to offer, and that must never take the whole session down.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One reference answer, keyed by patient id in the store.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AnswerRecord {
    /// The reference answer string (the CSV `assistant` column).
    #[serde(default)]
    pub assistant: String,

    /// Stored preview of the discharge summary, shown verbatim at reveal time.
    #[serde(default)]
    pub dis_preview: String,
}

/// Internal load failure; never escapes [`AnswerKeyStore::load`].
#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error("failed to read answer key file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse answer key JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable patient-id to reference-answer mapping.
#[derive(Clone, Debug, Default)]
pub struct AnswerKeyStore {
    records: HashMap<String, AnswerRecord>,
}

impl AnswerKeyStore {
    /// Load the answer key from a JSON file.
    ///
    /// On any failure (missing file, unreadable, malformed JSON) this logs a
    /// warning and returns an empty store. It never returns an error: a demo
    /// without answers is degraded, not broken.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON answer key file.
    pub async fn load(path: &Path) -> Self {
        match Self::try_load(path).await {
            Ok(store) => {
                tracing::info!(
                    path = %path.display(),
                    records = store.len(),
                    "loaded answer key"
                );
                store
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to load answer key, continuing with empty store"
                );
                Self::default()
            }
        }
    }

    async fn try_load(path: &Path) -> Result<Self, LoadError> {
        let text = tokio::fs::read_to_string(path).await?;
        let records: HashMap<String, AnswerRecord> = serde_json::from_str(&text)?;
        Ok(Self { records })
    }

    /// Look up the reference answer for a patient id.
    pub fn get(&self, patient_id: &str) -> Option<&AnswerRecord> {
        self.records.get(patient_id)
    }

    /// Whether the store holds an entry for a patient id.
    pub fn contains(&self, patient_id: &str) -> bool {
        self.records.contains_key(patient_id)
    }

    /// Number of known patient ids.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no answers were loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(String, AnswerRecord)> for AnswerKeyStore {
    fn from_iter<I: IntoIterator<Item = (String, AnswerRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
