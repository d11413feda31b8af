//! Reference index of labeled feature vectors.
//!
//! The index is produced by an external dataset-processing step and consumed
//! here read-only: loaded once per process, shared by reference across
//! queries, never mutated. The persisted document is a JSON array of entries
//! with camelCase keys (`labelKey`, `sourceRef`, `features`). Several
//! entries may share a label when the corpus holds multiple sample photos
//! per class.

use crate::feature::FeatureVector;
use crate::util::{TexMatchError, TexMatchResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One labeled reference signature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    /// Canonical label identifier grouping entries into classes.
    pub label_key: String,
    /// Identifier of the reference sample, e.g. the source filename.
    pub source_ref: String,
    /// Precomputed visual signature of the sample.
    pub features: FeatureVector,
}

/// Ordered, immutable collection of reference entries.
///
/// Entry order is significant: per-label reduction breaks distance ties in
/// favor of the first-encountered entry, so results depend only on how the
/// index was constructed, never on query timing.
#[derive(Clone, Debug, Default)]
pub struct ReferenceIndex {
    entries: Vec<IndexEntry>,
}

impl ReferenceIndex {
    /// Wraps validated entries into an index.
    ///
    /// Every entry's feature vector must satisfy the descriptor contract
    /// (64 buckets, non-negative, summing to ~1, edge in [0, 1]).
    pub fn new(entries: Vec<IndexEntry>) -> TexMatchResult<Self> {
        for entry in &entries {
            entry
                .features
                .validate()
                .map_err(|reason| TexMatchError::InvalidIndexEntry {
                    source_ref: entry.source_ref.clone(),
                    reason,
                })?;
        }
        Ok(Self { entries })
    }

    /// Parses an index from a JSON document in memory.
    pub fn from_json_slice(bytes: &[u8]) -> TexMatchResult<Self> {
        let entries: Vec<IndexEntry> = serde_json::from_slice(bytes)?;
        Self::new(entries)
    }

    /// Loads an index document from disk.
    pub fn load_json<P: AsRef<Path>>(path: P) -> TexMatchResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let entries: Vec<IndexEntry> = serde_json::from_reader(reader)?;
        Self::new(entries)
    }

    /// Returns the entries in construction order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Returns the number of entries (not distinct labels).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{IndexEntry, ReferenceIndex};
    use crate::feature::{FeatureVector, HIST_BUCKETS};
    use crate::util::TexMatchError;

    fn concentrated(bucket: usize, edge: f32) -> FeatureVector {
        let mut hist = vec![0.0f32; HIST_BUCKETS];
        hist[bucket] = 1.0;
        FeatureVector { hist, edge }
    }

    #[test]
    fn new_rejects_invalid_feature_vectors() {
        let mut features = concentrated(0, 0.4);
        features.hist.truncate(3);
        let entry = IndexEntry {
            label_key: "oak".into(),
            source_ref: "oak_001.jpg".into(),
            features,
        };
        let err = ReferenceIndex::new(vec![entry]).err().unwrap();
        assert!(
            matches!(err, TexMatchError::InvalidIndexEntry { ref source_ref, .. } if source_ref == "oak_001.jpg")
        );
    }

    #[test]
    fn json_document_round_trips_with_camel_case_keys() {
        let mut hist = vec![0.0f32; HIST_BUCKETS];
        hist[5] = 1.0;
        let doc = format!(
            r#"[
                {{
                    "labelKey": "betula_pendula",
                    "sourceRef": "bark_0413.jpg",
                    "features": {{ "hist": {}, "edge": 0.31 }}
                }}
            ]"#,
            serde_json::to_string(&hist).unwrap()
        );

        let index = ReferenceIndex::from_json_slice(doc.as_bytes()).unwrap();
        assert_eq!(index.len(), 1);
        let entry = &index.entries()[0];
        assert_eq!(entry.label_key, "betula_pendula");
        assert_eq!(entry.source_ref, "bark_0413.jpg");
        assert_eq!(entry.features.hist[5], 1.0);
        assert!((entry.features.edge - 0.31).abs() < 1e-6);
    }

    #[test]
    fn malformed_json_surfaces_a_parse_error() {
        let err = ReferenceIndex::from_json_slice(b"{ not json").err().unwrap();
        assert!(matches!(err, TexMatchError::IndexParse(_)));
    }
}
