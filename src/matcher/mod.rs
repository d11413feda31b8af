//! Distance scoring, per-label reduction, ranking and confidence.
//!
//! `Matcher` owns the loaded reference index and runs the query pipeline:
//! quality gate, feature extraction, scoring against every index entry,
//! collapse to the best entry per label, stable ascending sort, truncation
//! to `top_k`, and confidence normalization over the surviving candidates.
//! Each call is a stateless transform over `&self`, so one matcher can serve
//! concurrent queries without locking.

use crate::feature::{extract_features, FeatureVector};
use crate::image::RawImage;
use crate::index::{IndexEntry, ReferenceIndex};
use crate::quality::assess_quality;
use crate::trace::{trace_event, trace_span};
use crate::util::math::{clamp01, lerp};
#[cfg(feature = "image-io")]
use crate::util::TexMatchResult;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
#[cfg(feature = "image-io")]
use std::path::Path;

/// Weight of the edge-density term relative to the color term.
///
/// The color histogram carries most of the discriminating signal for this
/// descriptor, so the texture term is deliberately subordinated.
const EDGE_WEIGHT: f32 = 0.25;

/// Confidence assigned to the best-ranked candidate.
const CONF_BEST: f32 = 0.95;

/// Confidence assigned to the worst retained candidate.
const CONF_WORST: f32 = 0.55;

/// Hard bounds on any reported confidence value.
const CONF_MIN: f32 = 0.05;
const CONF_MAX: f32 = 0.99;

/// Floor for the confidence denominator when best == worst.
const DENOM_EPS: f32 = 1e-9;

/// Matching configuration.
#[derive(Clone, Copy, Debug)]
pub struct MatchConfig {
    /// Maximum number of ranked results to return.
    pub top_k: usize,
    /// Score index entries in parallel. Requires the `rayon` feature and is
    /// ignored without it; both paths produce bit-identical results.
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            parallel: false,
        }
    }
}

/// Best-scoring index entry for one label, before ranking.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchCandidate {
    /// Label this candidate represents.
    pub label_key: String,
    /// Distance of the label's best entry (lower is more similar).
    pub distance: f32,
    /// `source_ref` of the winning entry for the label.
    pub source_ref: String,
}

/// One ranked, confidence-scored match.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchResult {
    /// 1-based rank, strictly increasing within a result set.
    pub rank: usize,
    /// Matched label.
    pub label_key: String,
    /// Reference sample the distance was measured against.
    pub source_ref: String,
    /// Descriptor distance to that sample.
    pub distance: f32,
    /// Query-local relative confidence in [0.05, 0.99].
    pub confidence: f32,
}

/// Descriptor distance: Euclidean norm over the histograms plus a weighted
/// absolute difference of the edge terms.
pub fn distance(query: &FeatureVector, entry: &FeatureVector) -> f32 {
    let mut sum_sq = 0.0f32;
    for (q, e) in query.hist.iter().zip(&entry.hist) {
        let d = q - e;
        sum_sq += d * d;
    }
    sum_sq.sqrt() + EDGE_WEIGHT * (query.edge - entry.edge).abs()
}

/// Collapses per-entry distances to one best candidate per label.
///
/// Explicit fold keyed by label identity: the first-encountered entry wins
/// ties (replacement requires a strictly smaller distance), so the outcome
/// depends only on index construction order. Candidates come back in
/// first-appearance order of their labels.
pub fn reduce_per_label(query: &FeatureVector, index: &ReferenceIndex) -> Vec<MatchCandidate> {
    let entries = index.entries();
    let distances: Vec<f32> = entries
        .iter()
        .map(|entry| distance(query, &entry.features))
        .collect();
    fold_candidates(entries, &distances)
}

/// Per-label reduction with parallel distance evaluation (rayon).
///
/// Distances are computed per entry preserving entry order and folded
/// sequentially, so the output is bit-identical to [`reduce_per_label`].
#[cfg(feature = "rayon")]
pub fn reduce_per_label_par(query: &FeatureVector, index: &ReferenceIndex) -> Vec<MatchCandidate> {
    let entries = index.entries();
    let distances: Vec<f32> = entries
        .par_iter()
        .map(|entry| distance(query, &entry.features))
        .collect();
    fold_candidates(entries, &distances)
}

fn fold_candidates(entries: &[IndexEntry], distances: &[f32]) -> Vec<MatchCandidate> {
    let mut slot_by_label: HashMap<&str, usize> = HashMap::new();
    let mut candidates: Vec<MatchCandidate> = Vec::new();
    for (entry, &dist) in entries.iter().zip(distances) {
        match slot_by_label.get(entry.label_key.as_str()) {
            Some(&slot) => {
                if dist < candidates[slot].distance {
                    candidates[slot].distance = dist;
                    candidates[slot].source_ref = entry.source_ref.clone();
                }
            }
            None => {
                slot_by_label.insert(entry.label_key.as_str(), candidates.len());
                candidates.push(MatchCandidate {
                    label_key: entry.label_key.clone(),
                    distance: dist,
                    source_ref: entry.source_ref.clone(),
                });
            }
        }
    }

    debug_assert!(entries.is_empty() || !candidates.is_empty());
    candidates
}

/// Sorts, truncates and confidence-normalizes reduced candidates.
///
/// Confidence is relative to this result set only: the spread between the
/// best and worst retained distances is mapped linearly onto
/// [`CONF_WORST`, `CONF_BEST`], so a sole survivor always scores 0.95.
fn rank_candidates(mut candidates: Vec<MatchCandidate>, top_k: usize) -> Vec<MatchResult> {
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    candidates.truncate(top_k);
    if candidates.is_empty() {
        return Vec::new();
    }

    let best = candidates[0].distance;
    let worst = candidates[candidates.len() - 1].distance;
    let denom = (worst - best).max(DENOM_EPS);

    candidates
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            let t = clamp01((c.distance - best) / denom);
            let confidence = lerp(CONF_BEST, CONF_WORST, t).clamp(CONF_MIN, CONF_MAX);
            MatchResult {
                rank: i + 1,
                label_key: c.label_key,
                source_ref: c.source_ref,
                distance: c.distance,
                confidence,
            }
        })
        .collect()
}

/// Texture matcher over a loaded reference index.
#[derive(Clone, Debug)]
pub struct Matcher {
    index: ReferenceIndex,
    config: MatchConfig,
}

impl Matcher {
    /// Creates a matcher with the default configuration.
    pub fn new(index: ReferenceIndex) -> Self {
        Self {
            index,
            config: MatchConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the shared reference index.
    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    /// Matches a preprocessed image against the index.
    ///
    /// Returns an empty list when the quality gate rejects the photo or the
    /// index holds no entries; both are soft outcomes the caller should
    /// treat as "retake the photo", never as a fault.
    pub fn match_image(&self, img: &RawImage) -> Vec<MatchResult> {
        let _span = trace_span!(
            "match_image",
            width = img.width(),
            height = img.height(),
            index_len = self.index.len()
        )
        .entered();

        let quality = assess_quality(img);
        if quality.too_blank {
            trace_event!(
                "quality_rejected",
                mean = f64::from(quality.mean),
                std_dev = f64::from(quality.std_dev),
                edge_norm = f64::from(quality.edge_norm)
            );
            return Vec::new();
        }

        let features = extract_features(img);
        self.match_features(&features)
    }

    /// Matches an already extracted feature vector against the index.
    pub fn match_features(&self, features: &FeatureVector) -> Vec<MatchResult> {
        #[cfg(feature = "rayon")]
        let candidates = if self.config.parallel {
            reduce_per_label_par(features, &self.index)
        } else {
            reduce_per_label(features, &self.index)
        };
        #[cfg(not(feature = "rayon"))]
        let candidates = reduce_per_label(features, &self.index);
        let results = rank_candidates(candidates, self.config.top_k);
        trace_event!("match_done", results = results.len());
        results
    }

    /// Decodes, preprocesses and matches an image from encoded bytes.
    ///
    /// Unreadable bytes surface as a hard error; a readable but unusable
    /// photo yields `Ok` with an empty list.
    #[cfg(feature = "image-io")]
    pub fn match_bytes(&self, bytes: &[u8]) -> TexMatchResult<Vec<MatchResult>> {
        let img = crate::image::io::preprocess_bytes(bytes)?;
        Ok(self.match_image(&img))
    }

    /// Decodes, preprocesses and matches an image file.
    #[cfg(feature = "image-io")]
    pub fn match_path<P: AsRef<Path>>(&self, path: P) -> TexMatchResult<Vec<MatchResult>> {
        let img = crate::image::io::preprocess_path(path)?;
        Ok(self.match_image(&img))
    }
}
