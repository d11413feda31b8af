//! TexMatch is a content-based texture matching library.
//!
//! Given a photographed surface texture and a precomputed index of labeled
//! reference signatures, the crate produces a ranked, confidence-scored
//! shortlist of the labels the photo most resembles. Matching is similarity
//! scoring against hand-engineered descriptors (a joint color histogram plus
//! an edge-density scalar); there is no trained model and no feedback loop.
//!
//! A query is one stateless linear pipeline:
//! preprocess, quality gate (may short-circuit), feature extraction,
//! per-entry scoring, per-label reduction, ranking, confidence normalization.
//! Image decoding is available via the `image-io` feature (on by default);
//! optional parallel scoring via the `rayon` feature is bit-identical to the
//! scalar path.

pub mod feature;
pub mod image;
pub mod index;
pub mod matcher;
pub mod quality;
mod trace;
pub mod util;

pub use feature::{extract_features, FeatureVector, HIST_BUCKETS};
pub use image::RawImage;
pub use index::{IndexEntry, ReferenceIndex};
#[cfg(feature = "rayon")]
pub use matcher::reduce_per_label_par;
pub use matcher::{distance, reduce_per_label, MatchCandidate, MatchConfig, MatchResult, Matcher};
pub use quality::{assess_quality, QualityMetrics};
pub use util::{TexMatchError, TexMatchResult};
