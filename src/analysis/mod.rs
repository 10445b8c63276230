//! Read-only analysis over transcript timing and clip metadata.
//!
//! Everything here is a pure function of its inputs. Callers fetch data
//! through [`crate::project::ProjectState`] and pass slices in.

mod boundaries;
mod compare;
mod energy;
mod highlights;
mod quality;
mod speech;

pub use boundaries::{
    find_optimal_boundaries, BoundaryOffset, BoundarySuggestion, DEFAULT_MAX_EXTENSION,
};
pub use compare::{
    compare_clips, pacing_score, score_clip, words_per_second, ClipComparison, ClipScores,
    Criterion, CriterionWinner,
};
pub use energy::{
    energy_curve, mean_energy, peak_indices, valley_indices, window_energy, EnergyCurve,
    EnergyMarker, EnergySample, MAX_RESOLUTION,
};
pub use highlights::{
    detect_highlights, Highlight, Highlights, DEFAULT_LIMIT as DEFAULT_HIGHLIGHT_LIMIT,
    DEFAULT_MIN_SCORE as DEFAULT_HIGHLIGHT_MIN_SCORE,
};
pub use quality::{analyze_quality, ClipQuality};
pub use speech::{analyze_speech, Pause, SpeechPattern};
