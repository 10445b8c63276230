//! Highlight detection over a time range.

use super::energy::{energy_curve, EnergyMarker};
use crate::error::Result;
use crate::project::{Clip, ClipPattern, ClipStatus, TranscriptWord};
use serde::Serialize;

pub const DEFAULT_MIN_SCORE: f64 = 70.0;
pub const DEFAULT_LIMIT: usize = 10;
const HIGHLIGHT_RESOLUTION: usize = 20;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub clip_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
    pub final_score: f64,
    pub hook_strength: f64,
    pub pattern: ClipPattern,
    pub status: ClipStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub start_time: f64,
    pub end_time: f64,
    pub min_score: f64,
    pub highlights: Vec<Highlight>,
    /// Energy peaks over the range; empty without a transcript.
    pub energy_peaks: Vec<EnergyMarker>,
}

/// Clips overlapping `[start, end]` scoring at least `min_score`, best first.
pub fn detect_highlights(
    clips: &[Clip],
    words: Option<&[TranscriptWord]>,
    start: f64,
    end: f64,
    min_score: f64,
    limit: usize,
) -> Result<Highlights> {
    let mut candidates: Vec<&Clip> = clips
        .iter()
        .filter(|c| c.effective_start() < end && c.effective_end() > start)
        .filter(|c| c.final_score >= min_score)
        .collect();
    candidates.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    candidates.truncate(limit);

    let highlights = candidates
        .into_iter()
        .map(|c| Highlight {
            clip_id: c.id.clone(),
            title: c.title.clone(),
            start_time: c.effective_start(),
            end_time: c.effective_end(),
            final_score: c.final_score,
            hook_strength: c.hook_strength,
            pattern: c.pattern,
            status: c.status,
        })
        .collect();

    let energy_peaks = match words {
        Some(words) => energy_curve(words, start, end, HIGHLIGHT_RESOLUTION)?.peaks,
        None => Vec::new(),
    };

    Ok(Highlights {
        start_time: start,
        end_time: end,
        min_score,
        highlights,
        energy_peaks,
    })
}
