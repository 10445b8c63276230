//! Speech pattern analysis: pauses, sentence boundaries and cut points.

use crate::project::{words_in_range, TranscriptWord};
use serde::Serialize;

/// Gaps longer than this between words count as pauses.
pub const PAUSE_THRESHOLD: f64 = 0.3;
/// Pauses longer than this are treated as sentence boundaries.
pub const SENTENCE_BOUNDARY_THRESHOLD: f64 = 0.5;
/// Pauses longer than this are strong cut candidates.
pub const LONG_PAUSE_THRESHOLD: f64 = 0.8;
/// How many boundaries and long pauses feed the cut point list.
const CUT_SOURCE_LIMIT: usize = 5;
pub const MAX_CUT_POINTS: usize = 8;
/// Pauses included in a serialized report.
const MAX_REPORTED_PAUSES: usize = 25;

/// A gap between two consecutive words.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pause {
    /// End of the word before the gap.
    pub time: f64,
    pub duration: f64,
    pub after_word: String,
}

/// Summary of how speech flows through a time range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechPattern {
    pub start_time: f64,
    pub end_time: f64,
    pub word_count: usize,
    pub words_per_minute: f64,
    pub pause_count: usize,
    pub average_pause: f64,
    pub longest_pause: f64,
    /// First pauses in the range; `pause_count` has the total.
    pub pauses: Vec<Pause>,
    pub sentence_boundaries: Vec<f64>,
    pub natural_cut_points: Vec<f64>,
}

/// Analyze the words starting inside `[start, end)`.
pub fn analyze_speech(words: &[TranscriptWord], start: f64, end: f64) -> SpeechPattern {
    let in_range = words_in_range(words, start, end);

    let pauses: Vec<Pause> = in_range
        .windows(2)
        .filter_map(|pair| {
            let gap = pair[1].start - pair[0].end;
            (gap > PAUSE_THRESHOLD).then(|| Pause {
                time: pair[0].end,
                duration: gap,
                after_word: pair[0].text.clone(),
            })
        })
        .collect();

    let sentence_boundaries: Vec<f64> = pauses
        .iter()
        .filter(|p| p.duration > SENTENCE_BOUNDARY_THRESHOLD)
        .map(|p| p.time)
        .collect();

    let long_pauses = pauses
        .iter()
        .filter(|p| p.duration > LONG_PAUSE_THRESHOLD)
        .map(|p| p.time)
        .take(CUT_SOURCE_LIMIT);

    let mut natural_cut_points: Vec<f64> = sentence_boundaries
        .iter()
        .copied()
        .take(CUT_SOURCE_LIMIT)
        .chain(long_pauses)
        .collect();
    natural_cut_points.sort_by(|a, b| a.total_cmp(b));
    natural_cut_points.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    natural_cut_points.truncate(MAX_CUT_POINTS);

    let range_duration = end - start;
    let words_per_minute = if range_duration > 0.0 {
        in_range.len() as f64 / range_duration * 60.0
    } else {
        0.0
    };

    let total_pause: f64 = pauses.iter().map(|p| p.duration).sum();
    let average_pause = if pauses.is_empty() {
        0.0
    } else {
        total_pause / pauses.len() as f64
    };
    let longest_pause = pauses.iter().map(|p| p.duration).fold(0.0_f64, f64::max);
    let pause_count = pauses.len();

    SpeechPattern {
        start_time: start,
        end_time: end,
        word_count: in_range.len(),
        words_per_minute,
        pause_count,
        average_pause,
        longest_pause,
        pauses: pauses.into_iter().take(MAX_REPORTED_PAUSES).collect(),
        sentence_boundaries,
        natural_cut_points,
    }
}
