//! Clean cut point search around a clip's current boundaries.

use crate::project::{Clip, TranscriptWord};
use serde::Serialize;

/// A word separated from its neighbor by more than this is a clean cut.
pub const CLEAN_GAP: f64 = 0.5;
pub const DEFAULT_MAX_EXTENSION: f64 = 3.0;

/// Seconds to add to the current start and end.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct BoundaryOffset {
    pub start: f64,
    pub end: f64,
}

/// Suggested boundaries for one clip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundarySuggestion {
    pub clip_id: String,
    pub current_start: f64,
    pub current_end: f64,
    pub suggested_start: f64,
    pub suggested_end: f64,
    pub offset: BoundaryOffset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_word: Option<String>,
    pub reason: String,
}

/// Find the nearest clean start and end within `max_extension` seconds.
///
/// A clean start is a word preceded by a gap longer than [`CLEAN_GAP`] (or
/// the first word of the transcript); a clean end is a word followed by such
/// a gap (or the last word). Candidates outside the search window are never
/// used, so a side with no candidate keeps a zero offset. Equal distances
/// resolve to the earlier word.
pub fn find_optimal_boundaries(
    clip: &Clip,
    words: &[TranscriptWord],
    max_extension: f64,
) -> BoundarySuggestion {
    let current_start = clip.effective_start();
    let current_end = clip.effective_end();
    let last = words.len().saturating_sub(1);

    let start_word = nearest(words, |i, w| {
        let clean = i == 0 || w.start - words[i - 1].end > CLEAN_GAP;
        let distance = (w.start - current_start).abs();
        (clean && distance <= max_extension).then_some(distance)
    });

    let end_word = nearest(words, |i, w| {
        let clean = i == last || words[i + 1].start - w.end > CLEAN_GAP;
        let distance = (w.end - current_end).abs();
        (clean && distance <= max_extension).then_some(distance)
    });

    let start_offset = start_word.map(|w| w.start - current_start).unwrap_or(0.0);
    let end_offset = end_word.map(|w| w.end - current_end).unwrap_or(0.0);

    let mut changes = Vec::new();
    if start_offset.abs() > 1e-6 {
        if let Some(w) = start_word {
            changes.push(format!(
                "start moves {:+.2}s to the pause before \"{}\"",
                start_offset, w.text
            ));
        }
    }
    if end_offset.abs() > 1e-6 {
        if let Some(w) = end_word {
            changes.push(format!(
                "end moves {:+.2}s to the pause after \"{}\"",
                end_offset, w.text
            ));
        }
    }
    let reason = if changes.is_empty() {
        "already optimal".to_string()
    } else {
        changes.join("; ")
    };

    BoundarySuggestion {
        clip_id: clip.id.clone(),
        current_start,
        current_end,
        suggested_start: current_start + start_offset,
        suggested_end: current_end + end_offset,
        offset: BoundaryOffset {
            start: start_offset,
            end: end_offset,
        },
        start_word: start_word.map(|w| w.text.clone()),
        end_word: end_word.map(|w| w.text.clone()),
        reason,
    }
}

/// The candidate with the smallest distance; earlier words win ties.
fn nearest<'a, F>(words: &'a [TranscriptWord], distance: F) -> Option<&'a TranscriptWord>
where
    F: Fn(usize, &TranscriptWord) -> Option<f64>,
{
    let mut best: Option<(f64, &TranscriptWord)> = None;
    for (i, word) in words.iter().enumerate() {
        if let Some(d) = distance(i, word) {
            if best.map_or(true, |(best_d, _)| d < best_d) {
                best = Some((d, word));
            }
        }
    }
    best.map(|(_, w)| w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::fixtures::speech;

    #[test]
    fn test_no_nearby_pause_is_already_optimal() {
        // Continuous speech far beyond the search window on both sides.
        let words = speech(0.0, 100.0);
        let clip = Clip::new("c1", 40.0, 60.0, 80.0);

        let suggestion = find_optimal_boundaries(&clip, &words, 3.0);
        assert_eq!(suggestion.offset, BoundaryOffset { start: 0.0, end: 0.0 });
        assert_eq!(suggestion.reason, "already optimal");
        assert_eq!(suggestion.suggested_start, 40.0);
        assert_eq!(suggestion.suggested_end, 60.0);
    }

    #[test]
    fn test_snaps_to_nearby_pauses() {
        let mut words = speech(0.0, 9.0);
        words.extend(speech(11.0, 29.0));
        words.extend(speech(31.0, 50.0));
        let clip = Clip::new("c1", 12.0, 28.0, 80.0);

        let suggestion = find_optimal_boundaries(&clip, &words, 3.0);
        assert!((suggestion.offset.start - -1.0).abs() < 1e-9);
        assert!((suggestion.suggested_start - 11.0).abs() < 1e-9);
        let last_island_word_end = speech(11.0, 29.0).last().unwrap().end;
        assert!((suggestion.suggested_end - last_island_word_end).abs() < 1e-9);
        assert_ne!(suggestion.reason, "already optimal");
    }

    #[test]
    fn test_never_leaves_search_window() {
        let mut words = speech(0.0, 9.0);
        words.extend(speech(11.0, 40.0));
        let clip = Clip::new("c1", 20.0, 30.0, 80.0);

        // Clean start at 11.0 is 9s away.
        let suggestion = find_optimal_boundaries(&clip, &words, 3.0);
        assert_eq!(suggestion.offset.start, 0.0);
        assert!(suggestion.start_word.is_none());
    }

    #[test]
    fn test_uses_trimmed_boundaries() {
        let mut words = speech(0.0, 9.0);
        words.extend(speech(11.0, 40.0));
        let mut clip = Clip::new("c1", 8.0, 30.0, 80.0);
        clip.trim_start_offset = 2.5;

        let suggestion = find_optimal_boundaries(&clip, &words, 3.0);
        assert_eq!(suggestion.current_start, 10.5);
        assert!((suggestion.suggested_start - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_prefers_earlier_word() {
        let words = vec![
            TranscriptWord::new(0.0, 0.5, "a"),
            TranscriptWord::new(9.0, 9.5, "b"),
            TranscriptWord::new(11.0, 11.5, "c"),
            TranscriptWord::new(20.0, 20.5, "d"),
        ];
        let clip = Clip::new("c1", 10.0, 20.5, 50.0);
        let suggestion = find_optimal_boundaries(&clip, &words, 3.0);
        assert_eq!(suggestion.start_word.as_deref(), Some("b"));
    }
}
