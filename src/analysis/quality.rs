//! Single-clip quality report.

use super::compare::{pacing_score, words_per_second};
use super::energy::mean_energy;
use crate::project::{words_in_range, Clip, TranscriptWord};
use serde::Serialize;

const MIN_DURATION: f64 = 15.0;
const MAX_DURATION: f64 = 90.0;
const WEAK_HOOK: f64 = 50.0;
const SLOW_WORDS_PER_SECOND: f64 = 1.5;
const MAX_EDGE_SILENCE: f64 = 1.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipQuality {
    pub clip_id: String,
    pub duration: f64,
    pub word_count: usize,
    pub words_per_second: f64,
    pub pacing_score: f64,
    pub average_energy: f64,
    pub hook_strength: f64,
    pub final_score: f64,
    pub is_complete: bool,
    pub grade: String,
    /// Silence between the clip start and its first word.
    pub leading_silence: f64,
    /// Silence between the last word and the clip end.
    pub trailing_silence: f64,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

fn grade(final_score: f64) -> &'static str {
    if final_score >= 85.0 {
        "A"
    } else if final_score >= 70.0 {
        "B"
    } else if final_score >= 55.0 {
        "C"
    } else {
        "D"
    }
}

/// Build a quality report for a clip.
pub fn analyze_quality(clip: &Clip, words: &[TranscriptWord]) -> ClipQuality {
    let start = clip.effective_start();
    let end = clip.effective_end();
    let duration = clip.effective_duration();
    let in_range = words_in_range(words, start, end);
    let wps = words_per_second(clip, words);

    let (leading_silence, trailing_silence) = match (in_range.first(), in_range.last()) {
        (Some(first), Some(last)) => ((first.start - start).max(0.0), (end - last.end).max(0.0)),
        _ => (duration, 0.0),
    };

    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    if duration < MIN_DURATION {
        issues.push(format!("Clip is short ({:.1}s)", duration));
        suggestions.push(
            "Use find_optimal_boundaries to look for a later natural ending".to_string(),
        );
    }
    if duration > MAX_DURATION {
        issues.push(format!("Clip is long ({:.1}s)", duration));
        suggestions.push("Use smart_trim_clip with strategy 'tighten'".to_string());
    }
    if clip.hook_strength < WEAK_HOOK {
        issues.push(format!("Weak hook ({:.0}/100)", clip.hook_strength));
        suggestions.push(
            "Use regenerate_hooks, or smart_trim_clip with strategy 'extend_hook'".to_string(),
        );
    }
    if !clip.is_complete {
        issues.push("Clip may cut off mid-thought".to_string());
        suggestions.push("Use find_optimal_boundaries to end on a sentence boundary".to_string());
    }
    if !in_range.is_empty() && wps < SLOW_WORDS_PER_SECOND {
        issues.push(format!("Slow pacing ({:.1} words/s)", wps));
    }
    if leading_silence > MAX_EDGE_SILENCE || trailing_silence > MAX_EDGE_SILENCE {
        issues.push(format!(
            "Dead air at the edges ({:.1}s leading, {:.1}s trailing)",
            leading_silence, trailing_silence
        ));
        suggestions.push("Use smart_trim_clip with strategy 'tighten'".to_string());
    }
    let mut seen = std::collections::HashSet::new();
    suggestions.retain(|s| seen.insert(s.clone()));

    ClipQuality {
        clip_id: clip.id.clone(),
        duration,
        word_count: in_range.len(),
        words_per_second: wps,
        pacing_score: pacing_score(wps),
        average_energy: mean_energy(words, start, end, 10),
        hook_strength: clip.hook_strength,
        final_score: clip.final_score,
        is_complete: clip.is_complete,
        grade: grade(clip.final_score).to_string(),
        leading_silence,
        trailing_silence,
        issues,
        suggestions,
    }
}
