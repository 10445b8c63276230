//! Strategy-driven trim adjustments.

use crate::error::{ClipError, Result};
use crate::project::{require_clip, words_in_range, ProjectState};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Breathing room kept around speech when tightening.
const SPEECH_PAD: f64 = 0.2;
/// How far `extend_hook` pulls the start back.
const HOOK_EXTENSION: f64 = 1.5;
/// How far `energy_peaks` pulls each edge in.
const PEAK_SQUEEZE: f64 = 0.5;

/// How a clip's edges should move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimStrategy {
    /// Cut dead air before the first and after the last word.
    #[default]
    Tighten,
    /// Start earlier to catch the setup.
    ExtendHook,
    /// Pull both edges in toward the middle.
    EnergyPeaks,
}

impl TrimStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrimStrategy::Tighten => "tighten",
            TrimStrategy::ExtendHook => "extend_hook",
            TrimStrategy::EnergyPeaks => "energy_peaks",
        }
    }
}

impl FromStr for TrimStrategy {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "tighten" => Ok(TrimStrategy::Tighten),
            "extend_hook" => Ok(TrimStrategy::ExtendHook),
            "energy_peaks" => Ok(TrimStrategy::EnergyPeaks),
            other => Err(ClipError::InvalidArguments(format!(
                "Unknown trim strategy '{}' (expected tighten, extend_hook or energy_peaks)",
                other
            ))),
        }
    }
}

/// What a smart trim did to a clip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimOutcome {
    pub clip_id: String,
    pub strategy: TrimStrategy,
    pub applied: bool,
    pub previous_start: f64,
    pub previous_end: f64,
    pub new_start: f64,
    pub new_end: f64,
    pub trim_start_offset: f64,
    pub trim_end_offset: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Compute `(start_delta, end_delta)` for a strategy, or a note when nothing applies.
fn deltas(
    state: &dyn ProjectState,
    start: f64,
    end: f64,
    strategy: TrimStrategy,
) -> Result<(f64, f64, Option<String>)> {
    match strategy {
        TrimStrategy::Tighten => {
            let words = state.transcript().unwrap_or_default();
            let inside = words_in_range(&words, start, end);
            let (Some(first), Some(last)) = (inside.first(), inside.last()) else {
                return Ok((0.0, 0.0, Some("no speech inside the clip".to_string())));
            };
            let new_start = start.max(first.start - SPEECH_PAD);
            let new_end = end.min(last.end + SPEECH_PAD);
            Ok((new_start - start, new_end - end, None))
        }
        TrimStrategy::ExtendHook => {
            let delta = -HOOK_EXTENSION.min(start.max(0.0));
            let note = (delta == 0.0).then(|| "clip already starts at 0:00".to_string());
            Ok((delta, 0.0, note))
        }
        TrimStrategy::EnergyPeaks => Ok((PEAK_SQUEEZE, -PEAK_SQUEEZE, None)),
    }
}

/// Adjust a clip's trim offsets with the given strategy.
///
/// The trim setter is only called when at least one edge moves.
pub fn smart_trim(
    state: &dyn ProjectState,
    clip_id: &str,
    strategy: TrimStrategy,
) -> Result<TrimOutcome> {
    let clip = require_clip(state, clip_id)?;
    let start = clip.effective_start();
    let end = clip.effective_end();

    let (start_delta, end_delta, note) = deltas(state, start, end, strategy)?;
    let trim_start_offset = clip.trim_start_offset + start_delta;
    let trim_end_offset = clip.trim_end_offset + end_delta;

    let applied = start_delta != 0.0 || end_delta != 0.0;
    if applied {
        state.update_trim(&clip.id, trim_start_offset, trim_end_offset)?;
        debug!(
            "Trimmed {} with {}: {:+.2}s start, {:+.2}s end",
            clip.id,
            strategy.as_str(),
            start_delta,
            end_delta
        );
    }

    Ok(TrimOutcome {
        clip_id: clip.id,
        strategy,
        applied,
        previous_start: start,
        previous_end: end,
        new_start: start + start_delta,
        new_end: end + end_delta,
        trim_start_offset,
        trim_end_offset,
        note,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::fixtures::{clip, project_with, sample_project, speech};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_tighten_pads_around_speech() {
        let project = sample_project();
        let outcome = smart_trim(&project, "c1", TrimStrategy::Tighten).unwrap();

        // First word at 11.0, last word ends at 37.7
        assert!(outcome.applied);
        assert!(approx(outcome.new_start, 10.8));
        assert!(approx(outcome.new_end, 37.9));

        let stored = project.clip("c1").unwrap();
        assert!(approx(stored.trim_start_offset, 0.8));
        assert!(approx(stored.trim_end_offset, -2.1));
    }

    #[test]
    fn test_tighten_never_extends() {
        let project = project_with(vec![clip("a", 5.0, 10.0, 80.0, 60.0)], Some(speech(4.0, 11.0)));
        let outcome = smart_trim(&project, "a", TrimStrategy::Tighten).unwrap();
        assert!(outcome.new_start >= 5.0);
        assert!(outcome.new_end <= 10.0);
    }

    #[test]
    fn test_tighten_without_speech_is_noop() {
        let project = project_with(vec![clip("a", 5.0, 10.0, 80.0, 60.0)], None);
        let outcome = smart_trim(&project, "a", TrimStrategy::Tighten).unwrap();
        assert!(!outcome.applied);
        assert!(outcome.note.is_some());
    }

    #[test]
    fn test_extend_hook_clamps_at_zero() {
        let project = project_with(vec![clip("a", 1.0, 10.0, 80.0, 60.0)], None);
        let outcome = smart_trim(&project, "a", TrimStrategy::ExtendHook).unwrap();
        assert!(approx(outcome.new_start, 0.0));
        assert!(approx(project.clip("a").unwrap().trim_start_offset, -1.0));

        let again = smart_trim(&project, "a", TrimStrategy::ExtendHook).unwrap();
        assert!(!again.applied);
    }

    #[test]
    fn test_energy_peaks_squeezes_both_edges() {
        let project = sample_project();
        let outcome = smart_trim(&project, "c2", TrimStrategy::EnergyPeaks).unwrap();
        assert!(approx(outcome.new_start, 50.5));
        assert!(approx(outcome.new_end, 69.5));
    }

    #[test]
    fn test_unknown_clip() {
        let project = sample_project();
        let err = smart_trim(&project, "zz", TrimStrategy::Tighten).unwrap_err();
        assert!(matches!(err, ClipError::NotFound(_)));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("extend-hook".parse::<TrimStrategy>().unwrap(), TrimStrategy::ExtendHook);
        assert!("shrink".parse::<TrimStrategy>().is_err());
    }
}
