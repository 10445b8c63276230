//! Duration-targeted VOD compilation.
//!
//! Selection runs in two phases over clips sorted by score:
//!
//! 1. Greedy fill: add clips until the target is reached, stopping at the
//!    first clip that would push the total past the 115% cap.
//! 2. Gap fill: only if phase 1 ended under 90% of the target. Each remaining
//!    clip is admitted when its cost is at most 1.5x the remaining gap and it
//!    keeps the total within the cap.
//!
//! Every clip after the first costs its duration plus one transition.

use crate::error::{ClipError, Result};
use crate::project::{Clip, ClipStatus, ProjectState};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

/// Hard ceiling on the compiled length, as a multiple of the target.
const OVERSHOOT_CAP: f64 = 1.15;
/// Below this fraction of the target the gap-fill phase runs.
const GAP_FILL_BELOW: f64 = 0.9;
/// A gap-fill clip may cost at most this multiple of the remaining gap.
const GAP_TOLERANCE: f64 = 1.5;

/// Overall feel of a compilation, which decides clip order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Vibe {
    #[default]
    Chronological,
    HighEnergy,
    Building,
    BestMomentsInterspersed,
}

impl Vibe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vibe::Chronological => "chronological",
            Vibe::HighEnergy => "high-energy",
            Vibe::Building => "building",
            Vibe::BestMomentsInterspersed => "best-moments-interspersed",
        }
    }
}

impl FromStr for Vibe {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "chronological" => Ok(Vibe::Chronological),
            "high-energy" => Ok(Vibe::HighEnergy),
            "building" => Ok(Vibe::Building),
            "best-moments-interspersed" => Ok(Vibe::BestMomentsInterspersed),
            other => Err(ClipError::InvalidArguments(format!(
                "Unknown vibe '{}' (expected chronological, high-energy, building or best-moments-interspersed)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Vibe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the selection phases.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Selected clips in score order.
    pub clips: Vec<Clip>,
    /// Summed duration including transitions.
    pub total_seconds: f64,
}

fn cost(clip: &Clip, already_selected: usize, transition: f64) -> f64 {
    let transition = if already_selected == 0 { 0.0 } else { transition };
    clip.effective_duration() + transition
}

/// Pick clips whose combined length lands near `target_seconds`.
pub fn select_for_duration(pool: &[Clip], target_seconds: f64, transition: f64) -> Selection {
    let mut ranked: Vec<&Clip> = pool.iter().collect();
    ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

    let cap = target_seconds * OVERSHOOT_CAP;
    let mut taken = vec![false; ranked.len()];
    let mut selected: Vec<Clip> = Vec::new();
    let mut total = 0.0;

    for (i, clip) in ranked.iter().enumerate() {
        if total >= target_seconds {
            break;
        }
        let c = cost(clip, selected.len(), transition);
        if total + c > cap {
            break;
        }
        total += c;
        taken[i] = true;
        selected.push((*clip).clone());
    }

    if total < target_seconds * GAP_FILL_BELOW {
        debug!(
            "Phase 1 reached {:.1}s of {:.1}s, filling the gap",
            total, target_seconds
        );
        for (i, clip) in ranked.iter().enumerate() {
            if taken[i] {
                continue;
            }
            let gap = target_seconds - total;
            if gap <= 0.0 {
                break;
            }
            let c = cost(clip, selected.len(), transition);
            if c <= gap * GAP_TOLERANCE && total + c <= cap {
                total += c;
                taken[i] = true;
                selected.push((*clip).clone());
            }
        }
    }

    Selection {
        clips: selected,
        total_seconds: total,
    }
}

/// Arrange selected clips for the requested vibe.
pub fn order_by_vibe(mut clips: Vec<Clip>, vibe: Vibe) -> Vec<Clip> {
    match vibe {
        Vibe::Chronological => {
            clips.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
            clips
        }
        Vibe::HighEnergy => {
            clips.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
            clips
        }
        Vibe::Building => {
            clips.sort_by(|a, b| a.final_score.total_cmp(&b.final_score));
            clips
        }
        Vibe::BestMomentsInterspersed => {
            clips.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
            let bottom = clips.split_off(clips.len().div_ceil(2));
            let mut top = clips.into_iter();
            let mut bottom = bottom.into_iter();
            let mut out = Vec::new();
            loop {
                match (top.next(), bottom.next()) {
                    (None, None) => break,
                    (a, b) => out.extend(a.into_iter().chain(b)),
                }
            }
            out
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationEntry {
    pub clip_id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub final_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Compilation {
    pub vibe: Vibe,
    pub target_duration_seconds: f64,
    pub total_duration_seconds: f64,
    pub transition_seconds: f64,
    pub clip_count: usize,
    /// Clips in playback order.
    pub clips: Vec<CompilationEntry>,
    /// Clips whose status changed to accepted.
    pub newly_accepted: Vec<String>,
    /// Previously accepted clips that were not selected.
    pub returned_to_pending: Vec<String>,
}

/// Build a compilation near `target_minutes` long and apply the selection.
///
/// Every clip is a candidate regardless of status. Selected clips become
/// accepted; accepted clips left out go back to pending.
pub fn create_compilation(
    state: &dyn ProjectState,
    target_minutes: f64,
    vibe: Vibe,
    transition_seconds: f64,
) -> Result<Compilation> {
    if target_minutes.is_nan() || target_minutes <= 0.0 {
        return Err(ClipError::InvalidArguments(
            "targetDurationMinutes must be greater than zero".to_string(),
        ));
    }
    if transition_seconds < 0.0 {
        return Err(ClipError::InvalidArguments(
            "transitionSeconds cannot be negative".to_string(),
        ));
    }

    let clips = state.clips();
    if clips.is_empty() {
        return Err(ClipError::Precondition(
            "The project has no clips to compile".to_string(),
        ));
    }

    let target_seconds = target_minutes * 60.0;
    let selection = select_for_duration(&clips, target_seconds, transition_seconds);

    let mut newly_accepted = Vec::new();
    for clip in &selection.clips {
        if clip.status != ClipStatus::Accepted {
            state.update_status(&clip.id, ClipStatus::Accepted)?;
            newly_accepted.push(clip.id.clone());
        }
    }

    let mut returned_to_pending = Vec::new();
    for clip in clips.iter().filter(|c| c.status == ClipStatus::Accepted) {
        if !selection.clips.iter().any(|s| s.id == clip.id) {
            state.update_status(&clip.id, ClipStatus::Pending)?;
            returned_to_pending.push(clip.id.clone());
        }
    }

    let ordered = order_by_vibe(selection.clips, vibe);
    info!(
        "Compilation: {} clips, {:.1}s of {:.1}s target ({})",
        ordered.len(),
        selection.total_seconds,
        target_seconds,
        vibe
    );

    Ok(Compilation {
        vibe,
        target_duration_seconds: target_seconds,
        total_duration_seconds: selection.total_seconds,
        transition_seconds,
        clip_count: ordered.len(),
        clips: ordered
            .into_iter()
            .map(|c| CompilationEntry {
                start_time: c.effective_start(),
                end_time: c.effective_end(),
                duration: c.effective_duration(),
                final_score: c.final_score,
                title: c.title,
                clip_id: c.id,
            })
            .collect(),
        newly_accepted,
        returned_to_pending,
    })
}
