//! Threshold-based batch review of pending clips.

use crate::error::Result;
use crate::project::{Clip, ClipStatus, ProjectState};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Thresholds a pending clip must meet to be accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCriteria {
    pub min_score: f64,
    pub min_hook_strength: f64,
    pub require_complete: bool,
    /// Stop accepting after this many; `None` means unlimited.
    pub max_to_accept: Option<usize>,
}

impl Default for ReviewCriteria {
    fn default() -> Self {
        Self {
            min_score: 70.0,
            min_hook_strength: 50.0,
            require_complete: false,
            max_to_accept: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDecision {
    pub clip_id: String,
    pub decision: ClipStatus,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub dry_run: bool,
    pub reviewed: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub criteria: ReviewCriteria,
    pub decisions: Vec<ReviewDecision>,
}

fn rejection_reason(clip: &Clip, criteria: &ReviewCriteria) -> Option<String> {
    if clip.final_score < criteria.min_score {
        return Some(format!(
            "score {:.0} below minimum {:.0}",
            clip.final_score, criteria.min_score
        ));
    }
    if clip.hook_strength < criteria.min_hook_strength {
        return Some(format!(
            "hook strength {:.0} below minimum {:.0}",
            clip.hook_strength, criteria.min_hook_strength
        ));
    }
    if criteria.require_complete && !clip.is_complete {
        return Some("clip is incomplete".to_string());
    }
    None
}

/// Decide every pending clip, in existing order, without touching state.
///
/// The first clips that qualify are accepted until `max_to_accept` is reached.
pub fn plan_review(clips: &[Clip], criteria: &ReviewCriteria) -> Vec<ReviewDecision> {
    let mut accepted = 0usize;
    clips
        .iter()
        .filter(|c| c.status == ClipStatus::Pending)
        .map(|clip| {
            let (decision, reason) = match rejection_reason(clip, criteria) {
                Some(reason) => (ClipStatus::Rejected, reason),
                None if criteria.max_to_accept.is_some_and(|cap| accepted >= cap) => {
                    (ClipStatus::Rejected, "acceptance limit reached".to_string())
                }
                None => {
                    accepted += 1;
                    (ClipStatus::Accepted, "meets criteria".to_string())
                }
            };
            ReviewDecision {
                clip_id: clip.id.clone(),
                decision,
                reason,
            }
        })
        .collect()
}

/// Review all pending clips, applying the decisions unless `dry_run` is set.
pub fn auto_review(
    state: &dyn ProjectState,
    criteria: &ReviewCriteria,
    dry_run: bool,
) -> Result<ReviewSummary> {
    let decisions = plan_review(&state.clips(), criteria);

    if !dry_run {
        for decision in &decisions {
            state.update_status(&decision.clip_id, decision.decision)?;
        }
    }

    let accepted = decisions
        .iter()
        .filter(|d| d.decision == ClipStatus::Accepted)
        .count();
    let rejected = decisions.len() - accepted;

    info!(
        "Auto review{}: {} accepted, {} rejected",
        if dry_run { " (dry run)" } else { "" },
        accepted,
        rejected
    );

    Ok(ReviewSummary {
        dry_run,
        reviewed: decisions.len(),
        accepted,
        rejected,
        criteria: criteria.clone(),
        decisions,
    })
}
