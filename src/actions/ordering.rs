//! Ordering heuristics for accepted clips.

use crate::error::{ClipError, Result};
use crate::project::{Clip, ClipStatus, ProjectState};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStrategy {
    Chronological,
    BestFirst,
    TopicClusters,
    /// Rise and fall: middle third, weakest third rising, strongest third to close.
    #[default]
    EnergyArc,
}

impl OrderStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStrategy::Chronological => "chronological",
            OrderStrategy::BestFirst => "best_first",
            OrderStrategy::TopicClusters => "topic_clusters",
            OrderStrategy::EnergyArc => "energy_arc",
        }
    }
}

impl FromStr for OrderStrategy {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "chronological" => Ok(OrderStrategy::Chronological),
            "best_first" => Ok(OrderStrategy::BestFirst),
            "topic_clusters" => Ok(OrderStrategy::TopicClusters),
            "energy_arc" => Ok(OrderStrategy::EnergyArc),
            other => Err(ClipError::InvalidArguments(format!(
                "Unknown order strategy '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedClip {
    pub position: usize,
    pub clip_id: String,
    pub start_time: f64,
    pub final_score: f64,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSuggestion {
    pub strategy: OrderStrategy,
    pub clip_ids: Vec<String>,
    pub clips: Vec<OrderedClip>,
    pub rationale: String,
}

fn by_score_desc(clips: &mut [Clip]) {
    clips.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
}

fn category_of(clip: &Clip) -> &str {
    clip.category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(UNCATEGORIZED)
}

fn topic_clusters(clips: Vec<Clip>) -> Vec<Clip> {
    let mut groups: Vec<(String, Vec<Clip>)> = Vec::new();
    for clip in clips {
        let key = category_of(&clip).to_string();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(clip),
            None => groups.push((key, vec![clip])),
        }
    }
    for (_, members) in groups.iter_mut() {
        by_score_desc(members);
    }
    // Members are sorted, so the first one carries the group's best score
    groups.sort_by(|(_, a), (_, b)| b[0].final_score.total_cmp(&a[0].final_score));
    groups.into_iter().flat_map(|(_, members)| members).collect()
}

fn energy_arc(mut clips: Vec<Clip>) -> Vec<Clip> {
    by_score_desc(&mut clips);
    let n = clips.len();
    let third = n.div_ceil(3);
    let mid_end = (2 * third).min(n);

    let low: Vec<Clip> = clips.split_off(mid_end);
    let mid: Vec<Clip> = clips.split_off(third.min(n));
    let high = clips;

    mid.into_iter()
        .chain(low.into_iter().rev())
        .chain(high)
        .collect()
}

/// Reorder clips with the given strategy. Always a permutation of the input.
pub fn order_clips(clips: Vec<Clip>, strategy: OrderStrategy) -> Vec<Clip> {
    match strategy {
        OrderStrategy::Chronological => {
            let mut clips = clips;
            clips.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
            clips
        }
        OrderStrategy::BestFirst => {
            let mut clips = clips;
            by_score_desc(&mut clips);
            clips
        }
        OrderStrategy::TopicClusters => topic_clusters(clips),
        OrderStrategy::EnergyArc => energy_arc(clips),
    }
}

/// Suggest an order for the accepted clips. Does not modify the project.
pub fn suggest_order(state: &dyn ProjectState, strategy: OrderStrategy) -> Result<OrderSuggestion> {
    let accepted: Vec<Clip> = state
        .clips()
        .into_iter()
        .filter(|c| c.status == ClipStatus::Accepted)
        .collect();

    if accepted.is_empty() {
        return Err(ClipError::Precondition(
            "No accepted clips to order; accept some clips first".to_string(),
        ));
    }

    let ordered = order_clips(accepted, strategy);
    let rationale = match strategy {
        OrderStrategy::Chronological => "Clips in the order they happened.",
        OrderStrategy::BestFirst => "Strongest clips first to hold attention early.",
        OrderStrategy::TopicClusters => "Clips grouped by category, strongest group first.",
        OrderStrategy::EnergyArc => {
            "Opens mid-strength, dips to the weaker clips, then builds to the strongest."
        }
    };

    Ok(OrderSuggestion {
        strategy,
        clip_ids: ordered.iter().map(|c| c.id.clone()).collect(),
        clips: ordered
            .iter()
            .enumerate()
            .map(|(i, c)| OrderedClip {
                position: i + 1,
                clip_id: c.id.clone(),
                start_time: c.start_time,
                final_score: c.final_score,
                category: category_of(c).to_string(),
            })
            .collect(),
        rationale: rationale.to_string(),
    })
}
