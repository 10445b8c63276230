//! Side-by-side clip comparison.

use super::energy::mean_energy;
use crate::error::{ClipError, Result};
use crate::project::{words_in_range, Clip, TranscriptWord};
use serde::Serialize;

/// Windows used when estimating a clip's energy.
const CLIP_ENERGY_RESOLUTION: usize = 10;

/// A dimension clips can be compared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Hook,
    Energy,
    Pacing,
    ViralPotential,
}

impl Criterion {
    pub const DEFAULTS: [Criterion; 4] = [
        Criterion::Hook,
        Criterion::Energy,
        Criterion::Pacing,
        Criterion::ViralPotential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Hook => "hook",
            Criterion::Energy => "energy",
            Criterion::Pacing => "pacing",
            Criterion::ViralPotential => "viral_potential",
        }
    }

    fn value(&self, scores: &ClipScores) -> f64 {
        match self {
            Criterion::Hook => scores.hook,
            Criterion::Energy => scores.energy,
            Criterion::Pacing => scores.pacing,
            Criterion::ViralPotential => scores.viral_potential,
        }
    }
}

impl std::str::FromStr for Criterion {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "hook" => Ok(Criterion::Hook),
            "energy" => Ok(Criterion::Energy),
            "pacing" => Ok(Criterion::Pacing),
            "viral_potential" | "viral" => Ok(Criterion::ViralPotential),
            _ => Err(ClipError::InvalidArguments(format!(
                "Unknown comparison criterion: {}",
                s
            ))),
        }
    }
}

/// Sub-scores for one clip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipScores {
    pub clip_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub final_score: f64,
    pub hook: f64,
    pub energy: f64,
    pub pacing: f64,
    pub viral_potential: f64,
    pub words_per_second: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionWinner {
    pub criterion: Criterion,
    pub clip_id: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipComparison {
    pub clips: Vec<ClipScores>,
    pub winners: Vec<CriterionWinner>,
    pub overall_winner: String,
    /// Requested ids that did not resolve to a clip.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_clip_ids: Vec<String>,
}

/// Pacing score from speaking rate.
pub fn pacing_score(words_per_second: f64) -> f64 {
    if words_per_second > 3.0 {
        85.0
    } else if words_per_second > 2.0 {
        70.0
    } else {
        55.0
    }
}

/// Words per second over a clip's playable range.
pub fn words_per_second(clip: &Clip, words: &[TranscriptWord]) -> f64 {
    let duration = clip.effective_duration();
    if duration <= 0.0 {
        return 0.0;
    }
    words_in_range(words, clip.effective_start(), clip.effective_end()).len() as f64 / duration
}

/// Compute every sub-score for a clip.
pub fn score_clip(clip: &Clip, words: &[TranscriptWord]) -> ClipScores {
    let wps = words_per_second(clip, words);
    ClipScores {
        clip_id: clip.id.clone(),
        title: clip.title.clone(),
        final_score: clip.final_score,
        hook: clip.hook_strength,
        energy: mean_energy(
            words,
            clip.effective_start(),
            clip.effective_end(),
            CLIP_ENERGY_RESOLUTION,
        ),
        pacing: pacing_score(wps),
        viral_potential: (0.6 * clip.final_score + 0.4 * clip.hook_strength).round(),
        words_per_second: wps,
    }
}

/// Compare the clips named by `clip_ids`, in request order. The first clip wins ties.
///
/// Ids with no matching clip are reported in `missing_clip_ids`; at least two
/// must resolve.
pub fn compare_clips(
    available: &[Clip],
    clip_ids: &[String],
    words: &[TranscriptWord],
    criteria: &[Criterion],
) -> Result<ClipComparison> {
    let mut clips = Vec::new();
    let mut missing_clip_ids = Vec::new();
    for id in clip_ids {
        match available.iter().find(|c| &c.id == id) {
            Some(clip) => clips.push(clip),
            None => missing_clip_ids.push(id.clone()),
        }
    }

    if clips.len() < 2 {
        return Err(ClipError::Precondition(format!(
            "At least 2 clips are required for comparison, found {}",
            clips.len()
        )));
    }

    let scores: Vec<ClipScores> = clips.iter().map(|c| score_clip(c, words)).collect();

    let winners = criteria
        .iter()
        .filter_map(|criterion| {
            best_by(&scores, |s| criterion.value(s)).map(|s| CriterionWinner {
                criterion: *criterion,
                clip_id: s.clip_id.clone(),
                value: criterion.value(s),
            })
        })
        .collect();

    let overall_winner = best_by(&scores, |s| s.final_score)
        .map(|s| s.clip_id.clone())
        .unwrap_or_default();

    Ok(ClipComparison {
        clips: scores,
        winners,
        overall_winner,
        missing_clip_ids,
    })
}

fn best_by<F>(scores: &[ClipScores], value: F) -> Option<&ClipScores>
where
    F: Fn(&ClipScores) -> f64,
{
    scores
        .iter()
        .fold(None, |best: Option<&ClipScores>, s| match best {
            Some(b) if value(b) >= value(s) => Some(b),
            _ => Some(s),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::fixtures::{clip, speech};

    #[test]
    fn test_pacing_thresholds() {
        assert_eq!(pacing_score(3.5), 85.0);
        assert_eq!(pacing_score(3.0), 70.0);
        assert_eq!(pacing_score(2.5), 70.0);
        assert_eq!(pacing_score(2.0), 55.0);
        assert_eq!(pacing_score(0.0), 55.0);
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_requires_two_clips() {
        let available = [clip("a", 0.0, 10.0, 50.0, 50.0)];
        let err = compare_clips(&available, &ids(&["a", "zz"]), &[], &Criterion::DEFAULTS)
            .unwrap_err();
        assert!(matches!(err, ClipError::Precondition(_)));
    }

    #[test]
    fn test_missing_ids_are_reported() {
        let available = [
            clip("a", 0.0, 10.0, 50.0, 50.0),
            clip("b", 10.0, 20.0, 60.0, 50.0),
        ];
        let comparison =
            compare_clips(&available, &ids(&["b", "zz", "a"]), &[], &Criterion::DEFAULTS)
                .unwrap();
        assert_eq!(comparison.missing_clip_ids, vec!["zz".to_string()]);
        let order: Vec<&str> = comparison.clips.iter().map(|c| c.clip_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);

        let value = serde_json::to_value(&comparison).unwrap();
        assert_eq!(value["missingClipIds"], serde_json::json!(["zz"]));
        assert!(value.get("unresolved").is_none());

        let complete = compare_clips(&available, &ids(&["a", "b"]), &[], &[Criterion::Hook])
            .unwrap();
        let value = serde_json::to_value(&complete).unwrap();
        assert!(value.get("missingClipIds").is_none());
    }

    #[test]
    fn test_winners_per_criterion() {
        let mut words = speech(0.0, 10.0);
        words.extend(speech(20.0, 22.0));
        let fast = clip("fast", 0.0, 10.0, 60.0, 90.0);
        let slow = clip("slow", 20.0, 30.0, 80.0, 40.0);

        let comparison = compare_clips(
            &[fast, slow],
            &ids(&["fast", "slow"]),
            &words,
            &Criterion::DEFAULTS,
        )
        .unwrap();

        let winner = |c: Criterion| {
            comparison
                .winners
                .iter()
                .find(|w| w.criterion == c)
                .map(|w| w.clip_id.as_str())
        };
        assert_eq!(winner(Criterion::Hook), Some("fast"));
        assert_eq!(winner(Criterion::Energy), Some("fast"));
        assert_eq!(winner(Criterion::Pacing), Some("fast"));
        // 0.6*60+0.4*90 = 72 vs 0.6*80+0.4*40 = 64
        assert_eq!(winner(Criterion::ViralPotential), Some("fast"));
        assert_eq!(comparison.overall_winner, "slow");
    }

    #[test]
    fn test_ties_go_to_first_clip() {
        let a = clip("a", 0.0, 10.0, 70.0, 50.0);
        let b = clip("b", 10.0, 20.0, 70.0, 50.0);
        let comparison =
            compare_clips(&[a, b], &ids(&["a", "b"]), &[], &[Criterion::Hook]).unwrap();
        assert_eq!(comparison.winners[0].clip_id, "a");
        assert_eq!(comparison.overall_winner, "a");
    }

    #[test]
    fn test_parse_criterion() {
        assert_eq!("viral-potential".parse::<Criterion>().unwrap(), Criterion::ViralPotential);
        assert!("loudness".parse::<Criterion>().is_err());
    }
}
