//! Data models for clipping projects.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Transcript Types
// ============================================================================

/// A single transcribed word with timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptWord {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// The word text.
    pub text: String,
}

impl TranscriptWord {
    pub fn new(start: f64, end: f64, text: &str) -> Self {
        Self {
            start,
            end,
            text: text.to_string(),
        }
    }
}

// ============================================================================
// Clip Types
// ============================================================================

/// Review status of a clip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ClipStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl std::str::FromStr for ClipStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ClipStatus::Pending),
            "accepted" | "accept" => Ok(ClipStatus::Accepted),
            "rejected" | "reject" => Ok(ClipStatus::Rejected),
            _ => Err(format!("Unknown clip status: {}", s)),
        }
    }
}

impl std::fmt::Display for ClipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipStatus::Pending => write!(f, "pending"),
            ClipStatus::Accepted => write!(f, "accepted"),
            ClipStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Rhetorical shape of a clip, as tagged by the detection pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum ClipPattern {
    Payoff,
    Monologue,
    Debate,
    Laughter,
    Story,
    HotTake,
    Reaction,
    #[default]
    Other,
}

impl ClipPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipPattern::Payoff => "payoff",
            ClipPattern::Monologue => "monologue",
            ClipPattern::Debate => "debate",
            ClipPattern::Laughter => "laughter",
            ClipPattern::Story => "story",
            ClipPattern::HotTake => "hot_take",
            ClipPattern::Reaction => "reaction",
            ClipPattern::Other => "other",
        }
    }
}

impl From<String> for ClipPattern {
    fn from(s: String) -> Self {
        match s.to_lowercase().replace('-', "_").as_str() {
            "payoff" => ClipPattern::Payoff,
            "monologue" => ClipPattern::Monologue,
            "debate" => ClipPattern::Debate,
            "laughter" => ClipPattern::Laughter,
            "story" => ClipPattern::Story,
            "hot_take" | "hottake" => ClipPattern::HotTake,
            "reaction" => ClipPattern::Reaction,
            _ => ClipPattern::Other,
        }
    }
}

impl From<ClipPattern> for String {
    fn from(pattern: ClipPattern) -> Self {
        pattern.as_str().to_string()
    }
}

fn default_true() -> bool {
    true
}

/// A scored, time-bounded candidate highlight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: String,
    /// Detected start time in seconds.
    pub start_time: f64,
    /// Detected end time in seconds.
    pub end_time: f64,
    #[serde(default)]
    pub trim_start_offset: f64,
    #[serde(default)]
    pub trim_end_offset: f64,
    /// Untrimmed duration in seconds.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub pattern: ClipPattern,
    /// Overall score (0-100).
    pub final_score: f64,
    /// Strength of the opening hook (0-100).
    #[serde(default)]
    pub hook_strength: f64,
    #[serde(default)]
    pub algorithm_score: f64,
    #[serde(default = "default_true")]
    pub is_complete: bool,
    #[serde(default)]
    pub status: ClipStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_text: Option<String>,
}

impl Clip {
    /// Create a new pending clip with no trim applied.
    pub fn new(id: &str, start_time: f64, end_time: f64, final_score: f64) -> Self {
        Self {
            id: id.to_string(),
            start_time,
            end_time,
            trim_start_offset: 0.0,
            trim_end_offset: 0.0,
            duration: end_time - start_time,
            pattern: ClipPattern::Other,
            final_score,
            hook_strength: 0.0,
            algorithm_score: final_score,
            is_complete: true,
            status: ClipStatus::Pending,
            category: None,
            title: None,
            hook_text: None,
        }
    }

    /// Start of the playable range.
    pub fn effective_start(&self) -> f64 {
        self.start_time + self.trim_start_offset
    }

    /// End of the playable range.
    pub fn effective_end(&self) -> f64 {
        self.end_time + self.trim_end_offset
    }

    /// Length of the playable range in seconds.
    pub fn effective_duration(&self) -> f64 {
        (self.effective_end() - self.effective_start()).max(0.0)
    }

    /// Short label for prompts and CLI output.
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) => format!("{} \"{}\"", self.id, title),
            None => self.id.clone(),
        }
    }
}

// ============================================================================
// Dead Space
// ============================================================================

/// A detected silence or low-activity interval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeadSpace {
    pub id: String,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub duration: f64,
    /// Whether this interval is marked for removal.
    #[serde(default)]
    pub remove: bool,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Everything the engine can see about one project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_duration: Option<f64>,
    #[serde(default)]
    pub clips: Vec<Clip>,
    /// `None` when the source has not been transcribed yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Vec<TranscriptWord>>,
    #[serde(default)]
    pub dead_spaces: Vec<DeadSpace>,
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0) as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_range() {
        let mut clip = Clip::new("c1", 10.0, 40.0, 80.0);
        clip.trim_start_offset = 1.5;
        clip.trim_end_offset = -2.0;

        assert_eq!(clip.effective_start(), 11.5);
        assert_eq!(clip.effective_end(), 38.0);
        assert_eq!(clip.effective_duration(), 26.5);
        assert_eq!(clip.duration, 30.0);
    }

    #[test]
    fn test_clip_deserialize_camel_case() {
        let json = r#"{
            "id": "c7",
            "startTime": 5.0,
            "endTime": 20.0,
            "finalScore": 72,
            "hookStrength": 60,
            "pattern": "hot-take",
            "status": "accepted"
        }"#;

        let clip: Clip = serde_json::from_str(json).unwrap();
        assert_eq!(clip.pattern, ClipPattern::HotTake);
        assert_eq!(clip.status, ClipStatus::Accepted);
        assert!(clip.is_complete);
        assert_eq!(clip.trim_start_offset, 0.0);
    }

    #[test]
    fn test_unknown_pattern_is_other() {
        let pattern: ClipPattern = serde_json::from_str("\"interview\"").unwrap();
        assert_eq!(pattern, ClipPattern::Other);
        assert_eq!(serde_json::to_string(&ClipPattern::HotTake).unwrap(), "\"hot_take\"");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Accepted".parse::<ClipStatus>().unwrap(), ClipStatus::Accepted);
        assert_eq!("reject".parse::<ClipStatus>().unwrap(), ClipStatus::Rejected);
        assert!("maybe".parse::<ClipStatus>().is_err());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(65.0), "01:05");
        assert_eq!(format_timestamp(3665.0), "01:01:05");
    }
}
