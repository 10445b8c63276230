//! System prompt grounded in live project state.

use crate::config::Prompts;
use crate::project::{format_timestamp, Clip, ClipStatus, ProjectState};
use std::collections::HashMap;

/// Clip counts by status plus the mean score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusCounts {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub pending: usize,
    pub average_score: f64,
}

impl StatusCounts {
    pub fn of(clips: &[Clip]) -> Self {
        let count = |status: ClipStatus| clips.iter().filter(|c| c.status == status).count();
        let average_score = if clips.is_empty() {
            0.0
        } else {
            clips.iter().map(|c| c.final_score).sum::<f64>() / clips.len() as f64
        };
        Self {
            total: clips.len(),
            accepted: count(ClipStatus::Accepted),
            rejected: count(ClipStatus::Rejected),
            pending: count(ClipStatus::Pending),
            average_score,
        }
    }
}

/// The `limit` best clips by score, one line each.
pub fn top_clips_summary(clips: &[Clip], limit: usize) -> String {
    if clips.is_empty() {
        return "(no clips yet)".to_string();
    }

    let mut ranked: Vec<&Clip> = clips.iter().collect();
    ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

    ranked
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{}. {} [{}] score {:.0}, hook {:.0}, {}-{} ({:.1}s), {}{}",
                i + 1,
                c.label(),
                c.pattern.as_str(),
                c.final_score,
                c.hook_strength,
                format_timestamp(c.effective_start()),
                format_timestamp(c.effective_end()),
                c.effective_duration(),
                c.status,
                if c.is_complete { "" } else { ", incomplete" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Variables available to the assistant system prompt.
pub fn prompt_variables(state: &dyn ProjectState, top_clips: usize) -> HashMap<String, String> {
    let clips = state.clips();
    let counts = StatusCounts::of(&clips);

    let transcript_status = match state.transcript() {
        Some(words) if !words.is_empty() => format!("available ({} words)", words.len()),
        _ => "not available; transcript-based analysis will fail".to_string(),
    };

    let dead_spaces = state.dead_spaces();
    let dead_space = if dead_spaces.is_empty() {
        "none detected".to_string()
    } else {
        let marked = dead_spaces.iter().filter(|d| d.remove).count();
        let total: f64 = dead_spaces.iter().map(|d| d.duration).sum();
        format!(
            "{} segments ({:.1}s total), {} marked for removal",
            dead_spaces.len(),
            total,
            marked
        )
    };

    let media_duration = state
        .media_duration()
        .map(format_timestamp)
        .unwrap_or_else(|| "unknown".to_string());

    let mut vars = HashMap::new();
    vars.insert("media_duration".to_string(), media_duration);
    vars.insert("clip_count".to_string(), counts.total.to_string());
    vars.insert("accepted".to_string(), counts.accepted.to_string());
    vars.insert("rejected".to_string(), counts.rejected.to_string());
    vars.insert("pending".to_string(), counts.pending.to_string());
    vars.insert("average_score".to_string(), format!("{:.1}", counts.average_score));
    vars.insert("transcript_status".to_string(), transcript_status);
    vars.insert("dead_space".to_string(), dead_space);
    vars.insert("top_clips".to_string(), top_clips_summary(&clips, top_clips));
    vars
}

/// Render the assistant system prompt for the current project state.
pub fn build_system_prompt(
    state: &dyn ProjectState,
    prompts: &Prompts,
    top_clips: usize,
) -> String {
    let vars = prompt_variables(state, top_clips);
    prompts.render_with_custom(&prompts.assistant.system, &vars)
}

/// System prompt for the summarizing follow-up call.
pub fn build_continuation_prompt(system_prompt: &str, prompts: &Prompts) -> String {
    format!("{}\n\n{}", system_prompt, prompts.assistant.continuation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::fixtures::{project_with, sample_project};

    #[test]
    fn test_prompt_reflects_live_counts() {
        let project = sample_project();
        project.update_status("c2", ClipStatus::Accepted).unwrap();
        project.update_status("c3", ClipStatus::Rejected).unwrap();

        let prompt = build_system_prompt(&project, &Prompts::default(), 5);
        assert!(prompt.contains("3 total (1 accepted, 1 rejected, 1 pending)"));
        assert!(prompt.contains("Average clip score: 70.7"));
        assert!(prompt.contains("2 segments (14.0s total), 0 marked for removal"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_top_clips_are_limited_and_ranked() {
        let project = sample_project();
        let summary = top_clips_summary(&project.clips(), 2);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1. c1 \"Opening rant\""));
        assert!(lines[1].starts_with("2. c2"));
    }

    #[test]
    fn test_empty_project() {
        let project = project_with(Vec::new(), None);
        let vars = prompt_variables(&project, 5);
        assert_eq!(vars["top_clips"], "(no clips yet)");
        assert_eq!(vars["average_score"], "0.0");
        assert!(vars["transcript_status"].starts_with("not available"));
    }
}
