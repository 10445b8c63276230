//! Project state access.
//!
//! The engine never owns project data. It reads and mutates clips, transcript
//! words and dead-space segments through the [`ProjectState`] trait, which the
//! host application implements over its own state holder.

mod memory;
mod models;

#[cfg(test)]
pub(crate) mod fixtures;

pub use memory::MemoryProject;
pub use models::{
    format_timestamp, Clip, ClipPattern, ClipStatus, DeadSpace, ProjectSnapshot, TranscriptWord,
};

use crate::error::{ClipError, Result};
use std::path::PathBuf;

/// Typed read/write access to a clipping project.
///
/// Setters are deliberately narrow: the engine may change a clip's status,
/// its trim offsets, its hook/title text, and a dead space's removal flag.
/// Nothing else is ever written.
pub trait ProjectState: Send + Sync {
    /// All clips in their existing project order.
    fn clips(&self) -> Vec<Clip>;

    /// Look up a single clip.
    fn clip(&self, id: &str) -> Option<Clip> {
        self.clips().into_iter().find(|c| c.id == id)
    }

    /// Transcript words ordered by start time, or `None` if not transcribed.
    fn transcript(&self) -> Option<Vec<TranscriptWord>>;

    /// Detected dead-space segments.
    fn dead_spaces(&self) -> Vec<DeadSpace>;

    /// Path of the source media, if known.
    fn media_path(&self) -> Option<PathBuf>;

    /// Duration of the source media, if known.
    fn media_duration(&self) -> Option<f64>;

    fn update_status(&self, clip_id: &str, status: ClipStatus) -> Result<()>;

    fn update_trim(&self, clip_id: &str, trim_start_offset: f64, trim_end_offset: f64)
        -> Result<()>;

    /// Replace hook text and/or title. `None` leaves the field unchanged.
    fn update_hook(&self, clip_id: &str, hook_text: Option<String>, title: Option<String>)
        -> Result<()>;

    fn update_dead_space(&self, dead_space_id: &str, remove: bool) -> Result<()>;
}

/// Fetch a clip or fail with a not-found error.
pub fn require_clip(state: &dyn ProjectState, clip_id: &str) -> Result<Clip> {
    state
        .clip(clip_id)
        .ok_or_else(|| ClipError::NotFound(format!("Clip '{}' does not exist", clip_id)))
}

/// Fetch the transcript or fail with a not-found error.
pub fn require_transcript(state: &dyn ProjectState) -> Result<Vec<TranscriptWord>> {
    match state.transcript() {
        Some(words) if !words.is_empty() => Ok(words),
        _ => Err(ClipError::NotFound(
            "No transcript available for this project".to_string(),
        )),
    }
}

/// Words whose start time falls within `[start, end)`.
pub fn words_in_range(words: &[TranscriptWord], start: f64, end: f64) -> Vec<&TranscriptWord> {
    words
        .iter()
        .filter(|w| w.start >= start && w.start < end)
        .collect()
}

/// Best known length of the project timeline.
pub fn project_duration(state: &dyn ProjectState) -> f64 {
    if let Some(duration) = state.media_duration() {
        return duration;
    }

    let transcript_end = state
        .transcript()
        .and_then(|words| words.last().map(|w| w.end))
        .unwrap_or(0.0);
    let clips_end = state
        .clips()
        .iter()
        .map(|c| c.end_time)
        .fold(0.0_f64, f64::max);

    transcript_end.max(clips_end)
}

/// Resolve an optional clip id or explicit time range into a `(start, end)` pair.
///
/// A clip id wins over explicit times; missing bounds default to the project
/// start and end.
pub fn resolve_range(
    state: &dyn ProjectState,
    clip_id: Option<&str>,
    start_time: Option<f64>,
    end_time: Option<f64>,
) -> Result<(f64, f64)> {
    if let Some(id) = clip_id {
        let clip = require_clip(state, id)?;
        return Ok((clip.effective_start(), clip.effective_end()));
    }

    let start = start_time.unwrap_or(0.0);
    let end = end_time.unwrap_or_else(|| project_duration(state));

    if end <= start {
        return Err(ClipError::InvalidArguments(format!(
            "Time range is empty ({:.2}s to {:.2}s)",
            start, end
        )));
    }

    Ok((start, end))
}
