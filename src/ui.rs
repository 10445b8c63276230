//! Playback and editor callbacks.
//!
//! Playback tools do not touch project data; they ask the host UI to move the
//! playhead, focus a clip or toggle playback.

use console::style;

/// Hooks into the host's player and editor.
pub trait UiCallbacks: Send + Sync {
    fn seek_to_time(&self, time: f64);
    fn select_clip(&self, clip_id: &str);
    /// Called after a clip's trim offsets changed.
    fn trim_clip(&self, clip_id: &str, trim_start_offset: f64, trim_end_offset: f64);
    fn play_pause(&self);
}

/// Prints UI requests to stderr. Used by the CLI, which has no player.
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl UiCallbacks for ConsoleUi {
    fn seek_to_time(&self, time: f64) {
        eprintln!(
            "{} seek to {}",
            style("▶").cyan(),
            crate::project::format_timestamp(time)
        );
    }

    fn select_clip(&self, clip_id: &str) {
        eprintln!("{} select clip {}", style("▶").cyan(), style(clip_id).bold());
    }

    fn trim_clip(&self, clip_id: &str, trim_start_offset: f64, trim_end_offset: f64) {
        eprintln!(
            "{} trim {} ({:+.2}s / {:+.2}s)",
            style("▶").cyan(),
            style(clip_id).bold(),
            trim_start_offset,
            trim_end_offset
        );
    }

    fn play_pause(&self) {
        eprintln!("{} play/pause", style("▶").cyan());
    }
}
