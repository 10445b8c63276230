//! Analyze command: quality, speech and boundary report for one clip.

use super::Workspace;
use crate::analysis::{analyze_quality, analyze_speech, find_optimal_boundaries};
use crate::cli::Output;
use crate::config::Settings;
use crate::project::{format_timestamp, require_clip, require_transcript};
use anyhow::Result;
use std::path::Path;

/// Run the analyze command.
pub fn run_analyze(project: Option<&Path>, clip_id: &str, settings: &Settings) -> Result<()> {
    let workspace = Workspace::open(project)?;
    let state = workspace.project.as_ref();
    let clip = require_clip(state, clip_id)?;
    let words = require_transcript(state)?;

    Output::header(&clip.label());
    Output::clip(&clip);

    let quality = analyze_quality(&clip, &words);
    Output::header("Quality");
    Output::kv("Grade", &quality.grade);
    Output::kv("Final score", &format!("{:.0}", quality.final_score));
    Output::kv("Hook strength", &format!("{:.0}", quality.hook_strength));
    Output::kv(
        "Pacing",
        &format!(
            "{:.2} words/s (score {:.0})",
            quality.words_per_second, quality.pacing_score
        ),
    );
    Output::kv("Average energy", &format!("{:.2}", quality.average_energy));
    Output::kv("Complete thought", if quality.is_complete { "yes" } else { "no" });
    for issue in &quality.issues {
        Output::list_item(&format!("issue: {}", issue));
    }
    for suggestion in &quality.suggestions {
        Output::list_item(&format!("suggestion: {}", suggestion));
    }

    let speech = analyze_speech(&words, clip.effective_start(), clip.effective_end());
    Output::header("Speech");
    Output::kv("Words", &speech.word_count.to_string());
    Output::kv("Words per minute", &format!("{:.0}", speech.words_per_minute));
    Output::kv(
        "Pauses",
        &format!(
            "{} (average {:.2}s, longest {:.2}s)",
            speech.pause_count, speech.average_pause, speech.longest_pause
        ),
    );
    if !speech.natural_cut_points.is_empty() {
        let cuts: Vec<String> = speech
            .natural_cut_points
            .iter()
            .map(|t| format_timestamp(*t))
            .collect();
        Output::kv("Natural cut points", &cuts.join(", "));
    }

    let boundaries =
        find_optimal_boundaries(&clip, &words, settings.analysis.boundary_max_extension);
    Output::header("Boundaries");
    Output::kv(
        "Suggested",
        &format!(
            "{}-{} (start {:+.2}s, end {:+.2}s)",
            format_timestamp(boundaries.suggested_start),
            format_timestamp(boundaries.suggested_end),
            boundaries.offset.start,
            boundaries.offset.end
        ),
    );
    Output::kv("Reason", &boundaries.reason);

    Ok(())
}
