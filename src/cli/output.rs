//! CLI output formatting utilities.

use crate::agent::{ToolCall, ToolCallStatus};
use crate::project::{format_timestamp, Clip, ClipStatus};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print one clip with its status, score and effective range.
    pub fn clip(clip: &Clip) {
        let status = match clip.status {
            ClipStatus::Accepted => style(clip.status.to_string()).green(),
            ClipStatus::Rejected => style(clip.status.to_string()).red(),
            ClipStatus::Pending => style(clip.status.to_string()).yellow(),
        };
        println!(
            "  {} {} [{}] score {:.0} @ {}-{} ({})",
            style("*").cyan(),
            style(clip.label()).bold(),
            status,
            clip.final_score,
            style(format_timestamp(clip.effective_start())).cyan(),
            style(format_timestamp(clip.effective_end())).cyan(),
            format_duration(clip.effective_duration())
        );
    }

    /// Print a finished tool call as one line.
    pub fn tool_call(call: &ToolCall) {
        let (mark, detail) = match call.status {
            ToolCallStatus::Success => (
                style("✓").green(),
                call.result
                    .as_ref()
                    .map(|r| content_preview(&r.to_string(), 80))
                    .unwrap_or_default(),
            ),
            ToolCallStatus::Error => (
                style("✗").red(),
                call.error.clone().unwrap_or_default(),
            ),
            _ => (style("…").dim(), String::new()),
        };
        println!(
            "  {} {} {}",
            mark,
            style(format!("[{}]", call.name)).dim(),
            style(detail).dim()
        );
    }

    /// Print a JSON value, pretty.
    pub fn json(value: &Value) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{}", text),
            Err(_) => println!("{}", value),
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Format duration in seconds to a human-readable string.
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0).round() as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_len: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_len {
        content
    } else {
        format!("{}...", content.chars().take(max_len).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42.4), "42s");
        assert_eq!(format_duration(125.0), "2m 5s");
        assert_eq!(format_duration(3725.0), "1h 2m 5s");
    }

    #[test]
    fn test_content_preview_respects_char_boundaries() {
        assert_eq!(content_preview("short", 10), "short");
        assert_eq!(content_preview("héllo wörld", 5), "héllo...");
        assert_eq!(content_preview("a\nb", 10), "a b");
    }
}
