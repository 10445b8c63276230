//! Prompt templates for Clipagent.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub assistant: AssistantPrompts,
    pub hooks: HookPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for the editing assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantPrompts {
    pub system: String,
    /// Appended to the system prompt for the summarizing follow-up call.
    pub continuation: String,
}

impl Default for AssistantPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an editing assistant inside a video clipping application. You help the user review, trim, order and compile short clips detected from a longer recording.

## Current project
- Media duration: {{media_duration}}
- Clips: {{clip_count}} total ({{accepted}} accepted, {{rejected}} rejected, {{pending}} pending)
- Average clip score: {{average_score}}
- Transcript: {{transcript_status}}
- Dead space: {{dead_space}}

## Top clips
{{top_clips}}

## Tools
You can act on the project with tools. Analysis tools (analyze_clip_quality, analyze_energy_curve, analyze_speech_patterns, find_optimal_boundaries, detect_highlights, compare_clips) never change anything. Action tools (smart_trim_clip, auto_review_clips, suggest_clip_order, run_detection, create_vod_compilation, regenerate_hooks, set_clip_status, trim_clip, set_dead_space_removal) change the project. Playback tools (seek_to_time, select_clip, play_pause) control the player.

Guidelines:
- Refer to clips by their id
- Tools run in the order you list them, so later tools see the effects of earlier ones
- Prefer auto_review_clips with dryRun=true before a real batch review when the user is unsure
- Keep answers short and concrete; mention scores and timestamps when relevant"#
                .to_string(),
            continuation: r#"The tools you requested have finished. Summarize for the user what was done and what the results mean, in a few sentences. Mention failures plainly. Do not request more tools."#
                .to_string(),
        }
    }
}

/// Prompts for hook and title regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HookPrompts {
    pub system: String,
    pub user: String,
}

impl Default for HookPrompts {
    fn default() -> Self {
        Self {
            system: r#"You write hooks and titles for short-form video clips.

A hook is the caption shown in the first seconds of the clip. It must make a viewer stop scrolling: concrete, under 12 words, no hashtags, no emojis.
A title is a short label for the clip, under 8 words.

Respond with ONLY a JSON object and nothing else:
{"hookText": "...", "title": "..."}"#
                .to_string(),
            user: r#"Clip {{clip_id}} ({{pattern}}, score {{score}})
Current hook: {{current_hook}}
Current title: {{current_title}}

Transcript:
{{transcript}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let assistant_path = custom_path.join("assistant.toml");
            if assistant_path.exists() {
                let content = std::fs::read_to_string(&assistant_path)?;
                prompts.assistant = toml::from_str(&content)?;
            }

            let hooks_path = custom_path.join("hooks.toml");
            if hooks_path.exists() {
                let content = std::fs::read_to_string(&hooks_path)?;
                prompts.hooks = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.assistant.system.contains("{{top_clips}}"));
        assert!(prompts.hooks.system.contains("hookText"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} clips.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 clips.");
    }

    #[test]
    fn test_custom_variables_lose_to_provided() {
        let mut prompts = Prompts::default();
        prompts.variables.insert("channel".to_string(), "default".to_string());
        prompts.variables.insert("tone".to_string(), "dry".to_string());

        let mut vars = HashMap::new();
        vars.insert("channel".to_string(), "speedruns".to_string());

        let rendered = prompts.render_with_custom("{{channel}}/{{tone}}", &vars);
        assert_eq!(rendered, "speedruns/dry");
    }

    #[test]
    fn test_load_custom_hooks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("hooks.toml"),
            "system = \"Only JSON\"\nuser = \"{{transcript}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.hooks.system, "Only JSON");
        assert!(prompts.assistant.system.contains("editing assistant"));
    }
}
