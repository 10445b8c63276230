//! Configuration settings for Clipagent.

use crate::actions::{ReviewCriteria, Vibe};
use crate::provider::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub provider: ProviderSettings,
    pub assistant: AssistantSettings,
    pub review: ReviewSettings,
    pub compilation: CompilationSettings,
    pub analysis: AnalysisSettings,
    pub detection: DetectionSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.clipagent".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// AI provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Provider name (openai).
    pub name: String,
    /// Chat model used for the assistant and hook regeneration.
    pub model: String,
    pub temperature: Option<f32>,
    /// HTTP timeout for every provider call.
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: Some(0.4),
            timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Assistant conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// How many top clips are listed in the system prompt.
    pub top_clips_in_prompt: usize,
    /// Most recent messages sent as history (0 = all).
    pub max_history_messages: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            top_clips_in_prompt: 5,
            max_history_messages: 30,
        }
    }
}

/// Default thresholds for batch review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSettings {
    pub min_score: f64,
    pub min_hook_strength: f64,
    pub require_complete: bool,
    pub max_to_accept: Option<usize>,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        let criteria = ReviewCriteria::default();
        Self {
            min_score: criteria.min_score,
            min_hook_strength: criteria.min_hook_strength,
            require_complete: criteria.require_complete,
            max_to_accept: criteria.max_to_accept,
        }
    }
}

/// VOD compilation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilationSettings {
    /// Transition overhead added per clip after the first.
    pub transition_seconds: f64,
    pub default_vibe: Vibe,
}

impl Default for CompilationSettings {
    fn default() -> Self {
        Self {
            transition_seconds: 0.5,
            default_vibe: Vibe::default(),
        }
    }
}

/// Analysis defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Windows in an energy curve when the caller gives no resolution.
    pub energy_resolution: usize,
    /// Search radius for boundary optimization, in seconds.
    pub boundary_max_extension: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            energy_resolution: 20,
            boundary_max_extension: crate::analysis::DEFAULT_MAX_EXTENSION,
        }
    }
}

/// External clip-detection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DetectionSettings {
    /// Command that runs a detection job. Detection is disabled when unset.
    pub command: Option<String>,
    /// Extra arguments passed before the job arguments.
    pub args: Vec<String>,
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ClipError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clipagent")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Provider selection for requests.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider.name.clone(),
            model: self.provider.model.clone(),
            temperature: self.provider.temperature,
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_secs)
    }

    /// Review thresholds used when a tool call leaves them out.
    pub fn review_criteria(&self) -> ReviewCriteria {
        ReviewCriteria {
            min_score: self.review.min_score,
            min_hook_strength: self.review.min_hook_strength,
            require_complete: self.review.require_complete,
            max_to_accept: self.review.max_to_accept,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.review.min_score, 70.0);
        assert_eq!(settings.review.min_hook_strength, 50.0);
        assert_eq!(settings.compilation.transition_seconds, 0.5);
        assert_eq!(settings.provider.timeout_secs, 300);
        assert!(settings.detection.command.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [provider]
            model = "gpt-4.1"

            [compilation]
            default_vibe = "building"
            "#,
        )
        .unwrap();

        assert_eq!(settings.provider.model, "gpt-4.1");
        assert_eq!(settings.provider.name, "openai");
        assert_eq!(settings.compilation.default_vibe, Vibe::Building);
        assert_eq!(settings.compilation.transition_seconds, 0.5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.review.max_to_accept = Some(12);
        settings.detection.command = Some("clip-detect".to_string());
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.review.max_to_accept, Some(12));
        assert_eq!(loaded.detection.command.as_deref(), Some("clip-detect"));
    }
}
