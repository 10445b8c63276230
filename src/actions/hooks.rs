//! Hook and title regeneration through the AI provider.

use crate::config::Prompts;
use crate::error::{ClipError, Result};
use crate::project::{words_in_range, Clip, ClipStatus, ProjectState};
use crate::provider::{AssistantProvider, ProviderConfig, ProviderMessage, ProviderRequest};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Parsed model reply.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSuggestion {
    #[serde(default)]
    pub hook_text: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookUpdate {
    pub clip_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookFailure {
    pub clip_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookRegeneration {
    pub processed: usize,
    pub regenerated: usize,
    pub updates: Vec<HookUpdate>,
    pub failures: Vec<HookFailure>,
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("Invalid regex")
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extract `{hookText, title}` from a model reply, tolerating code fences and chatter.
pub fn parse_hook_response(response: &str) -> Result<HookSuggestion> {
    let json_str = match fence_regex().captures(response).and_then(|c| c.get(1)) {
        Some(m) => m.as_str(),
        None => match (response.find('{'), response.rfind('}')) {
            (Some(start), Some(end)) if end > start => &response[start..=end],
            _ => response,
        },
    };

    let suggestion: HookSuggestion = serde_json::from_str(json_str).map_err(|e| {
        ClipError::Provider(format!(
            "Failed to parse hook response: {}. Response was: {}",
            e,
            response.chars().take(200).collect::<String>()
        ))
    })?;

    let suggestion = HookSuggestion {
        hook_text: non_empty(suggestion.hook_text),
        title: non_empty(suggestion.title),
    };
    if suggestion.hook_text.is_none() && suggestion.title.is_none() {
        return Err(ClipError::Provider(
            "Hook response had neither hookText nor title".to_string(),
        ));
    }
    Ok(suggestion)
}

fn clip_transcript(state: &dyn ProjectState, clip: &Clip) -> String {
    let words = state.transcript().unwrap_or_default();
    let text = words_in_range(&words, clip.effective_start(), clip.effective_end())
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        "(no transcript)".to_string()
    } else {
        text
    }
}

async fn regenerate_one(
    state: &dyn ProjectState,
    provider: &dyn AssistantProvider,
    config: &ProviderConfig,
    prompts: &Prompts,
    clip: &Clip,
) -> Result<HookUpdate> {
    let mut vars = HashMap::new();
    vars.insert("clip_id".to_string(), clip.id.clone());
    vars.insert("pattern".to_string(), clip.pattern.as_str().to_string());
    vars.insert("score".to_string(), format!("{:.0}", clip.final_score));
    vars.insert(
        "current_hook".to_string(),
        clip.hook_text.clone().unwrap_or_else(|| "(none)".to_string()),
    );
    vars.insert(
        "current_title".to_string(),
        clip.title.clone().unwrap_or_else(|| "(none)".to_string()),
    );
    vars.insert("transcript".to_string(), clip_transcript(state, clip));

    let request = ProviderRequest {
        messages: vec![ProviderMessage::user(
            &prompts.render_with_custom(&prompts.hooks.user, &vars),
        )],
        tools: false,
        system_prompt: prompts.render_with_custom(&prompts.hooks.system, &vars),
        provider_config: config.clone(),
    };

    let response = provider.complete(&request).await?.ensure_success()?;
    let content = response
        .content
        .ok_or_else(|| ClipError::Provider("Empty hook response".to_string()))?;
    let suggestion = parse_hook_response(&content)?;

    state.update_hook(&clip.id, suggestion.hook_text.clone(), suggestion.title.clone())?;
    debug!("Regenerated hook for {}", clip.id);

    Ok(HookUpdate {
        clip_id: clip.id.clone(),
        hook_text: suggestion.hook_text,
        title: suggestion.title,
    })
}

/// Ask the provider for a fresh hook and title for each target clip.
///
/// Targets are the given ids, or every accepted clip. One provider call is made
/// per clip; a failing clip is recorded and skipped.
pub async fn regenerate_hooks(
    state: &dyn ProjectState,
    provider: &dyn AssistantProvider,
    config: &ProviderConfig,
    prompts: &Prompts,
    clip_ids: Option<&[String]>,
) -> Result<HookRegeneration> {
    let mut failures = Vec::new();

    let targets: Vec<Clip> = match clip_ids {
        Some(ids) => ids
            .iter()
            .filter_map(|id| {
                let clip = state.clip(id);
                if clip.is_none() {
                    failures.push(HookFailure {
                        clip_id: id.clone(),
                        error: format!("Clip '{}' does not exist", id),
                    });
                }
                clip
            })
            .collect(),
        None => {
            let accepted: Vec<Clip> = state
                .clips()
                .into_iter()
                .filter(|c| c.status == ClipStatus::Accepted)
                .collect();
            if accepted.is_empty() {
                return Err(ClipError::Precondition(
                    "No accepted clips; pass clipIds or accept clips first".to_string(),
                ));
            }
            accepted
        }
    };

    let missing = failures.len();
    let mut updates = Vec::new();
    for clip in &targets {
        match regenerate_one(state, provider, config, prompts, clip).await {
            Ok(update) => updates.push(update),
            Err(e) => {
                warn!("Skipping hook regeneration for {}: {}", clip.id, e);
                failures.push(HookFailure {
                    clip_id: clip.id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(HookRegeneration {
        processed: targets.len() + missing,
        regenerated: updates.len(),
        updates,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::fixtures::{clip_with_status, project_with, sample_project};
    use crate::provider::scripted::ScriptedProvider;
    use crate::provider::ProviderResponse;

    fn config() -> ProviderConfig {
        ProviderConfig {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: None,
        }
    }

    #[test]
    fn test_parse_fenced_response() {
        let reply = "Sure!\n```json\n{\"hookText\": \"He did NOT see that coming\", \"title\": \"The Dodge\"}\n```";
        let suggestion = parse_hook_response(reply).unwrap();
        assert_eq!(suggestion.hook_text.as_deref(), Some("He did NOT see that coming"));
        assert_eq!(suggestion.title.as_deref(), Some("The Dodge"));
    }

    #[test]
    fn test_parse_bare_and_partial_response() {
        let suggestion = parse_hook_response(r#"{"title": "  Clutch  "}"#).unwrap();
        assert_eq!(suggestion.title.as_deref(), Some("Clutch"));
        assert!(suggestion.hook_text.is_none());

        assert!(parse_hook_response("no json here").is_err());
        assert!(parse_hook_response(r#"{"hookText": ""}"#).is_err());
    }

    #[tokio::test]
    async fn test_failures_are_skipped() {
        let project = sample_project();
        let provider = ScriptedProvider::new()
            .respond(Ok(ProviderResponse::text(r#"{"hookText": "Watch this", "title": "Rant"}"#)))
            .respond(Ok(ProviderResponse::text("I cannot help with that")));

        let ids = vec!["c1".to_string(), "ghost".to_string(), "c2".to_string()];
        let result =
            regenerate_hooks(&project, &provider, &config(), &Prompts::default(), Some(&ids))
                .await
                .unwrap();

        assert_eq!(result.processed, 3);
        assert_eq!(result.regenerated, 1);
        assert_eq!(result.failures.len(), 2);
        assert_eq!(provider.request_count(), 2);
        assert_eq!(project.clip("c1").unwrap().hook_text.as_deref(), Some("Watch this"));
        assert!(project.clip("c2").unwrap().hook_text.is_none());
    }

    #[tokio::test]
    async fn test_defaults_to_accepted_clips() {
        let project = project_with(
            vec![
                clip_with_status("a", 0.0, 10.0, 80.0, ClipStatus::Accepted),
                clip_with_status("b", 10.0, 20.0, 80.0, ClipStatus::Pending),
            ],
            None,
        );
        let provider = ScriptedProvider::new()
            .respond(Ok(ProviderResponse::text(r#"{"hookText": "New hook"}"#)));

        let result = regenerate_hooks(&project, &provider, &config(), &Prompts::default(), None)
            .await
            .unwrap();
        assert_eq!(result.processed, 1);
        assert_eq!(result.regenerated, 1);

        let request = &provider.requests.lock().unwrap()[0];
        assert!(!request.tools);
        assert!(request.messages[0].content.contains("Clip a"));
        assert!(request.messages[0].content.contains("(no transcript)"));
    }

    #[tokio::test]
    async fn test_no_accepted_clips() {
        let project = sample_project();
        let provider = ScriptedProvider::new();
        let err = regenerate_hooks(&project, &provider, &config(), &Prompts::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClipError::Precondition(_)));
    }
}
