//! AI provider contract.
//!
//! The engine never talks to a model service directly. It builds a
//! [`ProviderRequest`] and consumes a [`ProviderResponse`]; transport,
//! authentication and streaming live behind [`AssistantProvider`].

mod openai;

#[cfg(test)]
pub(crate) mod scripted;

pub use openai::OpenAIProvider;

use crate::error::{ClipError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A message as sent to the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderMessage {
    pub role: Role,
    pub content: String,
}

impl ProviderMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: Role::Assistant,
            content: content.to_string(),
        }
    }
}

/// Which model to use and how.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub provider: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A name/description/schema triple the provider advertises to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRequest {
    pub messages: Vec<ProviderMessage>,
    /// Whether tool declarations are offered to the model.
    pub tools: bool,
    pub system_prompt: String,
    pub provider_config: ProviderConfig,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderToolCall {
    pub id: String,
    pub name: String,
    /// Usually a JSON object; a raw string when the model emitted invalid JSON.
    pub arguments: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_trace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ProviderToolCall>>,
    /// The provider wants a continuation call carrying the tool results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_tool_results: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProviderResponse {
    /// A successful plain-text response.
    pub fn text(content: &str) -> Self {
        Self {
            success: true,
            content: Some(content.to_string()),
            ..Default::default()
        }
    }

    /// A failed response.
    pub fn failure(error: &str) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    /// Convert `success: false` into an error.
    pub fn ensure_success(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ClipError::Provider(
                self.error
                    .unwrap_or_else(|| "Provider reported failure".to_string()),
            ))
        }
    }
}

/// Output of one executed tool, as fed back to the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub tool_name: String,
    pub result: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuationRequest {
    pub messages: Vec<ProviderMessage>,
    pub tool_results: Vec<ToolResult>,
    pub system_prompt: String,
    pub provider_config: ProviderConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContinuationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A conversational model service.
#[async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Submit a conversation and receive content and/or tool calls.
    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Submit tool results for a summarizing follow-up.
    async fn continue_with_results(
        &self,
        request: &ContinuationRequest,
    ) -> Result<ContinuationResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_success() {
        assert!(ProviderResponse::text("hi").ensure_success().is_ok());

        let err = ProviderResponse::failure("rate limited")
            .ensure_success()
            .unwrap_err();
        assert_eq!(err.to_string(), "Provider error: rate limited");
    }

    #[test]
    fn test_response_field_names() {
        let json = r#"{
            "success": true,
            "content": "Reviewing now",
            "toolCalls": [{"id": "t1", "name": "auto_review_clips", "arguments": {"dryRun": true}}],
            "requiresToolResults": true
        }"#;
        let response: ProviderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.requires_tool_results, Some(true));
        assert_eq!(response.tool_calls.unwrap()[0].name, "auto_review_clips");
    }
}
