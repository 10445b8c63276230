//! OpenAI chat completions provider.

use super::{
    AssistantProvider, ContinuationRequest, ContinuationResponse, ProviderConfig,
    ProviderMessage, ProviderRequest, ProviderResponse, ProviderToolCall, Role, ToolDeclaration,
};
use crate::error::{ClipError, Result};
use crate::openai::create_client_with_timeout;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionObject,
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Provider backed by the OpenAI chat completions API.
pub struct OpenAIProvider {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    tools: Vec<ChatCompletionTool>,
}

impl OpenAIProvider {
    /// Create a provider that advertises the given tools.
    pub fn new(declarations: Vec<ToolDeclaration>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            tools: declarations.into_iter().map(to_openai_tool).collect(),
        })
    }

    fn build_messages(
        system_prompt: &str,
        messages: &[ProviderMessage],
    ) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut out: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|e| ClipError::Provider(e.to_string()))?
                .into(),
        ];

        for message in messages {
            let converted: ChatCompletionRequestMessage = match message.role {
                Role::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(message.content.as_str())
                    .build()
                    .map_err(|e| ClipError::Provider(e.to_string()))?
                    .into(),
                Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(message.content.as_str())
                    .build()
                    .map_err(|e| ClipError::Provider(e.to_string()))?
                    .into(),
                Role::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(message.content.as_str())
                    .build()
                    .map_err(|e| ClipError::Provider(e.to_string()))?
                    .into(),
            };
            out.push(converted);
        }

        Ok(out)
    }

    async fn chat(
        &self,
        config: &ProviderConfig,
        messages: Vec<ChatCompletionRequestMessage>,
        with_tools: bool,
    ) -> Result<async_openai::types::CreateChatCompletionResponse> {
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&config.model).messages(messages);
        if with_tools && !self.tools.is_empty() {
            builder.tools(self.tools.clone());
        }
        if let Some(temperature) = config.temperature {
            builder.temperature(temperature);
        }
        let request = builder
            .build()
            .map_err(|e| ClipError::Provider(e.to_string()))?;

        self.client
            .chat()
            .create(request)
            .await
            .map_err(|e| ClipError::Provider(format!("Chat API error: {}", e)))
    }
}

#[async_trait]
impl AssistantProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(model = %request.provider_config.model))]
    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let messages = Self::build_messages(&request.system_prompt, &request.messages)?;
        let response = self
            .chat(&request.provider_config, messages, request.tools)
            .await?;

        let Some(choice) = response.choices.first() else {
            return Ok(ProviderResponse::failure("No response from model"));
        };

        let tool_calls: Vec<ProviderToolCall> = choice
            .message
            .tool_calls
            .as_ref()
            .map(|calls| {
                calls
                    .iter()
                    .map(|call| ProviderToolCall {
                        id: call.id.clone(),
                        name: call.function.name.clone(),
                        arguments: parse_arguments(&call.function.arguments),
                    })
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            "Model returned {} tool call(s), {} chars of content",
            tool_calls.len(),
            choice.message.content.as_deref().map_or(0, str::len)
        );

        let requires_tool_results = !tool_calls.is_empty();
        Ok(ProviderResponse {
            success: true,
            content: choice.message.content.clone(),
            reasoning_trace: None,
            tool_calls: Some(tool_calls),
            requires_tool_results: Some(requires_tool_results),
            provider: Some(request.provider_config.provider.clone()),
            model: Some(response.model.clone()),
            error: None,
        })
    }

    #[instrument(skip(self, request), fields(results = request.tool_results.len()))]
    async fn continue_with_results(
        &self,
        request: &ContinuationRequest,
    ) -> Result<ContinuationResponse> {
        let mut history = request.messages.clone();
        history.push(ProviderMessage::user(&format_tool_results(request)));

        let messages = Self::build_messages(&request.system_prompt, &history)?;
        let response = self.chat(&request.provider_config, messages, false).await?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone());

        Ok(match content {
            Some(text) => ContinuationResponse {
                success: true,
                content: Some(text),
                error: None,
            },
            None => ContinuationResponse {
                success: false,
                content: None,
                error: Some("Empty continuation response".to_string()),
            },
        })
    }
}

fn to_openai_tool(declaration: ToolDeclaration) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: declaration.name,
            description: Some(declaration.description),
            parameters: Some(declaration.parameters),
            strict: None,
        },
    }
}

/// Parse model-emitted arguments, keeping the raw text if it is not JSON.
fn parse_arguments(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Tool arguments are not valid JSON: {}", e);
        Value::String(raw.to_string())
    })
}

fn format_tool_results(request: &ContinuationRequest) -> String {
    let results = request
        .tool_results
        .iter()
        .map(|r| format!("### {}\n{}", r.tool_name, r.result))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Tool results:\n\n{}", results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ToolResult;
    use serde_json::json;

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_arguments(r#"{"clipId": "c1"}"#), json!({"clipId": "c1"}));
        assert_eq!(parse_arguments(""), json!({}));
        assert_eq!(parse_arguments("{clipId"), json!("{clipId"));
    }

    #[test]
    fn test_format_tool_results() {
        let request = ContinuationRequest {
            messages: Vec::new(),
            tool_results: vec![ToolResult {
                tool_name: "set_clip_status".to_string(),
                result: json!({"success": true}),
            }],
            system_prompt: String::new(),
            provider_config: ProviderConfig {
                provider: "openai".to_string(),
                model: "gpt-4o-mini".to_string(),
                temperature: None,
            },
        };
        let text = format_tool_results(&request);
        assert!(text.starts_with("Tool results:"));
        assert!(text.contains("### set_clip_status\n{\"success\":true}"));
    }
}
