//! One user turn: prompt, tools, continuation, final message.

use super::conversation::{Conversation, ToolCall};
use super::dispatcher::Dispatcher;
use super::prompt::{build_continuation_prompt, build_system_prompt};
use super::tools::tool_definitions;
use crate::error::Result;
use crate::provider::{
    AssistantProvider, ContinuationRequest, ProviderMessage, ProviderRequest, ProviderToolCall,
    ToolDeclaration, ToolResult,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Used when tools ran but there is no text to show.
pub const FALLBACK_REPLY: &str = "Done. I've completed the requested actions.";

/// Tool calls waiting to run, in the order the provider returned them.
#[derive(Debug, Default)]
pub struct ToolQueue {
    pending: VecDeque<ProviderToolCall>,
}

impl ToolQueue {
    pub fn new(calls: Vec<ProviderToolCall>) -> Self {
        Self {
            pending: calls.into(),
        }
    }

    pub fn next(&mut self) -> Option<ProviderToolCall> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// What a finished turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub content: String,
    pub reasoning_trace: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    /// Whether a continuation call was made.
    pub continued: bool,
}

/// Drives the provider and dispatcher for each user message.
pub struct TurnController {
    dispatcher: Dispatcher,
    provider: Arc<dyn AssistantProvider>,
    declarations: Vec<ToolDeclaration>,
}

fn merge_replies(first: &str, continuation: &str) -> String {
    match (first.trim().is_empty(), continuation.trim().is_empty()) {
        (true, _) => continuation.to_string(),
        (false, true) => first.to_string(),
        (false, false) => format!("{}\n\n{}", first, continuation),
    }
}

impl TurnController {
    pub fn new(dispatcher: Dispatcher, provider: Arc<dyn AssistantProvider>) -> Self {
        Self {
            dispatcher,
            provider,
            declarations: tool_definitions(),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Tool declarations offered to the provider.
    pub fn declarations(&self) -> &[ToolDeclaration] {
        &self.declarations
    }

    /// Handle one user message end to end.
    ///
    /// The user message is always appended. If the initial provider call
    /// fails the error is returned and no assistant message is added.
    #[instrument(skip_all)]
    pub async fn run_turn(
        &self,
        conversation: &mut Conversation,
        user_text: &str,
    ) -> Result<TurnOutcome> {
        let settings = self.dispatcher.settings();
        let prompts = self.dispatcher.prompts();
        let provider_config = settings.provider_config();

        let system_prompt = build_system_prompt(
            self.dispatcher.state(),
            prompts,
            settings.assistant.top_clips_in_prompt,
        );

        conversation.push_user(user_text)?;
        let history = conversation.history(settings.assistant.max_history_messages);

        let request = ProviderRequest {
            messages: history.clone(),
            tools: !self.declarations.is_empty(),
            system_prompt: system_prompt.clone(),
            provider_config: provider_config.clone(),
        };
        let response = self.provider.complete(&request).await?.ensure_success()?;

        let first_text = response.content.clone().unwrap_or_default();
        let reasoning_trace = response.reasoning_trace.clone();
        let mut queue = ToolQueue::new(response.tool_calls.clone().unwrap_or_default());
        info!("Provider returned {} tool call(s)", queue.len());

        conversation.begin_assistant(reasoning_trace.clone())?;

        let mut results = Vec::new();
        while let Some(provider_call) = queue.next() {
            let Some(draft) = conversation.draft_mut() else {
                break;
            };
            draft.tool_calls.push(ToolCall::new(
                &provider_call.id,
                &provider_call.name,
                provider_call.arguments,
            ));
            let index = draft.tool_calls.len() - 1;
            let record = &mut draft.tool_calls[index];

            if let Err(e) = self.dispatcher.run(record).await {
                warn!("Tool call {} skipped: {}", record.id, e);
                continue;
            }
            results.push(ToolResult {
                tool_name: record.name.clone(),
                result: record.outcome(),
            });
        }

        let wants_continuation = response.requires_tool_results.unwrap_or(false);
        let mut continued = false;
        let content = if wants_continuation && !results.is_empty() {
            continued = true;
            let mut messages = history;
            if !first_text.trim().is_empty() {
                messages.push(ProviderMessage::assistant(&first_text));
            }
            let request = ContinuationRequest {
                messages,
                tool_results: results.clone(),
                system_prompt: build_continuation_prompt(&system_prompt, prompts),
                provider_config,
            };
            match self.provider.continue_with_results(&request).await {
                Ok(reply) if reply.success => {
                    merge_replies(&first_text, reply.content.as_deref().unwrap_or_default())
                }
                Ok(reply) => {
                    warn!(
                        "Continuation failed: {}",
                        reply.error.as_deref().unwrap_or("unknown error")
                    );
                    first_text.clone()
                }
                Err(e) => {
                    warn!("Continuation failed: {}", e);
                    first_text.clone()
                }
            }
        } else {
            first_text.clone()
        };

        let content = if content.trim().is_empty() && !results.is_empty() {
            FALLBACK_REPLY.to_string()
        } else {
            content
        };

        let message = conversation.finalize(&content)?;
        debug!("Turn finished with {} tool call(s)", message.tool_calls.len());

        Ok(TurnOutcome {
            content,
            reasoning_trace,
            tool_calls: message.tool_calls.clone(),
            continued,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::conversation::ToolCallStatus;
    use crate::config::{Prompts, Settings};
    use crate::detection::DisabledDetection;
    use crate::error::ClipError;
    use crate::project::fixtures::sample_project;
    use crate::project::{ClipStatus, MemoryProject, ProjectState};
    use crate::provider::scripted::{continuation, tool_response, ScriptedProvider};
    use crate::provider::{ContinuationResponse, ProviderResponse, Role};
    use crate::ui::recording::RecordingUi;
    use serde_json::json;

    fn controller(
        provider: ScriptedProvider,
    ) -> (Arc<MemoryProject>, Arc<ScriptedProvider>, TurnController) {
        let project = Arc::new(sample_project());
        let provider = Arc::new(provider);
        let dispatcher = Dispatcher::new(
            project.clone(),
            provider.clone(),
            Arc::new(DisabledDetection),
            Arc::new(RecordingUi::default()),
            Settings::default(),
            Prompts::default(),
        );
        (project, provider.clone(), TurnController::new(dispatcher, provider))
    }

    #[tokio::test]
    async fn test_plain_reply_has_no_continuation() {
        let reply = ProviderResponse::text("c1 is your best clip.");
        let (_, provider, turn) = controller(ScriptedProvider::new().respond(Ok(reply)));
        let mut conversation = Conversation::new();

        let outcome = turn.run_turn(&mut conversation, "which clip is best?").await.unwrap();

        assert_eq!(outcome.content, "c1 is your best clip.");
        assert!(!outcome.continued);
        assert_eq!(provider.continuation_count(), 0);
        assert_eq!(conversation.len(), 2);

        let request = &provider.requests.lock().unwrap()[0];
        assert!(request.tools);
        assert!(request.system_prompt.contains("3 total"));
        assert_eq!(request.messages.last().unwrap().role, Role::User);
    }

    #[tokio::test]
    async fn test_tools_run_in_order_then_continue() {
        let script = ScriptedProvider::new()
            .respond(Ok(tool_response(
                "Accepting c2, then reviewing.",
                vec![
                    ("set_clip_status", json!({"clipId": "c2", "status": "accepted"})),
                    ("suggest_clip_order", json!({"strategy": "best_first"})),
                    ("select_clip", json!({"clipId": "missing"})),
                ],
            )))
            .continue_with(Ok(continuation("Two clips are accepted.")));
        let (project, provider, turn) = controller(script);
        let mut conversation = Conversation::new();

        let outcome = turn.run_turn(&mut conversation, "accept c2").await.unwrap();

        // suggest_clip_order sees the status change made just before it
        let order = outcome.tool_calls[1].result.as_ref().unwrap();
        assert_eq!(order["clipIds"], json!(["c2"]));
        assert_eq!(project.clip("c2").unwrap().status, ClipStatus::Accepted);

        assert_eq!(outcome.tool_calls[2].status, ToolCallStatus::Error);
        assert!(outcome.continued);
        assert_eq!(
            outcome.content,
            "Accepting c2, then reviewing.\n\nTwo clips are accepted."
        );

        let request = &provider.continuation_requests.lock().unwrap()[0];
        assert_eq!(request.tool_results.len(), 3);
        assert!(request.tool_results[2].result["error"].is_string());

        let last = conversation.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.is_streaming, Some(false));
        assert_eq!(last.tool_calls.len(), 3);
    }

    #[tokio::test]
    async fn test_continuation_failure_keeps_first_text() {
        let script = ScriptedProvider::new()
            .respond(Ok(tool_response(
                "Selecting it.",
                vec![("select_clip", json!({"clipId": "c1"}))],
            )))
            .continue_with(Err(ClipError::Provider("timeout".into())));
        let (_, _, turn) = controller(script);
        let mut conversation = Conversation::new();

        let outcome = turn.run_turn(&mut conversation, "show c1").await.unwrap();
        assert_eq!(outcome.content, "Selecting it.");
    }

    #[tokio::test]
    async fn test_continuation_failure_without_text_uses_fallback() {
        let script = ScriptedProvider::new()
            .respond(Ok(tool_response("", vec![("play_pause", json!({}))])))
            .continue_with(Ok(ContinuationResponse {
                success: false,
                content: None,
                error: Some("overloaded".to_string()),
            }));
        let (_, _, turn) = controller(script);
        let mut conversation = Conversation::new();

        let outcome = turn.run_turn(&mut conversation, "pause").await.unwrap();
        assert_eq!(outcome.content, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_no_continuation_unless_requested() {
        let mut response = tool_response("Paused.", vec![("play_pause", json!({}))]);
        response.requires_tool_results = Some(false);
        let (_, provider, turn) = controller(ScriptedProvider::new().respond(Ok(response)));
        let mut conversation = Conversation::new();

        let outcome = turn.run_turn(&mut conversation, "pause").await.unwrap();
        assert!(!outcome.continued);
        assert_eq!(outcome.content, "Paused.");
        assert_eq!(provider.continuation_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_appends_no_assistant_message() {
        let script = ScriptedProvider::new()
            .respond(Ok(ProviderResponse::failure("invalid api key")))
            .respond(Err(ClipError::Provider("connection reset".into())));
        let (_, _, turn) = controller(script);
        let mut conversation = Conversation::new();

        let err = turn.run_turn(&mut conversation, "hi").await.unwrap_err();
        assert!(matches!(err, ClipError::Provider(_)));
        let err = turn.run_turn(&mut conversation, "hi again").await.unwrap_err();
        assert!(matches!(err, ClipError::Provider(_)));

        assert_eq!(conversation.len(), 2);
        assert!(conversation
            .messages()
            .iter()
            .all(|m| m.role == Role::User));
    }

    #[tokio::test]
    async fn test_history_carries_previous_turns() {
        let script = ScriptedProvider::new()
            .respond(Ok(ProviderResponse::text("first answer")))
            .respond(Ok(ProviderResponse::text("second answer")));
        let (_, provider, turn) = controller(script);
        let mut conversation = Conversation::new();

        turn.run_turn(&mut conversation, "one").await.unwrap();
        turn.run_turn(&mut conversation, "two").await.unwrap();

        let requests = provider.requests.lock().unwrap();
        let contents: Vec<&str> = requests[1].messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "first answer", "two"]);
    }
}
