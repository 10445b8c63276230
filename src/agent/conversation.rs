//! Conversation log and tool-call lifecycle records.

use crate::error::{ClipError, ErrorKind, Result};
use crate::provider::{ProviderMessage, Role};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallStatus {
    Pending,
    Running,
    Success,
    Error,
}

impl std::fmt::Display for ToolCallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ToolCallStatus::Pending => "pending",
            ToolCallStatus::Running => "running",
            ToolCallStatus::Success => "success",
            ToolCallStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// One tool invocation and its outcome.
///
/// Moves strictly `pending -> running -> success | error`. Any other
/// transition fails and leaves the record as it was.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
    pub status: ToolCallStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl ToolCall {
    pub fn new(id: &str, name: &str, arguments: Value) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
            status: ToolCallStatus::Pending,
            result: None,
            error: None,
            error_kind: None,
        }
    }

    fn transition(&mut self, from: ToolCallStatus, to: ToolCallStatus) -> Result<()> {
        if self.status != from {
            return Err(ClipError::InvalidTransition(format!(
                "tool call {} ({}) cannot move from {} to {}",
                self.id, self.name, self.status, to
            )));
        }
        self.status = to;
        Ok(())
    }

    /// `pending -> running`
    pub fn start(&mut self) -> Result<()> {
        self.transition(ToolCallStatus::Pending, ToolCallStatus::Running)
    }

    /// `running -> success`
    pub fn succeed(&mut self, result: Value) -> Result<()> {
        self.transition(ToolCallStatus::Running, ToolCallStatus::Success)?;
        self.result = Some(result);
        Ok(())
    }

    /// `running -> error`
    pub fn fail(&mut self, error: &ClipError) -> Result<()> {
        self.transition(ToolCallStatus::Running, ToolCallStatus::Error)?;
        self.error = Some(error.to_string());
        self.error_kind = Some(error.kind());
        Ok(())
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.status, ToolCallStatus::Success | ToolCallStatus::Error)
    }

    /// What the provider sees for this call: the result, or `{"error": msg}`.
    pub fn outcome(&self) -> Value {
        match (&self.result, &self.error) {
            (Some(result), _) => result.clone(),
            (None, Some(error)) => json!({ "error": error }),
            (None, None) => json!({ "error": format!("tool call is {}", self.status) }),
        }
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_trace: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    /// `Some(true)` while an assistant draft is being filled in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_streaming: Option<bool>,
}

impl ChatMessage {
    fn new(role: Role, content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
            reasoning_trace: None,
            tool_calls: Vec::new(),
            is_streaming: None,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.is_streaming == Some(true)
    }
}

/// Append-only message log.
///
/// Messages are never edited or removed, with one exception: the trailing
/// assistant draft may be filled in until it is finalized.
#[derive(Debug, Default, Serialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn has_draft(&self) -> bool {
        self.messages.last().is_some_and(ChatMessage::is_draft)
    }

    fn ensure_no_draft(&self) -> Result<()> {
        if self.has_draft() {
            return Err(ClipError::Precondition(
                "An assistant message is still being drafted".to_string(),
            ));
        }
        Ok(())
    }

    pub fn push_user(&mut self, content: &str) -> Result<&ChatMessage> {
        self.ensure_no_draft()?;
        self.messages.push(ChatMessage::new(Role::User, content));
        Ok(&self.messages[self.messages.len() - 1])
    }

    pub fn push_system(&mut self, content: &str) -> Result<&ChatMessage> {
        self.ensure_no_draft()?;
        self.messages.push(ChatMessage::new(Role::System, content));
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Open an assistant draft at the end of the log.
    pub fn begin_assistant(&mut self, reasoning_trace: Option<String>) -> Result<&mut ChatMessage> {
        self.ensure_no_draft()?;
        let mut message = ChatMessage::new(Role::Assistant, "");
        message.reasoning_trace = reasoning_trace;
        message.is_streaming = Some(true);
        self.messages.push(message);
        let last = self.messages.len() - 1;
        Ok(&mut self.messages[last])
    }

    /// The open draft, if any.
    pub fn draft_mut(&mut self) -> Option<&mut ChatMessage> {
        self.messages.last_mut().filter(|m| m.is_draft())
    }

    /// Fill in the draft's content and mark it final.
    pub fn finalize(&mut self, content: &str) -> Result<&ChatMessage> {
        let draft = self.draft_mut().ok_or_else(|| {
            ClipError::Precondition("No assistant message is being drafted".to_string())
        })?;
        draft.content = content.to_string();
        draft.is_streaming = Some(false);
        draft.timestamp = Utc::now();
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Finalized messages as provider history, keeping the most recent `max` (0 = all).
    pub fn history(&self, max: usize) -> Vec<ProviderMessage> {
        let finalized: Vec<ProviderMessage> = self
            .messages
            .iter()
            .filter(|m| !m.is_draft() && m.role != Role::System)
            .map(|m| ProviderMessage {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();
        if max == 0 || finalized.len() <= max {
            finalized
        } else {
            finalized[finalized.len() - max..].to_vec()
        }
    }
}
