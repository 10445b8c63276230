//! Scripted provider for tests.

use super::{
    AssistantProvider, ContinuationRequest, ContinuationResponse, ProviderRequest,
    ProviderResponse, ProviderToolCall,
};
use crate::error::{ClipError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued responses and records every request it receives.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<ProviderResponse>>>,
    continuations: Mutex<VecDeque<Result<ContinuationResponse>>>,
    pub(crate) requests: Mutex<Vec<ProviderRequest>>,
    pub(crate) continuation_requests: Mutex<Vec<ContinuationRequest>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, response: Result<ProviderResponse>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub(crate) fn continue_with(self, response: Result<ContinuationResponse>) -> Self {
        self.continuations.lock().unwrap().push_back(response);
        self
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn continuation_count(&self) -> usize {
        self.continuation_requests.lock().unwrap().len()
    }
}

/// A successful response carrying tool calls.
pub(crate) fn tool_response(content: &str, calls: Vec<(&str, Value)>) -> ProviderResponse {
    ProviderResponse {
        success: true,
        content: Some(content.to_string()),
        tool_calls: Some(
            calls
                .into_iter()
                .enumerate()
                .map(|(i, (name, arguments))| ProviderToolCall {
                    id: format!("call_{}", i),
                    name: name.to_string(),
                    arguments,
                })
                .collect(),
        ),
        requires_tool_results: Some(true),
        ..Default::default()
    }
}

pub(crate) fn continuation(content: &str) -> ContinuationResponse {
    ContinuationResponse {
        success: true,
        content: Some(content.to_string()),
        error: None,
    }
}

#[async_trait]
impl AssistantProvider for ScriptedProvider {
    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClipError::Provider("script exhausted".to_string())))
    }

    async fn continue_with_results(
        &self,
        request: &ContinuationRequest,
    ) -> Result<ContinuationResponse> {
        self.continuation_requests
            .lock()
            .unwrap()
            .push(request.clone());
        self.continuations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClipError::Provider("script exhausted".to_string())))
    }
}
