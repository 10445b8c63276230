//! Tool execution against project state.

use super::conversation::ToolCall;
use super::prompt::StatusCounts;
use super::tools::{parse_tool_call, ToolCommand};
use crate::actions::{
    auto_review, create_compilation, regenerate_hooks, smart_trim, suggest_order,
};
use crate::analysis::{
    analyze_quality, analyze_speech, compare_clips, detect_highlights, energy_curve,
    find_optimal_boundaries, Criterion, DEFAULT_HIGHLIGHT_LIMIT, DEFAULT_HIGHLIGHT_MIN_SCORE,
};
use crate::config::{Prompts, Settings};
use crate::detection::DetectionControl;
use crate::error::{ClipError, Result};
use crate::project::{require_clip, require_transcript, resolve_range, words_in_range, ProjectState};
use crate::provider::AssistantProvider;
use crate::ui::UiCallbacks;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Everything a tool may touch.
pub struct Dispatcher {
    state: Arc<dyn ProjectState>,
    provider: Arc<dyn AssistantProvider>,
    detection: Arc<dyn DetectionControl>,
    ui: Arc<dyn UiCallbacks>,
    settings: Settings,
    prompts: Prompts,
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

impl Dispatcher {
    pub fn new(
        state: Arc<dyn ProjectState>,
        provider: Arc<dyn AssistantProvider>,
        detection: Arc<dyn DetectionControl>,
        ui: Arc<dyn UiCallbacks>,
        settings: Settings,
        prompts: Prompts,
    ) -> Self {
        Self {
            state,
            provider,
            detection,
            ui,
            settings,
            prompts,
        }
    }

    pub fn state(&self) -> &dyn ProjectState {
        self.state.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    /// Parse and execute a tool by name.
    #[instrument(skip(self, arguments))]
    pub async fn execute(&self, name: &str, arguments: &Value) -> Result<Value> {
        let command = parse_tool_call(name, arguments)?;
        debug!("Executing {:?}", command);
        self.execute_command(command).await
    }

    /// Run a recorded call through its lifecycle.
    ///
    /// Tool failures are captured on the record. Only an illegal lifecycle
    /// transition is returned as an error.
    pub async fn run(&self, call: &mut ToolCall) -> Result<()> {
        call.start()?;
        match self.execute(&call.name, &call.arguments).await {
            Ok(result) => {
                info!("Tool {} succeeded", call.name);
                call.succeed(result)
            }
            Err(e) => {
                warn!("Tool {} failed: {}", call.name, e);
                call.fail(&e)
            }
        }
    }

    pub async fn execute_command(&self, command: ToolCommand) -> Result<Value> {
        let state = self.state.as_ref();

        match command {
            ToolCommand::AnalyzeClipQuality { clip_id } => {
                let clip = require_clip(state, &clip_id)?;
                let words = state.transcript().unwrap_or_default();
                to_value(analyze_quality(&clip, &words))
            }
            ToolCommand::AnalyzeEnergyCurve {
                clip_id,
                start_time,
                end_time,
                resolution,
            } => {
                let (start, end) = resolve_range(state, clip_id.as_deref(), start_time, end_time)?;
                let words = require_transcript(state)?;
                let resolution = resolution.unwrap_or(self.settings.analysis.energy_resolution);
                to_value(energy_curve(&words, start, end, resolution)?)
            }
            ToolCommand::AnalyzeSpeechPatterns {
                clip_id,
                start_time,
                end_time,
            } => {
                let (start, end) = resolve_range(state, clip_id.as_deref(), start_time, end_time)?;
                let words = require_transcript(state)?;
                to_value(analyze_speech(&words, start, end))
            }
            ToolCommand::FindOptimalBoundaries {
                clip_id,
                max_extension,
            } => {
                let clip = require_clip(state, &clip_id)?;
                let words = require_transcript(state)?;
                let max_extension =
                    max_extension.unwrap_or(self.settings.analysis.boundary_max_extension);
                if max_extension < 0.0 {
                    return Err(ClipError::InvalidArguments(
                        "maxExtension cannot be negative".to_string(),
                    ));
                }
                to_value(find_optimal_boundaries(&clip, &words, max_extension))
            }
            ToolCommand::DetectHighlights {
                start_time,
                end_time,
                min_score,
                limit,
            } => {
                let (start, end) = resolve_range(state, None, start_time, end_time)?;
                let words = state.transcript().filter(|w| !w.is_empty());
                to_value(detect_highlights(
                    &state.clips(),
                    words.as_deref(),
                    start,
                    end,
                    min_score.unwrap_or(DEFAULT_HIGHLIGHT_MIN_SCORE),
                    limit.unwrap_or(DEFAULT_HIGHLIGHT_LIMIT),
                )?)
            }
            ToolCommand::CompareClips { clip_ids, criteria } => {
                let words = state.transcript().unwrap_or_default();
                let criteria = criteria.unwrap_or_else(|| Criterion::DEFAULTS.to_vec());
                to_value(compare_clips(&state.clips(), &clip_ids, &words, &criteria)?)
            }
            ToolCommand::SmartTrimClip { clip_id, strategy } => {
                let outcome = smart_trim(state, &clip_id, strategy)?;
                if outcome.applied {
                    self.ui.trim_clip(
                        &outcome.clip_id,
                        outcome.trim_start_offset,
                        outcome.trim_end_offset,
                    );
                }
                to_value(outcome)
            }
            ToolCommand::AutoReviewClips {
                min_score,
                min_hook_strength,
                require_complete,
                max_to_accept,
                dry_run,
            } => {
                let mut criteria = self.settings.review_criteria();
                if let Some(v) = min_score {
                    criteria.min_score = v;
                }
                if let Some(v) = min_hook_strength {
                    criteria.min_hook_strength = v;
                }
                if let Some(v) = require_complete {
                    criteria.require_complete = v;
                }
                if max_to_accept.is_some() {
                    criteria.max_to_accept = max_to_accept;
                }
                to_value(auto_review(state, &criteria, dry_run)?)
            }
            ToolCommand::SuggestClipOrder { strategy } => to_value(suggest_order(state, strategy)?),
            ToolCommand::RunDetection { settings } => {
                let media_path = state.media_path().ok_or_else(|| {
                    ClipError::NotFound("The project has no source media".to_string())
                })?;
                let job_id = Uuid::new_v4().to_string();
                let start = self
                    .detection
                    .start(&job_id, &media_path, &settings, state.media_duration())
                    .await?;
                if !start.success {
                    return Err(ClipError::Detection(
                        start
                            .error
                            .unwrap_or_else(|| "Detection failed to start".to_string()),
                    ));
                }
                Ok(json!({
                    "success": true,
                    "jobId": job_id,
                    "queued": start.queued.unwrap_or(false),
                    "filePath": media_path,
                }))
            }
            ToolCommand::CreateVodCompilation {
                target_duration_minutes,
                vibe,
                transition_seconds,
            } => to_value(create_compilation(
                state,
                target_duration_minutes,
                vibe.unwrap_or(self.settings.compilation.default_vibe),
                transition_seconds.unwrap_or(self.settings.compilation.transition_seconds),
            )?),
            ToolCommand::RegenerateHooks { clip_ids } => to_value(
                regenerate_hooks(
                    state,
                    self.provider.as_ref(),
                    &self.settings.provider_config(),
                    &self.prompts,
                    clip_ids.as_deref(),
                )
                .await?,
            ),
            ToolCommand::SeekToTime { time } => {
                if time < 0.0 {
                    return Err(ClipError::InvalidArguments(
                        "time cannot be negative".to_string(),
                    ));
                }
                self.ui.seek_to_time(time);
                Ok(json!({"success": true, "time": time}))
            }
            ToolCommand::SelectClip { clip_id } => {
                let clip = require_clip(state, &clip_id)?;
                self.ui.select_clip(&clip.id);
                Ok(json!({"success": true, "clipId": clip.id}))
            }
            ToolCommand::SetClipStatus { clip_id, status } => {
                let clip = require_clip(state, &clip_id)?;
                state.update_status(&clip.id, status)?;
                Ok(json!({
                    "success": true,
                    "clipId": clip.id,
                    "previousStatus": clip.status,
                    "status": status,
                }))
            }
            ToolCommand::TrimClip {
                clip_id,
                trim_start_offset,
                trim_end_offset,
            } => {
                let clip = require_clip(state, &clip_id)?;
                let start_offset = trim_start_offset.unwrap_or(clip.trim_start_offset);
                let end_offset = trim_end_offset.unwrap_or(clip.trim_end_offset);
                state.update_trim(&clip.id, start_offset, end_offset)?;
                self.ui.trim_clip(&clip.id, start_offset, end_offset);
                Ok(json!({
                    "success": true,
                    "clipId": clip.id,
                    "trimStartOffset": start_offset,
                    "trimEndOffset": end_offset,
                    "startTime": clip.start_time + start_offset,
                    "endTime": clip.end_time + end_offset,
                }))
            }
            ToolCommand::GetProjectState => Ok(self.project_overview()),
            ToolCommand::GetTranscript {
                clip_id,
                start_time,
                end_time,
            } => {
                let words = require_transcript(state)?;
                let (start, end) = resolve_range(state, clip_id.as_deref(), start_time, end_time)?;
                let selected = words_in_range(&words, start, end);
                let text = selected
                    .iter()
                    .map(|w| w.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                Ok(json!({
                    "startTime": start,
                    "endTime": end,
                    "wordCount": selected.len(),
                    "text": text,
                }))
            }
            ToolCommand::PlayPause => {
                self.ui.play_pause();
                Ok(json!({"success": true}))
            }
            ToolCommand::SetDeadSpaceRemoval {
                dead_space_id,
                remove,
            } => {
                state.update_dead_space(&dead_space_id, remove)?;
                Ok(json!({"success": true, "deadSpaceId": dead_space_id, "remove": remove}))
            }
        }
    }

    fn project_overview(&self) -> Value {
        let state = self.state.as_ref();
        let clips = state.clips();
        let counts = StatusCounts::of(&clips);
        let transcript_words = state.transcript().map_or(0, |w| w.len());

        json!({
            "mediaPath": state.media_path(),
            "mediaDuration": state.media_duration(),
            "clipCount": counts.total,
            "accepted": counts.accepted,
            "rejected": counts.rejected,
            "pending": counts.pending,
            "averageScore": (counts.average_score * 10.0).round() / 10.0,
            "clips": clips.iter().map(|c| json!({
                "id": c.id,
                "title": c.title,
                "category": c.category,
                "pattern": c.pattern,
                "startTime": c.effective_start(),
                "endTime": c.effective_end(),
                "duration": c.effective_duration(),
                "finalScore": c.final_score,
                "hookStrength": c.hook_strength,
                "isComplete": c.is_complete,
                "status": c.status,
                "hookText": c.hook_text,
            })).collect::<Vec<_>>(),
            "transcript": {
                "available": transcript_words > 0,
                "wordCount": transcript_words,
            },
            "deadSpaces": state.dead_spaces(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Vibe;
    use crate::agent::ToolCallStatus;
    use crate::error::ErrorKind;
    use crate::detection::DisabledDetection;
    use crate::project::fixtures::sample_project;
    use crate::project::{ClipStatus, MemoryProject};
    use crate::provider::scripted::ScriptedProvider;
    use crate::ui::recording::{RecordingUi, UiEvent};

    struct Harness {
        project: Arc<MemoryProject>,
        ui: Arc<RecordingUi>,
        dispatcher: Dispatcher,
    }

    fn harness_with(project: MemoryProject, provider: ScriptedProvider) -> Harness {
        let project = Arc::new(project);
        let ui = Arc::new(RecordingUi::default());
        let dispatcher = Dispatcher::new(
            project.clone(),
            Arc::new(provider),
            Arc::new(DisabledDetection),
            ui.clone(),
            Settings::default(),
            Prompts::default(),
        );
        Harness {
            project,
            ui,
            dispatcher,
        }
    }

    fn harness() -> Harness {
        harness_with(sample_project(), ScriptedProvider::new())
    }

    #[tokio::test]
    async fn test_unknown_tool_and_missing_clip() {
        let h = harness();
        let err = h.dispatcher.execute("explode", &json!({})).await.unwrap_err();
        assert!(matches!(err, ClipError::UnknownTool(_)));

        let err = h
            .dispatcher
            .execute("analyze_clip_quality", &json!({"clipId": "zz"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClipError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_set_clip_status_touches_only_named_clip() {
        let h = harness();
        let before = h.project.snapshot();
        h.dispatcher
            .execute("set_clip_status", &json!({"clipId": "c2", "status": "accepted"}))
            .await
            .unwrap();

        let after = h.project.snapshot();
        for (b, a) in before.clips.iter().zip(after.clips.iter()) {
            if a.id == "c2" {
                assert_eq!(a.status, ClipStatus::Accepted);
            } else {
                assert_eq!(a, b);
            }
        }
        assert_eq!(before.dead_spaces, after.dead_spaces);
    }

    #[tokio::test]
    async fn test_playback_tools_call_ui() {
        let h = harness();
        h.dispatcher.execute("seek_to_time", &json!({"time": "42"})).await.unwrap();
        h.dispatcher.execute("select_clip", &json!({"clipId": "c1"})).await.unwrap();
        h.dispatcher.execute("play_pause", &json!({})).await.unwrap();

        assert_eq!(
            h.ui.events(),
            vec![
                UiEvent::Seek(42.0),
                UiEvent::Select("c1".to_string()),
                UiEvent::PlayPause
            ]
        );
    }

    #[tokio::test]
    async fn test_trim_clip_keeps_missing_offset() {
        let h = harness();
        let result = h
            .dispatcher
            .execute("trim_clip", &json!({"clipId": "c1", "trimStartOffset": 1.5}))
            .await
            .unwrap();
        assert_eq!(result["endTime"], json!(40.0));

        let clip = h.project.clip("c1").unwrap();
        assert_eq!(clip.trim_start_offset, 1.5);
        assert_eq!(clip.trim_end_offset, 0.0);
        assert_eq!(h.ui.events(), vec![UiEvent::Trim("c1".to_string(), 1.5, 0.0)]);
    }

    #[tokio::test]
    async fn test_energy_curve_needs_transcript() {
        let h = harness_with(
            crate::project::fixtures::project_with(Vec::new(), None),
            ScriptedProvider::new(),
        );
        let err = h
            .dispatcher
            .execute("analyze_energy_curve", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClipError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_energy_curve_default_resolution() {
        let h = harness();
        let result = h
            .dispatcher
            .execute("analyze_energy_curve", &json!({"clipId": "c1"}))
            .await
            .unwrap();
        assert_eq!(result["samples"].as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_energy_curve_rejects_huge_resolution() {
        let h = harness();
        for resolution in [json!(1e18), json!("5000")] {
            let err = h
                .dispatcher
                .execute(
                    "analyze_energy_curve",
                    &json!({"clipId": "c1", "resolution": resolution}),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, ClipError::InvalidArguments(_)));
        }

        let mut call = ToolCall::new(
            "t1",
            "analyze_energy_curve",
            json!({"clipId": "c1", "resolution": 1e18}),
        );
        h.dispatcher.run(&mut call).await.unwrap();
        assert_eq!(call.status, ToolCallStatus::Error);
        assert_eq!(call.error_kind, Some(ErrorKind::InvalidArguments));
    }

    #[tokio::test]
    async fn test_auto_review_dry_run_overrides() {
        let h = harness();
        let result = h
            .dispatcher
            .execute("auto_review_clips", &json!({"minHookStrength": 30, "dryRun": true}))
            .await
            .unwrap();
        assert_eq!(result["accepted"], json!(2));
        assert_eq!(h.project.clip("c2").unwrap().status, ClipStatus::Pending);
    }

    #[tokio::test]
    async fn test_compare_reports_missing_ids() {
        let h = harness();
        let result = h
            .dispatcher
            .execute("compare_clips", &json!({"clipIds": ["c1", "c2", "c9"]}))
            .await
            .unwrap();
        assert_eq!(result["missingClipIds"], json!(["c9"]));
        assert!(result.get("unresolved").is_none());

        let err = h
            .dispatcher
            .execute("compare_clips", &json!({"clipIds": ["c1", "c9"]}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClipError::Precondition(_)));
    }

    #[tokio::test]
    async fn test_run_detection_without_command() {
        let h = harness();
        let err = h.dispatcher.execute("run_detection", &json!({})).await.unwrap_err();
        assert!(matches!(err, ClipError::Detection(_)));
    }

    #[tokio::test]
    async fn test_compilation_uses_configured_vibe() {
        let project = sample_project();
        let ui = Arc::new(RecordingUi::default());
        let mut settings = Settings::default();
        settings.compilation.default_vibe = Vibe::HighEnergy;
        let dispatcher = Dispatcher::new(
            Arc::new(project),
            Arc::new(ScriptedProvider::new()),
            Arc::new(DisabledDetection),
            ui,
            settings,
            Prompts::default(),
        );
        let result = dispatcher
            .execute("create_vod_compilation", &json!({"targetDurationMinutes": 1}))
            .await
            .unwrap();
        assert_eq!(result["vibe"], json!("high-energy"));
    }

    #[tokio::test]
    async fn test_dead_space_removal() {
        let h = harness();
        h.dispatcher
            .execute("set_dead_space_removal", &json!({"deadSpaceId": "d2", "remove": "true"}))
            .await
            .unwrap();
        assert!(h.project.dead_spaces()[1].remove);

        let err = h
            .dispatcher
            .execute("set_dead_space_removal", &json!({"deadSpaceId": "d7", "remove": true}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClipError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_run_records_lifecycle() {
        let h = harness();
        let mut ok = ToolCall::new("t1", "get_project_state", json!({}));
        h.dispatcher.run(&mut ok).await.unwrap();
        assert!(ok.result.as_ref().unwrap()["clipCount"] == json!(3));

        let mut bad = ToolCall::new("t2", "select_clip", json!({}));
        h.dispatcher.run(&mut bad).await.unwrap();
        assert!(bad.error.as_ref().unwrap().contains("clipId"));

        assert!(h.dispatcher.run(&mut bad).await.is_err());
    }
}
