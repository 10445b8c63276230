//! Tool table: names, declarations and argument parsing.
//!
//! [`ToolKind`] is the single source of tool names and JSON schemas. The
//! declarations sent to the provider and the parser below are both driven by
//! it, so a tool cannot be advertised without being parseable.

use crate::actions::{OrderStrategy, TrimStrategy, Vibe};
use crate::analysis::Criterion;
use crate::error::{ClipError, Result};
use crate::project::ClipStatus;
use crate::provider::ToolDeclaration;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Broad grouping, used for listing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    Analysis,
    Action,
    Basic,
}

/// Every tool the assistant can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    AnalyzeClipQuality,
    AnalyzeEnergyCurve,
    AnalyzeSpeechPatterns,
    FindOptimalBoundaries,
    DetectHighlights,
    CompareClips,
    SmartTrimClip,
    AutoReviewClips,
    SuggestClipOrder,
    RunDetection,
    CreateVodCompilation,
    RegenerateHooks,
    SeekToTime,
    SelectClip,
    SetClipStatus,
    TrimClip,
    GetProjectState,
    GetTranscript,
    PlayPause,
    SetDeadSpaceRemoval,
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn range_properties() -> Map<String, Value> {
    let mut props = Map::new();
    props.insert(
        "clipId".into(),
        json!({"type": "string", "description": "Analyze this clip's range (overrides startTime/endTime)"}),
    );
    props.insert(
        "startTime".into(),
        json!({"type": "number", "description": "Range start in seconds (default: 0)"}),
    );
    props.insert(
        "endTime".into(),
        json!({"type": "number", "description": "Range end in seconds (default: end of media)"}),
    );
    props
}

impl ToolKind {
    pub const ALL: [ToolKind; 20] = [
        ToolKind::AnalyzeClipQuality,
        ToolKind::AnalyzeEnergyCurve,
        ToolKind::AnalyzeSpeechPatterns,
        ToolKind::FindOptimalBoundaries,
        ToolKind::DetectHighlights,
        ToolKind::CompareClips,
        ToolKind::SmartTrimClip,
        ToolKind::AutoReviewClips,
        ToolKind::SuggestClipOrder,
        ToolKind::RunDetection,
        ToolKind::CreateVodCompilation,
        ToolKind::RegenerateHooks,
        ToolKind::SeekToTime,
        ToolKind::SelectClip,
        ToolKind::SetClipStatus,
        ToolKind::TrimClip,
        ToolKind::GetProjectState,
        ToolKind::GetTranscript,
        ToolKind::PlayPause,
        ToolKind::SetDeadSpaceRemoval,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::AnalyzeClipQuality => "analyze_clip_quality",
            ToolKind::AnalyzeEnergyCurve => "analyze_energy_curve",
            ToolKind::AnalyzeSpeechPatterns => "analyze_speech_patterns",
            ToolKind::FindOptimalBoundaries => "find_optimal_boundaries",
            ToolKind::DetectHighlights => "detect_highlights",
            ToolKind::CompareClips => "compare_clips",
            ToolKind::SmartTrimClip => "smart_trim_clip",
            ToolKind::AutoReviewClips => "auto_review_clips",
            ToolKind::SuggestClipOrder => "suggest_clip_order",
            ToolKind::RunDetection => "run_detection",
            ToolKind::CreateVodCompilation => "create_vod_compilation",
            ToolKind::RegenerateHooks => "regenerate_hooks",
            ToolKind::SeekToTime => "seek_to_time",
            ToolKind::SelectClip => "select_clip",
            ToolKind::SetClipStatus => "set_clip_status",
            ToolKind::TrimClip => "trim_clip",
            ToolKind::GetProjectState => "get_project_state",
            ToolKind::GetTranscript => "get_transcript",
            ToolKind::PlayPause => "play_pause",
            ToolKind::SetDeadSpaceRemoval => "set_dead_space_removal",
        }
    }

    pub fn from_name(name: &str) -> Option<ToolKind> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn category(&self) -> ToolCategory {
        match self {
            ToolKind::AnalyzeClipQuality
            | ToolKind::AnalyzeEnergyCurve
            | ToolKind::AnalyzeSpeechPatterns
            | ToolKind::FindOptimalBoundaries
            | ToolKind::DetectHighlights
            | ToolKind::CompareClips => ToolCategory::Analysis,
            ToolKind::SmartTrimClip
            | ToolKind::AutoReviewClips
            | ToolKind::SuggestClipOrder
            | ToolKind::RunDetection
            | ToolKind::CreateVodCompilation
            | ToolKind::RegenerateHooks => ToolCategory::Action,
            _ => ToolCategory::Basic,
        }
    }

    /// Whether running this tool can change project data.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            ToolKind::SmartTrimClip
                | ToolKind::AutoReviewClips
                | ToolKind::CreateVodCompilation
                | ToolKind::RegenerateHooks
                | ToolKind::SetClipStatus
                | ToolKind::TrimClip
                | ToolKind::SetDeadSpaceRemoval
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::AnalyzeClipQuality => {
                "Grade a clip: duration, pacing, energy, hook strength, completeness, and a list of issues with suggestions."
            }
            ToolKind::AnalyzeEnergyCurve => {
                "Estimate speech energy over a clip or time range, with peaks and valleys. Requires a transcript."
            }
            ToolKind::AnalyzeSpeechPatterns => {
                "Find pauses, sentence boundaries, natural cut points and words per minute over a clip or time range. Requires a transcript."
            }
            ToolKind::FindOptimalBoundaries => {
                "Suggest cleaner start/end points for a clip, snapping to nearby pauses in speech. Does not apply them."
            }
            ToolKind::DetectHighlights => {
                "List the highest-scoring clips in a time range, plus energy peaks when a transcript exists."
            }
            ToolKind::CompareClips => {
                "Compare two or more clips on hook, energy, pacing and viral potential and pick winners."
            }
            ToolKind::SmartTrimClip => {
                "Adjust a clip's trim. Strategies: tighten (cut dead air around speech), extend_hook (start 1.5s earlier), energy_peaks (pull both edges in 0.5s)."
            }
            ToolKind::AutoReviewClips => {
                "Accept or reject all pending clips by score, hook strength and completeness thresholds. Use dryRun to preview."
            }
            ToolKind::SuggestClipOrder => {
                "Suggest an order for the accepted clips: chronological, best_first, topic_clusters or energy_arc."
            }
            ToolKind::RunDetection => {
                "Start the clip detection pipeline on the project's media."
            }
            ToolKind::CreateVodCompilation => {
                "Select clips for a compilation of the target length, mark them accepted, and order them by vibe."
            }
            ToolKind::RegenerateHooks => {
                "Write new hook text and titles for the given clips, or for all accepted clips."
            }
            ToolKind::SeekToTime => "Move the playhead to a time in seconds.",
            ToolKind::SelectClip => "Select a clip in the editor.",
            ToolKind::SetClipStatus => "Set one clip to pending, accepted or rejected.",
            ToolKind::TrimClip => {
                "Set a clip's trim offsets in seconds. Negative start offset extends earlier; negative end offset cuts the end."
            }
            ToolKind::GetProjectState => {
                "Get the full project overview: clips with scores and statuses, transcript and dead space."
            }
            ToolKind::GetTranscript => {
                "Get transcript text for a clip or time range."
            }
            ToolKind::PlayPause => "Toggle playback.",
            ToolKind::SetDeadSpaceRemoval => {
                "Mark or unmark a dead-space segment for removal."
            }
        }
    }

    /// JSON schema for the tool's arguments.
    pub fn parameters(&self) -> Value {
        match self {
            ToolKind::AnalyzeClipQuality | ToolKind::SelectClip => object(
                json!({"clipId": {"type": "string", "description": "The clip ID"}}),
                &["clipId"],
            ),
            ToolKind::AnalyzeEnergyCurve => {
                let mut props = range_properties();
                props.insert(
                    "resolution".into(),
                    json!({"type": "integer", "description": "Number of windows (default: 20)"}),
                );
                object(Value::Object(props), &[])
            }
            ToolKind::AnalyzeSpeechPatterns | ToolKind::GetTranscript => {
                object(Value::Object(range_properties()), &[])
            }
            ToolKind::FindOptimalBoundaries => object(
                json!({
                    "clipId": {"type": "string", "description": "The clip ID"},
                    "maxExtension": {"type": "number", "description": "Search radius in seconds (default: 3)"}
                }),
                &["clipId"],
            ),
            ToolKind::DetectHighlights => object(
                json!({
                    "startTime": {"type": "number", "description": "Range start in seconds"},
                    "endTime": {"type": "number", "description": "Range end in seconds"},
                    "minScore": {"type": "number", "description": "Minimum clip score (default: 70)"},
                    "limit": {"type": "integer", "description": "Maximum clips returned (default: 10)"}
                }),
                &[],
            ),
            ToolKind::CompareClips => object(
                json!({
                    "clipIds": {"type": "array", "items": {"type": "string"}, "description": "Two or more clip IDs"},
                    "criteria": {
                        "type": "array",
                        "items": {"type": "string", "enum": ["hook", "energy", "pacing", "viral_potential"]},
                        "description": "Criteria to compare on (default: all)"
                    }
                }),
                &["clipIds"],
            ),
            ToolKind::SmartTrimClip => object(
                json!({
                    "clipId": {"type": "string", "description": "The clip ID"},
                    "strategy": {"type": "string", "enum": ["tighten", "extend_hook", "energy_peaks"], "description": "Default: tighten"}
                }),
                &["clipId"],
            ),
            ToolKind::AutoReviewClips => object(
                json!({
                    "minScore": {"type": "number", "description": "Minimum final score (default: 70)"},
                    "minHookStrength": {"type": "number", "description": "Minimum hook strength (default: 50)"},
                    "requireComplete": {"type": "boolean", "description": "Reject incomplete clips (default: false)"},
                    "maxToAccept": {"type": "integer", "description": "Stop accepting after this many (default: unlimited)"},
                    "dryRun": {"type": "boolean", "description": "Preview decisions without applying them"}
                }),
                &[],
            ),
            ToolKind::SuggestClipOrder => object(
                json!({
                    "strategy": {"type": "string", "enum": ["chronological", "best_first", "topic_clusters", "energy_arc"], "description": "Default: energy_arc"}
                }),
                &[],
            ),
            ToolKind::RunDetection => object(
                json!({"settings": {"type": "object", "description": "Detection settings passed to the pipeline"}}),
                &[],
            ),
            ToolKind::CreateVodCompilation => object(
                json!({
                    "targetDurationMinutes": {"type": "number", "description": "Target length in minutes"},
                    "vibe": {"type": "string", "enum": ["chronological", "high-energy", "building", "best-moments-interspersed"]},
                    "transitionSeconds": {"type": "number", "description": "Transition length between clips (default: 0.5)"}
                }),
                &["targetDurationMinutes"],
            ),
            ToolKind::RegenerateHooks => object(
                json!({
                    "clipIds": {"type": "array", "items": {"type": "string"}, "description": "Clips to rewrite (default: all accepted)"}
                }),
                &[],
            ),
            ToolKind::SeekToTime => object(
                json!({"time": {"type": "number", "description": "Time in seconds"}}),
                &["time"],
            ),
            ToolKind::SetClipStatus => object(
                json!({
                    "clipId": {"type": "string", "description": "The clip ID"},
                    "status": {"type": "string", "enum": ["pending", "accepted", "rejected"]}
                }),
                &["clipId", "status"],
            ),
            ToolKind::TrimClip => object(
                json!({
                    "clipId": {"type": "string", "description": "The clip ID"},
                    "trimStartOffset": {"type": "number", "description": "Seconds added to the start"},
                    "trimEndOffset": {"type": "number", "description": "Seconds added to the end"}
                }),
                &["clipId"],
            ),
            ToolKind::GetProjectState | ToolKind::PlayPause => object(json!({}), &[]),
            ToolKind::SetDeadSpaceRemoval => object(
                json!({
                    "deadSpaceId": {"type": "string", "description": "The dead-space segment ID"},
                    "remove": {"type": "boolean", "description": "Whether to remove the segment"}
                }),
                &["deadSpaceId", "remove"],
            ),
        }
    }

    pub fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Declarations for every tool, in table order.
pub fn tool_definitions() -> Vec<ToolDeclaration> {
    ToolKind::ALL.iter().map(ToolKind::declaration).collect()
}

/// A parsed, validated tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCommand {
    AnalyzeClipQuality {
        clip_id: String,
    },
    AnalyzeEnergyCurve {
        clip_id: Option<String>,
        start_time: Option<f64>,
        end_time: Option<f64>,
        resolution: Option<usize>,
    },
    AnalyzeSpeechPatterns {
        clip_id: Option<String>,
        start_time: Option<f64>,
        end_time: Option<f64>,
    },
    FindOptimalBoundaries {
        clip_id: String,
        max_extension: Option<f64>,
    },
    DetectHighlights {
        start_time: Option<f64>,
        end_time: Option<f64>,
        min_score: Option<f64>,
        limit: Option<usize>,
    },
    CompareClips {
        clip_ids: Vec<String>,
        criteria: Option<Vec<Criterion>>,
    },
    SmartTrimClip {
        clip_id: String,
        strategy: TrimStrategy,
    },
    AutoReviewClips {
        min_score: Option<f64>,
        min_hook_strength: Option<f64>,
        require_complete: Option<bool>,
        max_to_accept: Option<usize>,
        dry_run: bool,
    },
    SuggestClipOrder {
        strategy: OrderStrategy,
    },
    RunDetection {
        settings: Value,
    },
    CreateVodCompilation {
        target_duration_minutes: f64,
        vibe: Option<Vibe>,
        transition_seconds: Option<f64>,
    },
    RegenerateHooks {
        clip_ids: Option<Vec<String>>,
    },
    SeekToTime {
        time: f64,
    },
    SelectClip {
        clip_id: String,
    },
    SetClipStatus {
        clip_id: String,
        status: ClipStatus,
    },
    TrimClip {
        clip_id: String,
        trim_start_offset: Option<f64>,
        trim_end_offset: Option<f64>,
    },
    GetProjectState,
    GetTranscript {
        clip_id: Option<String>,
        start_time: Option<f64>,
        end_time: Option<f64>,
    },
    PlayPause,
    SetDeadSpaceRemoval {
        dead_space_id: String,
        remove: bool,
    },
}

impl ToolCommand {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolCommand::AnalyzeClipQuality { .. } => ToolKind::AnalyzeClipQuality,
            ToolCommand::AnalyzeEnergyCurve { .. } => ToolKind::AnalyzeEnergyCurve,
            ToolCommand::AnalyzeSpeechPatterns { .. } => ToolKind::AnalyzeSpeechPatterns,
            ToolCommand::FindOptimalBoundaries { .. } => ToolKind::FindOptimalBoundaries,
            ToolCommand::DetectHighlights { .. } => ToolKind::DetectHighlights,
            ToolCommand::CompareClips { .. } => ToolKind::CompareClips,
            ToolCommand::SmartTrimClip { .. } => ToolKind::SmartTrimClip,
            ToolCommand::AutoReviewClips { .. } => ToolKind::AutoReviewClips,
            ToolCommand::SuggestClipOrder { .. } => ToolKind::SuggestClipOrder,
            ToolCommand::RunDetection { .. } => ToolKind::RunDetection,
            ToolCommand::CreateVodCompilation { .. } => ToolKind::CreateVodCompilation,
            ToolCommand::RegenerateHooks { .. } => ToolKind::RegenerateHooks,
            ToolCommand::SeekToTime { .. } => ToolKind::SeekToTime,
            ToolCommand::SelectClip { .. } => ToolKind::SelectClip,
            ToolCommand::SetClipStatus { .. } => ToolKind::SetClipStatus,
            ToolCommand::TrimClip { .. } => ToolKind::TrimClip,
            ToolCommand::GetProjectState => ToolKind::GetProjectState,
            ToolCommand::GetTranscript { .. } => ToolKind::GetTranscript,
            ToolCommand::PlayPause => ToolKind::PlayPause,
            ToolCommand::SetDeadSpaceRemoval { .. } => ToolKind::SetDeadSpaceRemoval,
        }
    }
}

/// Lenient view over a tool's argument object.
///
/// Keys are looked up in camelCase first, then snake_case. Numbers may arrive
/// as numeric strings and booleans as `"true"`/`"false"`.
struct Args<'a> {
    tool: &'a str,
    map: Map<String, Value>,
}

fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

impl<'a> Args<'a> {
    fn new(tool: &'a str, arguments: &Value) -> Result<Self> {
        let map = match arguments {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => map,
                _ => {
                    return Err(ClipError::InvalidArguments(format!(
                        "{}: arguments are not a JSON object",
                        tool
                    )))
                }
            },
            _ => {
                return Err(ClipError::InvalidArguments(format!(
                    "{}: arguments must be a JSON object",
                    tool
                )))
            }
        };
        Ok(Self { tool, map })
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.map
            .get(key)
            .or_else(|| self.map.get(&snake_case(key)))
            .filter(|v| !v.is_null())
    }

    fn invalid(&self, key: &str, expected: &str) -> ClipError {
        ClipError::InvalidArguments(format!("{}: '{}' must be {}", self.tool, key, expected))
    }

    fn missing(&self, key: &str) -> ClipError {
        ClipError::InvalidArguments(format!("{}: missing required argument '{}'", self.tool, key))
    }

    fn string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(self.invalid(key, "a string")),
        }
    }

    fn required_string(&self, key: &str) -> Result<String> {
        self.string(key)?
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| self.missing(key))
    }

    fn number(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.invalid(key, "a number")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| self.invalid(key, "a number")),
            Some(_) => Err(self.invalid(key, "a number")),
        }
    }

    fn required_number(&self, key: &str) -> Result<f64> {
        self.number(key)?.ok_or_else(|| self.missing(key))
    }

    fn count(&self, key: &str) -> Result<Option<usize>> {
        match self.number(key)? {
            None => Ok(None),
            Some(v) if v >= 0.0 && v.fract() == 0.0 => Ok(Some(v as usize)),
            Some(_) => Err(self.invalid(key, "a non-negative integer")),
        }
    }

    fn boolean(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(self.invalid(key, "true or false")),
            },
            Some(_) => Err(self.invalid(key, "true or false")),
        }
    }

    fn required_boolean(&self, key: &str) -> Result<bool> {
        self.boolean(key)?.ok_or_else(|| self.missing(key))
    }

    /// An array of strings, or a single comma-separated string.
    fn string_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.trim().to_string()),
                    Value::Number(n) => Ok(n.to_string()),
                    _ => Err(self.invalid(key, "an array of strings")),
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(Value::String(s)) => Ok(Some(
                s.split(',')
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect(),
            )),
            Some(_) => Err(self.invalid(key, "an array of strings")),
        }
    }

    fn parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr<Err = ClipError>,
    {
        self.string(key)?.map(|s| s.parse::<T>()).transpose()
    }
}

/// Parse and validate a tool call by name.
pub fn parse_tool_call(name: &str, arguments: &Value) -> Result<ToolCommand> {
    let kind = ToolKind::from_name(name).ok_or_else(|| ClipError::UnknownTool(name.to_string()))?;
    let args = Args::new(name, arguments)?;

    let command = match kind {
        ToolKind::AnalyzeClipQuality => ToolCommand::AnalyzeClipQuality {
            clip_id: args.required_string("clipId")?,
        },
        ToolKind::AnalyzeEnergyCurve => ToolCommand::AnalyzeEnergyCurve {
            clip_id: args.string("clipId")?,
            start_time: args.number("startTime")?,
            end_time: args.number("endTime")?,
            resolution: args.count("resolution")?,
        },
        ToolKind::AnalyzeSpeechPatterns => ToolCommand::AnalyzeSpeechPatterns {
            clip_id: args.string("clipId")?,
            start_time: args.number("startTime")?,
            end_time: args.number("endTime")?,
        },
        ToolKind::FindOptimalBoundaries => ToolCommand::FindOptimalBoundaries {
            clip_id: args.required_string("clipId")?,
            max_extension: args.number("maxExtension")?,
        },
        ToolKind::DetectHighlights => ToolCommand::DetectHighlights {
            start_time: args.number("startTime")?,
            end_time: args.number("endTime")?,
            min_score: args.number("minScore")?,
            limit: args.count("limit")?,
        },
        ToolKind::CompareClips => {
            let clip_ids = args
                .string_list("clipIds")?
                .ok_or_else(|| args.missing("clipIds"))?;
            let criteria = args
                .string_list("criteria")?
                .filter(|c| !c.is_empty())
                .map(|list| {
                    list.iter()
                        .map(|c| c.parse::<Criterion>())
                        .collect::<Result<Vec<_>>>()
                })
                .transpose()?;
            ToolCommand::CompareClips { clip_ids, criteria }
        }
        ToolKind::SmartTrimClip => ToolCommand::SmartTrimClip {
            clip_id: args.required_string("clipId")?,
            strategy: args.parsed::<TrimStrategy>("strategy")?.unwrap_or_default(),
        },
        ToolKind::AutoReviewClips => ToolCommand::AutoReviewClips {
            min_score: args.number("minScore")?,
            min_hook_strength: args.number("minHookStrength")?,
            require_complete: args.boolean("requireComplete")?,
            max_to_accept: args.count("maxToAccept")?,
            dry_run: args.boolean("dryRun")?.unwrap_or(false),
        },
        ToolKind::SuggestClipOrder => ToolCommand::SuggestClipOrder {
            strategy: args.parsed::<OrderStrategy>("strategy")?.unwrap_or_default(),
        },
        ToolKind::RunDetection => ToolCommand::RunDetection {
            settings: args.get("settings").cloned().unwrap_or_else(|| json!({})),
        },
        ToolKind::CreateVodCompilation => ToolCommand::CreateVodCompilation {
            target_duration_minutes: args.required_number("targetDurationMinutes")?,
            vibe: args.parsed::<Vibe>("vibe")?,
            transition_seconds: args.number("transitionSeconds")?,
        },
        ToolKind::RegenerateHooks => ToolCommand::RegenerateHooks {
            clip_ids: args.string_list("clipIds")?.filter(|ids| !ids.is_empty()),
        },
        ToolKind::SeekToTime => ToolCommand::SeekToTime {
            time: args.required_number("time")?,
        },
        ToolKind::SelectClip => ToolCommand::SelectClip {
            clip_id: args.required_string("clipId")?,
        },
        ToolKind::SetClipStatus => {
            let raw = args.required_string("status")?;
            let status = raw
                .parse::<ClipStatus>()
                .map_err(|e| ClipError::InvalidArguments(format!("{}: {}", name, e)))?;
            ToolCommand::SetClipStatus {
                clip_id: args.required_string("clipId")?,
                status,
            }
        }
        ToolKind::TrimClip => ToolCommand::TrimClip {
            clip_id: args.required_string("clipId")?,
            trim_start_offset: args.number("trimStartOffset")?,
            trim_end_offset: args.number("trimEndOffset")?,
        },
        ToolKind::GetProjectState => ToolCommand::GetProjectState,
        ToolKind::GetTranscript => ToolCommand::GetTranscript {
            clip_id: args.string("clipId")?,
            start_time: args.number("startTime")?,
            end_time: args.number("endTime")?,
        },
        ToolKind::PlayPause => ToolCommand::PlayPause,
        ToolKind::SetDeadSpaceRemoval => ToolCommand::SetDeadSpaceRemoval {
            dead_space_id: args.required_string("deadSpaceId")?,
            remove: args.required_boolean("remove")?,
        },
    };

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal valid arguments for each tool.
    fn minimal_args(kind: ToolKind) -> Value {
        match kind {
            ToolKind::AnalyzeClipQuality
            | ToolKind::FindOptimalBoundaries
            | ToolKind::SmartTrimClip
            | ToolKind::SelectClip
            | ToolKind::TrimClip => json!({"clipId": "c1"}),
            ToolKind::CompareClips => json!({"clipIds": ["c1", "c2"]}),
            ToolKind::CreateVodCompilation => json!({"targetDurationMinutes": 10}),
            ToolKind::SeekToTime => json!({"time": 12.5}),
            ToolKind::SetClipStatus => json!({"clipId": "c1", "status": "accepted"}),
            ToolKind::SetDeadSpaceRemoval => json!({"deadSpaceId": "d1", "remove": true}),
            _ => json!({}),
        }
    }

    #[test]
    fn test_every_declared_tool_parses() {
        let declarations = tool_definitions();
        assert_eq!(declarations.len(), 20);
        for declaration in &declarations {
            let kind = ToolKind::from_name(&declaration.name).unwrap();
            let command = parse_tool_call(&declaration.name, &minimal_args(kind)).unwrap();
            assert_eq!(command.kind(), kind);

            let required = declaration.parameters["required"].as_array().unwrap();
            for field in required {
                let field = field.as_str().unwrap();
                assert!(
                    declaration.parameters["properties"].get(field).is_some(),
                    "{} requires undeclared {}",
                    declaration.name,
                    field
                );
            }
        }
    }

    #[test]
    fn test_unknown_tool() {
        let err = parse_tool_call("delete_everything", &json!({})).unwrap_err();
        assert!(matches!(err, ClipError::UnknownTool(_)));
    }

    #[test]
    fn test_missing_required_argument() {
        let err = parse_tool_call("set_clip_status", &json!({"clipId": "c1"})).unwrap_err();
        assert!(matches!(err, ClipError::InvalidArguments(_)));
        assert!(err.to_string().contains("status"));
    }

    #[test]
    fn test_numeric_and_boolean_coercion() {
        let command = parse_tool_call(
            "auto_review_clips",
            &json!({"minScore": "65", "requireComplete": "true", "maxToAccept": 3, "dryRun": "false"}),
        )
        .unwrap();
        assert_eq!(
            command,
            ToolCommand::AutoReviewClips {
                min_score: Some(65.0),
                min_hook_strength: None,
                require_complete: Some(true),
                max_to_accept: Some(3),
                dry_run: false,
            }
        );

        let err = parse_tool_call("seek_to_time", &json!({"time": "soon"})).unwrap_err();
        assert!(matches!(err, ClipError::InvalidArguments(_)));
    }

    #[test]
    fn test_snake_case_keys_and_comma_lists() {
        let command = parse_tool_call(
            "compare_clips",
            &json!({"clip_ids": "c1, c2", "criteria": ["hook", "viral_potential"]}),
        )
        .unwrap();
        assert_eq!(
            command,
            ToolCommand::CompareClips {
                clip_ids: vec!["c1".to_string(), "c2".to_string()],
                criteria: Some(vec![Criterion::Hook, Criterion::ViralPotential]),
            }
        );
    }

    #[test]
    fn test_enum_arguments() {
        let command = parse_tool_call(
            "create_vod_compilation",
            &json!({"targetDurationMinutes": "2.5", "vibe": "high_energy"}),
        )
        .unwrap();
        assert_eq!(
            command,
            ToolCommand::CreateVodCompilation {
                target_duration_minutes: 2.5,
                vibe: Some(Vibe::HighEnergy),
                transition_seconds: None,
            }
        );

        let err = parse_tool_call("smart_trim_clip", &json!({"clipId": "c1", "strategy": "chop"}))
            .unwrap_err();
        assert!(matches!(err, ClipError::InvalidArguments(_)));
    }

    #[test]
    fn test_raw_string_arguments() {
        let command = parse_tool_call("select_clip", &json!("{\"clipId\": \"c2\"}")).unwrap();
        assert_eq!(command, ToolCommand::SelectClip { clip_id: "c2".to_string() });

        let err = parse_tool_call("select_clip", &json!("{clipId")).unwrap_err();
        assert!(matches!(err, ClipError::InvalidArguments(_)));
    }
}
