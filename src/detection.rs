//! Clip-detection job control.
//!
//! Detection itself is an external pipeline. The engine only starts a job for
//! the project's media and can cancel it; results arrive in the project state
//! through the host application.

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Outcome of a start request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionStart {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queued: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectionStart {
    pub fn started() -> Self {
        Self {
            success: true,
            queued: Some(false),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            queued: None,
            error: Some(error.into()),
        }
    }
}

/// Start/cancel interface to the detection pipeline.
#[async_trait]
pub trait DetectionControl: Send + Sync {
    async fn start(
        &self,
        job_id: &str,
        file_path: &Path,
        settings: &Value,
        known_duration: Option<f64>,
    ) -> Result<DetectionStart>;

    /// Returns `false` when no such job is running.
    async fn cancel(&self, job_id: &str) -> Result<bool>;
}

/// Used when no detection command is configured.
pub struct DisabledDetection;

#[async_trait]
impl DetectionControl for DisabledDetection {
    async fn start(
        &self,
        _job_id: &str,
        _file_path: &Path,
        _settings: &Value,
        _known_duration: Option<f64>,
    ) -> Result<DetectionStart> {
        Ok(DetectionStart::failed(
            "Detection is not configured (set detection.command)",
        ))
    }

    async fn cancel(&self, _job_id: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Runs each detection job as an external command.
///
/// The command receives `--job-id`, `--input`, `--settings` (JSON) and, when
/// known, `--duration` after any configured arguments.
pub struct CommandDetection {
    command: String,
    args: Vec<String>,
    jobs: Mutex<HashMap<String, Child>>,
}

impl CommandDetection {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Number of jobs still running.
    pub async fn running(&self) -> usize {
        let mut jobs = self.jobs.lock().await;
        reap_finished(&mut jobs);
        jobs.len()
    }
}

fn reap_finished(jobs: &mut HashMap<String, Child>) {
    jobs.retain(|job_id, child| match child.try_wait() {
        Ok(Some(status)) => {
            debug!("Detection job {} exited with {}", job_id, status);
            false
        }
        Ok(None) => true,
        Err(e) => {
            warn!("Could not poll detection job {}: {}", job_id, e);
            false
        }
    });
}

#[async_trait]
impl DetectionControl for CommandDetection {
    #[instrument(skip(self, settings), fields(command = %self.command))]
    async fn start(
        &self,
        job_id: &str,
        file_path: &Path,
        settings: &Value,
        known_duration: Option<f64>,
    ) -> Result<DetectionStart> {
        let mut jobs = self.jobs.lock().await;
        reap_finished(&mut jobs);

        if jobs.contains_key(job_id) {
            return Ok(DetectionStart::failed(format!(
                "Detection job {} is already running",
                job_id
            )));
        }

        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .arg("--job-id")
            .arg(job_id)
            .arg("--input")
            .arg(file_path)
            .arg("--settings")
            .arg(settings.to_string());
        if let Some(duration) = known_duration {
            command.arg("--duration").arg(format!("{:.3}", duration));
        }

        let spawned = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        match spawned {
            Ok(child) => {
                info!("Started detection job {} for {}", job_id, file_path.display());
                jobs.insert(job_id.to_string(), child);
                Ok(DetectionStart::started())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DetectionStart::failed(
                format!("Detection command not found: {}", self.command),
            )),
            Err(e) => Ok(DetectionStart::failed(format!(
                "Failed to start detection: {}",
                e
            ))),
        }
    }

    async fn cancel(&self, job_id: &str) -> Result<bool> {
        let Some(mut child) = self.jobs.lock().await.remove(job_id) else {
            return Ok(false);
        };
        child.kill().await?;
        info!("Cancelled detection job {}", job_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_command_reports_failure() {
        let detection = CommandDetection::new("clipagent-no-such-detector", Vec::new());
        let start = detection
            .start("job-1", Path::new("/tmp/x.mp4"), &json!({}), None)
            .await
            .unwrap();
        assert!(!start.success);
        assert!(start.error.unwrap().contains("not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_start_and_cancel() {
        let detection = CommandDetection::new("sh", vec!["-c".to_string(), "sleep 30".to_string()]);
        let start = detection
            .start("job-1", Path::new("/tmp/x.mp4"), &json!({"sensitivity": 0.5}), Some(60.0))
            .await
            .unwrap();
        assert!(start.success);
        assert_eq!(detection.running().await, 1);

        let duplicate = detection
            .start("job-1", Path::new("/tmp/x.mp4"), &json!({}), None)
            .await
            .unwrap();
        assert!(!duplicate.success);

        assert!(detection.cancel("job-1").await.unwrap());
        assert!(!detection.cancel("job-1").await.unwrap());
        assert_eq!(detection.running().await, 0);
    }

    #[test]
    fn test_disabled_detection() {
        let start = tokio_test::block_on(DisabledDetection.start(
            "job",
            Path::new("a.mp4"),
            &Value::Null,
            None,
        ));
        let start = tokio_test::assert_ok!(start);
        assert!(!start.success);
        assert!(!tokio_test::block_on(DisabledDetection.cancel("job")).unwrap());
    }
}
