//! In-memory project state holder.
//!
//! Backs the CLI and tests. Loads a JSON project snapshot and keeps it behind a
//! lock so the engine can mutate it through the [`ProjectState`] setters.

use super::{Clip, ClipStatus, DeadSpace, ProjectSnapshot, ProjectState, TranscriptWord};
use crate::error::{ClipError, Result};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// In-memory project state.
pub struct MemoryProject {
    snapshot: RwLock<ProjectSnapshot>,
}

impl MemoryProject {
    /// Create a project from a snapshot.
    pub fn new(snapshot: ProjectSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    /// Load a project snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: ProjectSnapshot = serde_json::from_str(&content)?;
        debug!(
            "Loaded project with {} clips from {}",
            snapshot.clips.len(),
            path.display()
        );
        Ok(Self::new(snapshot))
    }

    /// Write the current state back to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&*self.read())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> ProjectSnapshot {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, ProjectSnapshot> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProjectSnapshot> {
        self.snapshot.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_clip<F>(&self, clip_id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Clip) -> Result<()>,
    {
        let mut snapshot = self.write();
        let clip = snapshot
            .clips
            .iter_mut()
            .find(|c| c.id == clip_id)
            .ok_or_else(|| ClipError::NotFound(format!("Clip '{}' does not exist", clip_id)))?;
        f(clip)
    }
}

impl Default for MemoryProject {
    fn default() -> Self {
        Self::new(ProjectSnapshot::default())
    }
}

impl ProjectState for MemoryProject {
    fn clips(&self) -> Vec<Clip> {
        self.read().clips.clone()
    }

    fn clip(&self, id: &str) -> Option<Clip> {
        self.read().clips.iter().find(|c| c.id == id).cloned()
    }

    fn transcript(&self) -> Option<Vec<TranscriptWord>> {
        self.read().transcript.clone()
    }

    fn dead_spaces(&self) -> Vec<DeadSpace> {
        self.read().dead_spaces.clone()
    }

    fn media_path(&self) -> Option<PathBuf> {
        self.read().media_path.clone()
    }

    fn media_duration(&self) -> Option<f64> {
        self.read().media_duration
    }

    fn update_status(&self, clip_id: &str, status: ClipStatus) -> Result<()> {
        self.with_clip(clip_id, |clip| {
            debug!("Clip {} status {} -> {}", clip.id, clip.status, status);
            clip.status = status;
            Ok(())
        })
    }

    fn update_trim(
        &self,
        clip_id: &str,
        trim_start_offset: f64,
        trim_end_offset: f64,
    ) -> Result<()> {
        self.with_clip(clip_id, |clip| {
            let start = clip.start_time + trim_start_offset;
            let end = clip.end_time + trim_end_offset;
            if start < 0.0 || end <= start {
                return Err(ClipError::InvalidArguments(format!(
                    "Trim would leave clip '{}' with an invalid range ({:.2}s to {:.2}s)",
                    clip.id, start, end
                )));
            }
            clip.trim_start_offset = trim_start_offset;
            clip.trim_end_offset = trim_end_offset;
            Ok(())
        })
    }

    fn update_hook(
        &self,
        clip_id: &str,
        hook_text: Option<String>,
        title: Option<String>,
    ) -> Result<()> {
        self.with_clip(clip_id, |clip| {
            if hook_text.is_some() {
                clip.hook_text = hook_text;
            }
            if title.is_some() {
                clip.title = title;
            }
            Ok(())
        })
    }

    fn update_dead_space(&self, dead_space_id: &str, remove: bool) -> Result<()> {
        let mut snapshot = self.write();
        let dead_space = snapshot
            .dead_spaces
            .iter_mut()
            .find(|d| d.id == dead_space_id)
            .ok_or_else(|| {
                ClipError::NotFound(format!("Dead space '{}' does not exist", dead_space_id))
            })?;
        dead_space.remove = remove;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::sample_project;
    use super::*;

    #[test]
    fn test_update_status() {
        let project = sample_project();
        project.update_status("c2", ClipStatus::Accepted).unwrap();
        assert_eq!(project.clip("c2").unwrap().status, ClipStatus::Accepted);

        let err = project.update_status("nope", ClipStatus::Accepted).unwrap_err();
        assert!(matches!(err, ClipError::NotFound(_)));
    }

    #[test]
    fn test_update_trim_rejects_inverted_range() {
        let project = sample_project();
        let err = project.update_trim("c1", 20.0, -15.0).unwrap_err();
        assert!(matches!(err, ClipError::InvalidArguments(_)));
        assert_eq!(project.clip("c1").unwrap().trim_start_offset, 0.0);
    }

    #[test]
    fn test_update_hook_keeps_missing_fields() {
        let project = sample_project();
        project
            .update_hook("c1", Some("Wait for it".to_string()), None)
            .unwrap();
        let clip = project.clip("c1").unwrap();
        assert_eq!(clip.hook_text.as_deref(), Some("Wait for it"));
        assert_eq!(clip.title.as_deref(), Some("Opening rant"));
    }

    #[test]
    fn test_update_dead_space() {
        let project = sample_project();
        project.update_dead_space("d1", true).unwrap();
        assert!(project.dead_spaces()[0].remove);
        assert!(project.update_dead_space("d9", true).is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");

        let project = sample_project();
        project.update_status("c3", ClipStatus::Rejected).unwrap();
        project.save(&path).unwrap();

        let loaded = MemoryProject::load(&path).unwrap();
        assert_eq!(loaded.clips().len(), project.clips().len());
        assert_eq!(loaded.clip("c3").unwrap().status, ClipStatus::Rejected);
        assert!(loaded.transcript().is_some());
    }
}
