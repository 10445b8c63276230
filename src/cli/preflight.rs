//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration and inputs are available before
//! starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{ClipError, Result};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Talking to the assistant requires an API key and a project.
    Chat,
    /// Local tools and algorithms require a project.
    Local,
    /// Detection requires a project and a configured command.
    Detect,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, project: Option<&Path>, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Chat => {
            check_api_key()?;
            check_project(project)?;
        }
        Operation::Local => {
            check_project(project)?;
        }
        Operation::Detect => {
            check_project(project)?;
            if settings.detection.command.is_none() {
                return Err(ClipError::Config(
                    "No detection command configured. Set [detection] command in the config file"
                        .to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
pub fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(ClipError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(ClipError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check that a project snapshot was given and exists.
fn check_project(project: Option<&Path>) -> Result<()> {
    match project {
        Some(path) if path.is_file() => Ok(()),
        Some(path) => Err(ClipError::NotFound(format!(
            "Project snapshot {}",
            path.display()
        ))),
        None => Err(ClipError::Config(
            "No project given. Pass --project <file.json> or set CLIPAGENT_PROJECT".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_requires_project() {
        let settings = Settings::default();
        let err = check(Operation::Local, None, &settings).unwrap_err();
        assert!(matches!(err, ClipError::Config(_)));

        let missing = Path::new("/nonexistent/clipagent/project.json");
        let err = check(Operation::Local, Some(missing), &settings).unwrap_err();
        assert!(matches!(err, ClipError::NotFound(_)));
    }

    #[test]
    fn test_detect_requires_command() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut settings = Settings::default();
        assert!(check(Operation::Detect, Some(file.path()), &settings).is_err());

        settings.detection.command = Some("detector".to_string());
        assert!(check(Operation::Detect, Some(file.path()), &settings).is_ok());
        assert!(check(Operation::Local, Some(file.path()), &settings).is_ok());
    }
}
