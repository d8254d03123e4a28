//! Classification of administrative command failures.
//!
//! The only signal the PostgreSQL tools give for "the object is already
//! there" is the wording of the diagnostic, so that wording is matched here
//! verbatim. A change in the tools' message text changes behavior.

use crate::error::TimothyError;
use crate::models::CommandLine;

use std::process::Stdio;

/// Diagnostic substring reported by PostgreSQL when a created object exists.
pub const ALREADY_EXISTS_MARKER: &str = "already exists";

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error (notices, warnings)
    pub stderr: String,
}

/// Runs control commands and reclassifies "already exists" failures.
pub struct ExistsClassifier;

impl ExistsClassifier {
    /// Run `command` to completion, capturing both output streams.
    ///
    /// Spawns exactly one process; there is no retry and no timeout.
    pub async fn run_classified(command: &CommandLine) -> Result<CommandOutput, TimothyError> {
        let (program, args) = command
            .argv()
            .split_first()
            .ok_or_else(|| TimothyError::config("Cannot run an empty command line"))?;

        tracing::debug!(command = %command, "Running control command");

        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                tracing::error!(program = %program, error = %e, "Failed to spawn control command");
                TimothyError::spawn(program.clone(), e)
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            return Ok(CommandOutput { stdout, stderr });
        }

        let err = Self::classify(output.status.code(), command.masked_argv().to_vec(), stderr);
        tracing::warn!(
            command = %command,
            exit_code = ?err.exit_code(),
            already_exists = err.is_already_exists(),
            "Control command failed"
        );
        Err(err)
    }

    /// Classify a non-zero exit by its diagnostic text.
    ///
    /// Only the text decides: the tools exit with the same status for an
    /// existing object as for any other SQL error.
    pub fn classify(exit_code: Option<i32>, masked_argv: Vec<String>, stderr: String) -> TimothyError {
        if stderr.contains(ALREADY_EXISTS_MARKER) {
            TimothyError::already_exists(exit_code, masked_argv)
        } else {
            TimothyError::command(exit_code, masked_argv, stderr)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv() -> Vec<String> {
        vec!["psql".to_string(), "-c".to_string(), "CREATE DATABASE \"x\"".to_string()]
    }

    #[test]
    fn test_classify_already_exists() {
        let err = ExistsClassifier::classify(
            Some(1),
            argv(),
            "ERROR:  database \"x\" already exists\n".to_string(),
        );
        assert!(err.is_already_exists());
        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(err.argv(), Some(argv().as_slice()));
    }

    #[test]
    fn test_classify_other_text_is_generic() {
        let err = ExistsClassifier::classify(
            Some(1),
            argv(),
            "ERROR:  permission denied to create database\n".to_string(),
        );
        assert!(!err.is_already_exists());
        assert!(matches!(err, TimothyError::Command { ref stderr, .. } if stderr.contains("permission denied")));
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let err = ExistsClassifier::classify(Some(1), argv(), "Already Exists".to_string());
        assert!(!err.is_already_exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_classified_success_and_failure() {
        let ok = CommandLine::new(["sh", "-c", "echo created"]);
        let output = ExistsClassifier::run_classified(&ok).await.unwrap();
        assert_eq!(output.stdout, "created\n");

        let exists = CommandLine::new(["sh", "-c", "echo 'ERROR:  database \"d\" already exists' >&2; exit 1"]);
        let err = ExistsClassifier::run_classified(&exists).await.unwrap_err();
        assert!(err.is_already_exists());

        let refused = CommandLine::new(["sh", "-c", "echo 'connection refused' >&2; exit 2"]);
        let err = ExistsClassifier::run_classified(&refused).await.unwrap_err();
        assert!(!err.is_already_exists());
        assert_eq!(err.exit_code(), Some(2));
    }

    #[tokio::test]
    async fn test_run_classified_missing_program() {
        let missing = CommandLine::new(["/nonexistent/timothy-psql"]);
        let err = ExistsClassifier::run_classified(&missing).await.unwrap_err();
        assert!(matches!(err, TimothyError::Spawn { .. }));

        let empty = CommandLine::new(Vec::<String>::new());
        assert!(ExistsClassifier::run_classified(&empty).await.is_err());
    }
}
