//! Error types for Timothy.
//!
//! Failures of external tooling are classified rather than collapsed: the
//! "already exists" condition reported by the administrative command is its
//! own variant so callers can match on it instead of inspecting text.

use crate::models::Stage;

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which half of a dump/restore pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineSide {
    /// The process producing the serialization
    Dump,
    /// The process applying the serialization
    Restore,
}

impl PipelineSide {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dump => "dump",
            Self::Restore => "restore",
        }
    }
}

impl fmt::Display for PipelineSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for Timothy.
///
/// Argument vectors carried here are always masked; the endpoint password is
/// replaced before the vector leaves the service that spawned the process.
#[derive(Debug, Error)]
pub enum TimothyError {
    /// The target database (or object) already exists.
    #[error("{} failed: target already exists", program(.argv))]
    AlreadyExists {
        /// Exit status of the failed command, `None` if killed by a signal.
        exit_code: Option<i32>,
        /// Masked argument vector of the failed command.
        argv: Vec<String>,
    },

    /// Any other failure of an external command.
    #[error("{} exited with {}: {}", program(.argv), status(.exit_code), trimmed(.stderr))]
    Command {
        /// Exit status of the failed command, `None` if killed by a signal.
        exit_code: Option<i32>,
        /// Masked argument vector of the failed command.
        argv: Vec<String>,
        /// Captured diagnostic stream.
        stderr: String,
    },

    /// One side of a dump/restore pipeline failed.
    #[error("{stage} stage {side} ({}) exited with {}: {}", program(.argv), status(.exit_code), trimmed(.stderr))]
    Pipeline {
        /// Stage that was streaming.
        stage: Stage,
        /// Which process failed.
        side: PipelineSide,
        /// Exit status of the failed process, `None` if killed by a signal.
        exit_code: Option<i32>,
        /// Masked argument vector of the failed process.
        argv: Vec<String>,
        /// Captured diagnostic stream.
        stderr: String,
    },

    /// An external program could not be started or its I/O failed.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// Program that was being run.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// An endpoint violates its invariants.
    #[error("Invalid endpoint: {message}")]
    InvalidEndpoint {
        /// Human-readable error message.
        message: String,
    },

    /// Configuration error.
    #[error("Config error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn program(argv: &[String]) -> &str {
    argv.first().map(String::as_str).unwrap_or("<empty command>")
}

fn status(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("status {code}"),
        None => "signal".to_string(),
    }
}

fn trimmed(text: &str) -> &str {
    text.trim()
}

impl TimothyError {
    // ========== Constructors ==========

    /// Create an already-exists error.
    pub fn already_exists(exit_code: Option<i32>, argv: Vec<String>) -> Self {
        Self::AlreadyExists { exit_code, argv }
    }

    /// Create a generic command failure.
    pub fn command(exit_code: Option<i32>, argv: Vec<String>, stderr: impl Into<String>) -> Self {
        Self::Command { exit_code, argv, stderr: stderr.into() }
    }

    /// Create a pipeline failure.
    pub fn pipeline(
        stage: Stage,
        side: PipelineSide,
        exit_code: Option<i32>,
        argv: Vec<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Pipeline { stage, side, exit_code, argv, stderr: stderr.into() }
    }

    /// Create a spawn error.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn { program: program.into(), source }
    }

    /// Create an invalid endpoint error.
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint { message: message.into() }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a new config error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(Box::new(source)) }
    }

    // ========== Methods ==========

    /// Check if this error is the already-exists condition.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Exit status of the failed external command (if applicable).
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::AlreadyExists { exit_code, .. }
            | Self::Command { exit_code, .. }
            | Self::Pipeline { exit_code, .. } => *exit_code,
            _ => None,
        }
    }

    /// Masked argument vector of the failed command (if applicable).
    pub fn argv(&self) -> Option<&[String]> {
        match self {
            Self::AlreadyExists { argv, .. }
            | Self::Command { argv, .. }
            | Self::Pipeline { argv, .. } => Some(argv),
            _ => None,
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::AlreadyExists { .. } => "Already Exists",
            Self::Command { .. } => "Command",
            Self::Pipeline { .. } => "Pipeline",
            Self::Spawn { .. } => "Spawn",
            Self::InvalidEndpoint { .. } => "Endpoint",
            Self::Config { .. } => "Config",
        }
    }

    /// Get actionable hint for the user.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::AlreadyExists { .. } => {
                Some("Drop the destination database or pick a new name before cloning")
            }
            Self::Command { .. } => Some("Check that the server is running and the credentials are valid"),
            Self::Pipeline { .. } => {
                Some("The destination may be partially cloned; inspect it before retrying")
            }
            Self::Spawn { .. } => Some("Check that the PostgreSQL client tools are installed and on PATH"),
            Self::InvalidEndpoint { .. } => None,
            Self::Config { .. } => None,
        }
    }

    /// Convert to user-displayable error info.
    pub fn to_error_info(&self) -> ErrorInfo {
        let error_type = format!("{} Error", self.category());
        let message = self.to_string();
        let hint = self.hint().map(String::from);

        let technical_detail = match self {
            Self::AlreadyExists { exit_code, argv }
            | Self::Command { exit_code, argv, .. }
            | Self::Pipeline { exit_code, argv, .. } => {
                let mut parts = vec![format!("Command: {}", argv.join(" "))];
                if let Some(code) = exit_code {
                    parts.push(format!("Exit code: {code}"));
                }
                if let Self::Pipeline { side, .. } = self {
                    parts.push(format!("Failed side: {side}"));
                }
                Some(parts.join("\n"))
            }
            _ => None,
        };

        ErrorInfo { error_type, message, hint, technical_detail }
    }
}

/// User-displayable error information.
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Category name (e.g., "Pipeline Error").
    pub error_type: String,
    /// User-friendly message.
    pub message: String,
    /// Actionable suggestion.
    pub hint: Option<String>,
    /// Technical detail (masked command line, exit code).
    pub technical_detail: Option<String>,
}

/// Convert from serde_json::Error to TimothyError.
impl From<serde_json::Error> for TimothyError {
    fn from(err: serde_json::Error) -> Self {
        TimothyError::config_with_source(format!("JSON error: {err}"), err)
    }
}
