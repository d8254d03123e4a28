//! Tool configuration.
//!
//! Names the external binaries and the maintenance database. Values come from
//! defaults, then `TIMOTHY_*` environment variables, then an optional JSON
//! file, then command-line overrides.

use crate::error::TimothyError;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding the dump program.
pub const DUMP_PROGRAM_ENV: &str = "TIMOTHY_PG_DUMP";

/// Environment variable overriding the restore program.
pub const RESTORE_PROGRAM_ENV: &str = "TIMOTHY_PSQL";

/// Environment variable overriding the administrative program.
pub const ADMIN_PROGRAM_ENV: &str = "TIMOTHY_ADMIN_PSQL";

/// Environment variable overriding the maintenance database.
pub const ADMIN_DATABASE_ENV: &str = "TIMOTHY_ADMIN_DB";

/// External programs used by a clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Program producing plain-format dumps
    pub dump_program: String,
    /// Program applying plain-format dumps from stdin
    pub restore_program: String,
    /// Program running the create-database directive
    pub admin_program: String,
    /// Database the administrative program connects to
    pub admin_database: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            dump_program: "pg_dump".to_string(),
            restore_program: "psql".to_string(),
            admin_program: "psql".to_string(),
            admin_database: "postgres".to_string(),
        }
    }
}

impl ToolConfig {
    /// Defaults overlaid with the `TIMOTHY_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Load a JSON file; missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TimothyError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TimothyError::config_with_source(format!("Failed to read {}", path.display()), e)
        })?;
        let config: ToolConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from a key lookup (the environment, in production).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(v) = non_empty(DUMP_PROGRAM_ENV) {
            self.dump_program = v;
        }
        if let Some(v) = non_empty(RESTORE_PROGRAM_ENV) {
            self.restore_program = v;
        }
        if let Some(v) = non_empty(ADMIN_PROGRAM_ENV) {
            self.admin_program = v;
        }
        if let Some(v) = non_empty(ADMIN_DATABASE_ENV) {
            self.admin_database = v;
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), TimothyError> {
        for (name, value) in [
            ("dump_program", &self.dump_program),
            ("restore_program", &self.restore_program),
            ("admin_program", &self.admin_program),
            ("admin_database", &self.admin_database),
        ] {
            if value.is_empty() {
                return Err(TimothyError::config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}
