//! Clone stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flags every dump invocation carries: plain SQL, progress on stderr.
pub const DUMP_FLAGS: [&str; 2] = ["--format=plain", "--verbose"];

/// Flags every restore invocation carries.
///
/// Plain-format dumps are applied with `psql`, not `pg_restore`. `-X` skips
/// the user's `.psqlrc`.
pub const RESTORE_FLAGS: [&str; 2] = ["-X", "--echo-queries"];

/// One phase of a dump/restore clone.
///
/// Later stages depend on objects created by earlier ones, so they always run
/// in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Schema objects, recreated from scratch without ownership or ACLs
    PreData,
    /// Table contents, loaded with triggers disabled
    Data,
    /// Indexes, constraints and triggers
    PostData,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 3] = [Stage::PreData, Stage::Data, Stage::PostData];

    /// Convert to string representation (the `--section` value).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreData => "pre-data",
            Self::Data => "data",
            Self::PostData => "post-data",
        }
    }

    /// Stage-specific dump arguments.
    ///
    /// The data stage copies the source as is: rows violating foreign keys are
    /// carried over, not repaired.
    pub fn dump_args(&self) -> &'static [&'static str] {
        match self {
            Self::PreData => &[
                "--section=pre-data",
                "--clean",
                "--if-exists",
                "--create",
                "--no-acl",
                "--no-owner",
            ],
            Self::Data => &["--section=data", "--disable-triggers"],
            Self::PostData => &["--section=post-data"],
        }
    }

    /// Stage-specific restore arguments.
    ///
    /// Data and post-data stop at the first SQL error so `psql` exits
    /// non-zero. Pre-data runs without it: `--create` replays `DROP DATABASE`
    /// and `CREATE DATABASE` against the database just provisioned, and both
    /// fail before `\connect` switches to it.
    pub fn restore_args(&self) -> &'static [&'static str] {
        match self {
            Self::PreData => &[],
            Self::Data | Self::PostData => &["-v", "ON_ERROR_STOP=1"],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::ALL, [Stage::PreData, Stage::Data, Stage::PostData]);
        assert!(Stage::PreData < Stage::Data && Stage::Data < Stage::PostData);
    }

    #[test]
    fn test_dump_args_select_section() {
        for stage in Stage::ALL {
            assert_eq!(stage.dump_args()[0], format!("--section={stage}"));
        }
        assert!(Stage::PreData.dump_args().contains(&"--no-owner"));
        assert!(Stage::Data.dump_args().contains(&"--disable-triggers"));
    }

    #[test]
    fn test_restore_stops_on_error_after_pre_data() {
        assert!(Stage::PreData.restore_args().is_empty());
        assert_eq!(Stage::Data.restore_args(), ["-v", "ON_ERROR_STOP=1"]);
        assert_eq!(Stage::PostData.restore_args(), ["-v", "ON_ERROR_STOP=1"]);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Stage::PostData).unwrap(), "\"post-data\"");
        let stage: Stage = serde_json::from_str("\"pre-data\"").unwrap();
        assert_eq!(stage, Stage::PreData);
    }
}
