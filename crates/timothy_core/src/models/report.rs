//! Clone run reports.

use crate::models::Stage;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Outcome of one successfully streamed stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    /// Stage that ran
    pub stage: Stage,
    /// Wall-clock time from spawning the dump to reaping it
    pub elapsed_ms: u64,
    /// Size of the dump's diagnostic output (verbose progress)
    pub dump_diagnostics_bytes: usize,
    /// Everything the restore wrote to stdout
    pub restore_output: String,
}

/// Summary of a completed clone.
#[derive(Debug, Clone, Serialize)]
pub struct CloneReport {
    /// Unique identifier of this run, also attached to its log span
    pub run_id: Uuid,
    /// Source, without password
    pub source: String,
    /// Destination, without password
    pub destination: String,
    /// When provisioning started
    pub started_at: DateTime<Utc>,
    /// When the last stage finished
    pub finished_at: DateTime<Utc>,
    /// Per-stage results in execution order
    pub stages: Vec<StageReport>,
}

impl CloneReport {
    /// Total wall-clock time of the run in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Stages in the order they completed.
    pub fn stage_order(&self) -> Vec<Stage> {
        self.stages.iter().map(|s| s.stage).collect()
    }
}
