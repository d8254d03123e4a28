//! Top-level clone orchestration.
//!
//! A clone runs `Idle -> Provisioning -> Staging(pre-data) -> Staging(data)
//! -> Staging(post-data) -> Done`, dropping to `Failed` on the first error.
//! Nothing is rolled back: a failure after provisioning leaves the destination
//! with whatever the completed stages applied.

use crate::config::ToolConfig;
use crate::error::TimothyError;
use crate::models::{CloneReport, Endpoint, Stage};
use crate::services::pipeline::PipelineStage;
use crate::services::provisioner::Provisioner;

use chrono::Utc;
use std::fmt;
use tracing::Instrument;
use uuid::Uuid;

/// Progress of a single clone run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneState {
    Idle,
    Provisioning,
    Staging(Stage),
    Done,
    Failed,
}

impl fmt::Display for CloneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Provisioning => f.write_str("provisioning"),
            Self::Staging(stage) => write!(f, "staging({stage})"),
            Self::Done => f.write_str("done"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Clones databases between clusters with the configured tools.
///
/// Holds only configuration; concurrent clones of disjoint endpoint pairs
/// share nothing.
#[derive(Debug, Clone, Default)]
pub struct CloneOrchestrator {
    tools: ToolConfig,
}

impl CloneOrchestrator {
    /// Create an orchestrator using `tools`.
    pub fn new(tools: ToolConfig) -> Self {
        Self { tools }
    }

    /// Get the tool configuration.
    pub fn tools(&self) -> &ToolConfig {
        &self.tools
    }

    /// Create `endpoint`'s database, reporting an existing one as
    /// [`TimothyError::AlreadyExists`].
    pub async fn ensure_exists(&self, endpoint: &Endpoint) -> Result<(), TimothyError> {
        Provisioner::ensure(endpoint, &self.tools).await
    }

    /// Check that `source` can be cloned into `dest`.
    ///
    /// Both endpoints must be valid and name the same database: the pre-data
    /// section recreates and reconnects to the source's database by name, so
    /// any other destination name would be left empty.
    pub fn validate_pair(source: &Endpoint, dest: &Endpoint) -> Result<(), TimothyError> {
        source.validate()?;
        dest.validate()?;
        if source.database() != dest.database() {
            return Err(TimothyError::invalid_endpoint(format!(
                "Destination database \"{}\" must have the same name as source database \"{}\"",
                dest.database(),
                source.database()
            )));
        }
        Ok(())
    }

    /// The stages a clone from `source` to `dest` runs, in order.
    pub fn plan(&self, source: &Endpoint, dest: &Endpoint) -> Vec<PipelineStage> {
        Stage::ALL
            .iter()
            .map(|stage| PipelineStage::for_stage(*stage, source, dest, &self.tools))
            .collect()
    }

    /// Clone `source` into a newly created database described by `dest`.
    ///
    /// Refuses to touch an existing destination: if provisioning reports
    /// `AlreadyExists`, no stage runs and that error is returned. Endpoints
    /// failing [`CloneOrchestrator::validate_pair`] are rejected before
    /// anything is spawned.
    pub async fn clone_to(
        &self,
        source: &Endpoint,
        dest: &Endpoint,
    ) -> Result<CloneReport, TimothyError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("clone", run_id = %run_id, source = %source, dest = %dest);
        self.run_clone(run_id, source, dest).instrument(span).await
    }

    async fn run_clone(
        &self,
        run_id: Uuid,
        source: &Endpoint,
        dest: &Endpoint,
    ) -> Result<CloneReport, TimothyError> {
        let mut state = CloneState::Idle;
        let started_at = Utc::now();

        Self::validate_pair(source, dest)?;

        transition(&mut state, CloneState::Provisioning);
        if let Err(e) = Provisioner::ensure(dest, &self.tools).await {
            transition(&mut state, CloneState::Failed);
            if e.is_already_exists() {
                tracing::warn!("Destination database already exists, refusing to clone");
            }
            return Err(e);
        }

        let mut stages = Vec::with_capacity(Stage::ALL.len());
        for pipeline in self.plan(source, dest) {
            transition(&mut state, CloneState::Staging(pipeline.stage()));
            match pipeline.run().await {
                Ok(report) => stages.push(report),
                Err(e) => {
                    transition(&mut state, CloneState::Failed);
                    tracing::error!(
                        stage = %pipeline.stage(),
                        completed = stages.len(),
                        error = %e,
                        "Clone aborted, destination left partially cloned"
                    );
                    return Err(e);
                }
            }
        }

        transition(&mut state, CloneState::Done);
        let report = CloneReport {
            run_id,
            source: source.display_url(),
            destination: dest.display_url(),
            started_at,
            finished_at: Utc::now(),
            stages,
        };
        tracing::info!(elapsed_ms = report.elapsed_ms(), "Clone finished");
        Ok(report)
    }
}

fn transition(state: &mut CloneState, next: CloneState) {
    tracing::debug!(from = %state, to = %next, "Clone state changed");
    *state = next;
}

/// Create `endpoint`'s database using tools from the environment.
pub async fn ensure_exists(endpoint: &Endpoint) -> Result<(), TimothyError> {
    CloneOrchestrator::new(ToolConfig::from_env()).ensure_exists(endpoint).await
}

/// Clone `source` into `dest` using tools from the environment.
pub async fn clone_to(source: &Endpoint, dest: &Endpoint) -> Result<CloneReport, TimothyError> {
    CloneOrchestrator::new(ToolConfig::from_env()).clone_to(source, dest).await
}
