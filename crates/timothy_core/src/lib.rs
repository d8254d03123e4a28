//! Core of Timothy, a PostgreSQL database cloner.
//!
//! Clones a database from one cluster into another by piping `pg_dump` into
//! `psql`, one section at a time:
//!
//! - **error**: Error taxonomy, with "already exists" kept distinct
//! - **models**: Endpoints, command lines, stages, and run reports
//! - **services**: Provisioning, stage pipelines, and orchestration
//! - **config**: Names of the external tools
//! - **logging**: Structured logging setup

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

#[cfg(all(test, unix))]
mod test_support;

pub use config::ToolConfig;
pub use error::{ErrorInfo, PipelineSide, TimothyError};
pub use models::{CloneReport, CommandLine, CommandSpec, Endpoint, Stage, StageReport};
pub use services::{
    clone_to, ensure_exists, CloneOrchestrator, CloneState, ExistsClassifier, PipelineStage,
    Provisioner,
};
