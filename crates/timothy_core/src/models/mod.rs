//! Data models for Timothy.
//!
//! - `endpoint` - Endpoint (cluster address plus credentials)
//! - `command` - CommandSpec, CommandLine
//! - `stage` - Stage and the flags each stage passes to the tools
//! - `report` - CloneReport, StageReport

pub mod command;
pub mod endpoint;
pub mod report;
pub mod stage;

pub use command::{CommandLine, CommandSpec};
pub use endpoint::{Endpoint, DEFAULT_PORT, MASK};
pub use report::{CloneReport, StageReport};
pub use stage::{Stage, DUMP_FLAGS, RESTORE_FLAGS};
