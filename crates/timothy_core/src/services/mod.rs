//! Clone services.
//!
//! - `classifier` - Runs control commands, separating "already exists" failures
//! - `provisioner` - Creates the destination database
//! - `pipeline` - Streams one dump into one restore
//! - `orchestrator` - Provisions, then runs the stages in order

pub mod classifier;
pub mod orchestrator;
pub mod pipeline;
pub mod provisioner;

pub use classifier::{CommandOutput, ExistsClassifier, ALREADY_EXISTS_MARKER};
pub use orchestrator::{clone_to, ensure_exists, CloneOrchestrator, CloneState};
pub use pipeline::PipelineStage;
pub use provisioner::Provisioner;
