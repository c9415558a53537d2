// file: src/pipeline/mod.rs
// description: export pipeline module exports
// reference: internal module structure

pub mod orchestrator;
pub mod progress;

pub use orchestrator::PipelineOrchestrator;
pub use progress::{DownloadStats, PipelineStats, ProgressTracker};
