pub mod config;
pub mod presets;
mod orchestrator;
mod types;

pub use orchestrator::{run_and_export, run_pipeline, run_pipeline_reported, PipelineRun};
pub use presets::Preset;
pub use types::{CancelToken, NoOpReporter, PipelineStage, ProgressReporter};
