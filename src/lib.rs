pub mod error;
pub mod game_log;
mod pipeline;
pub mod sets;
pub mod settings;

pub use pipeline::{outcome_to_json, run_from_paths, run_pipeline, write_outcome, PipelineOutcome};
pub use settings::{read_settings, PipelineSettings};
