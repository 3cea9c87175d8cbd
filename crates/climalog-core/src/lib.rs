pub mod archive;
pub mod config;
pub mod energy;
pub mod error;
pub mod joins;
pub mod pipeline;
pub mod schema;
pub mod temperature;
pub mod units;
pub mod validation;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, RunSummary};
