//! Public façade for the engine layer.

pub mod orchestrator;
pub mod types;

pub use orchestrator::Orchestrator;
pub use types::{GenerationRequest, GenerationResult};
