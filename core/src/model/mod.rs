//! The decoder model: configuration, the repeated transformer layer, and the forward pipeline.

pub mod config;
pub mod layer;
pub mod pipeline;

pub use config::ModelConfig;
pub use layer::TransformerLayer;
pub use pipeline::{ForwardPipeline, forward_pass, forward_pass_with, forward_text};
