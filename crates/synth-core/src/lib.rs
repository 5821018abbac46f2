//! Type synthesis for abstract contracts.
//!
//! - [`synthesizer`]: [`TypeSynthesizer`], the cache and the instantiate operation
//! - [`emit`]: the [`TypeEmitter`] capability, [`TypeBuilder`] and stub generation
//! - [`config`]: [`SynthesizerConfig`] and its environment overrides
//! - [`metrics`]: resolution counters

pub mod config;
pub mod emit;
pub mod metrics;
pub mod synthesizer;

pub use config::SynthesizerConfig;
pub use emit::{initialize_from_contract, stub_attributes, RuntimeEmitter, TypeBuilder, TypeEmitter};
pub use metrics::{MetricsSnapshot, SynthesisMetrics};
pub use synthesizer::TypeSynthesizer;
