//! Mutual structure filtering module
//!
//! This module drives the iterative per-channel guided filter against a single grayscale
//! guidance plane, with progress reporting and cooperative cancellation.

mod pipeline;
mod progress;
pub mod types;

#[cfg(test)]
mod tests;

pub use pipeline::{mutual_structure_filter, MutualStructureFilter};
pub use progress::{CancelToken, LogProgress, NoProgress, ProgressSink};
pub use types::{FilterParams, FilterParamsBuilder, PipelineState};
