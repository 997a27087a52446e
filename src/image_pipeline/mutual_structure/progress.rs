//! Progress reporting and cooperative cancellation

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::image_pipeline::mutual_structure::types::PipelineState;

/// Receives progress of a pipeline run.
///
/// `report` sees percentages in `[0, 100]`, non-decreasing, ending with exactly one `100`.
/// It is called synchronously before each iteration starts, which is the point where a host
/// gets control back between iterations.
pub trait ProgressSink {
    fn report(&mut self, percent: f32);

    fn on_state(&mut self, _state: PipelineState) {}
}

impl<F> ProgressSink for F
where
    F: FnMut(f32),
{
    fn report(&mut self, percent: f32) {
        self(percent)
    }
}

/// Discards all progress.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: f32) {}
}

/// Logs progress through `tracing`.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, percent: f32) {
        info!("Filtering: {:.0}%", percent);
    }

    fn on_state(&mut self, state: PipelineState) {
        debug!(?state, "Pipeline state changed");
    }
}

/// Shared flag to stop a run between iterations.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
