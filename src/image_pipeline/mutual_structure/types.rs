//! Filter parameters and pipeline state

use crate::image_pipeline::common::error::{FilterError, Result};

/// Parameters of a mutual structure run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Half-width of the square filter window in pixels
    pub radius: usize,
    /// Regularization of the local linear fit; larger values smooth more
    pub epsilon: f32,
    /// Number of successive guided filter applications
    pub iterations: usize,
    /// Reserved blend weight, not used by the filter
    pub weight: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            radius: 4,
            epsilon: 0.01,
            iterations: 3,
            weight: 0.5,
        }
    }
}

impl FilterParams {
    pub fn builder() -> FilterParamsBuilder {
        FilterParamsBuilder::default()
    }

    /// Side length `2 * radius + 1` of the filter window, or `None` if it overflows `usize`.
    pub fn window_size(&self) -> Option<usize> {
        self.radius.checked_mul(2)?.checked_add(1)
    }

    /// Checks the parameters before any filtering work is done.
    pub fn validate(&self) -> Result<()> {
        if self.window_size().is_none() {
            return Err(FilterError::InvalidParameter(format!(
                "radius {} is too large for a {}-bit window size",
                self.radius,
                usize::BITS
            )));
        }
        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            return Err(FilterError::InvalidParameter(format!(
                "epsilon must be positive and finite, got {}",
                self.epsilon
            )));
        }
        if self.iterations == 0 {
            return Err(FilterError::InvalidParameter(
                "iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for FilterParams
#[derive(Default)]
pub struct FilterParamsBuilder {
    radius: Option<usize>,
    epsilon: Option<f32>,
    iterations: Option<usize>,
    weight: Option<f32>,
}

impl FilterParamsBuilder {
    pub fn radius(mut self, radius: usize) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn build(self) -> FilterParams {
        let default = FilterParams::default();
        FilterParams {
            radius: self.radius.unwrap_or(default.radius),
            epsilon: self.epsilon.unwrap_or(default.epsilon),
            iterations: self.iterations.unwrap_or(default.iterations),
            weight: self.weight.unwrap_or(default.weight),
        }
    }
}

/// Lifecycle of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Reported once when a run is handed to the filter
    Idle,
    Preparing,
    /// Zero-based index of the iteration about to run
    Iterating(usize),
    Done,
    Failed,
}
