//! Optional textual explanation of a finished run.
//!
//! Explanations are best-effort: the transfer pipeline logs an explainer failure and still
//! returns the filtered image.

use anyhow::anyhow;

use crate::image_pipeline::mutual_structure::FilterParams;

pub trait Explainer {
    fn explain(&self, params: &FilterParams) -> anyhow::Result<String>;
}

/// Offline explainer describing what the chosen parameters do.
pub struct ParameterSummary;

impl Explainer for ParameterSummary {
    fn explain(&self, params: &FilterParams) -> anyhow::Result<String> {
        let window = params
            .window_size()
            .ok_or_else(|| anyhow!("radius {} has no representable window size", params.radius))?;
        let strength = if params.epsilon >= 0.1 {
            "strong"
        } else if params.epsilon >= 0.01 {
            "moderate"
        } else {
            "light"
        };
        Ok(format!(
            "Each color channel of the target was fitted as a local linear function of the \
             guidance luminance over {window}x{window} windows and re-evaluated {} time(s). \
             Epsilon {} gives {strength} smoothing: texture where the guidance is flat is \
             averaged away, while edges present in the guidance are kept.",
            params.iterations, params.epsilon
        ))
    }
}
