use tracing::{debug, info, instrument, warn};

use crate::image_pipeline::{
    common::error::{FilterError, Result},
    filter::guided_filter_channel,
    mutual_structure::{
        progress::{CancelToken, ProgressSink},
        types::{FilterParams, PipelineState},
    },
    raster::{combine_planes, extract_planes, to_grayscale, Plane, PlaneSet, RasterImage},
};

/// Iterative guided filtering of a target image under a fixed guidance structure.
///
/// Every iteration filters the current R, G and B planes against the same grayscale plane
/// derived once from the guidance; only the target evolves.
pub struct MutualStructureFilter {
    params: FilterParams,
    cancel: Option<CancelToken>,
}

impl MutualStructureFilter {
    pub fn new(params: FilterParams) -> Self {
        Self {
            params,
            cancel: None,
        }
    }

    /// Stops the run before the next iteration once `token` is cancelled.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Filters RGBA rasters of identical size. The result is opaque.
    pub fn filter(
        &self,
        target: &RasterImage,
        guidance: &RasterImage,
        progress: &mut dyn ProgressSink,
    ) -> Result<RasterImage> {
        progress.on_state(PipelineState::Idle);
        if let Err(e) = self.params.validate() {
            progress.on_state(PipelineState::Failed);
            return Err(e);
        }
        if target.size() != guidance.size() {
            progress.on_state(PipelineState::Failed);
            return Err(FilterError::mismatch(target.size(), guidance.size()));
        }

        let target_planes = extract_planes(target);
        let guidance_planes = extract_planes(guidance);
        let result = self.execute(&target_planes, &guidance_planes, progress)?;
        Ok(combine_planes(&result))
    }

    /// Filters float planes. Intermediate and final samples are not clamped.
    pub fn filter_planes(
        &self,
        target: &PlaneSet,
        guidance: &PlaneSet,
        progress: &mut dyn ProgressSink,
    ) -> Result<PlaneSet> {
        progress.on_state(PipelineState::Idle);
        self.execute(target, guidance, progress)
    }

    #[instrument(skip_all, fields(
        width = target.width(),
        height = target.height(),
        radius = self.params.radius,
        epsilon = self.params.epsilon,
        iterations = self.params.iterations,
    ))]
    fn execute(
        &self,
        target: &PlaneSet,
        guidance: &PlaneSet,
        progress: &mut dyn ProgressSink,
    ) -> Result<PlaneSet> {
        let result = self.run(target, guidance, progress);
        if let Err(e) = &result {
            warn!("Mutual structure filtering failed: {}", e);
            progress.on_state(PipelineState::Failed);
        }
        result
    }

    fn run(
        &self,
        target: &PlaneSet,
        guidance: &PlaneSet,
        progress: &mut dyn ProgressSink,
    ) -> Result<PlaneSet> {
        let params = &self.params;
        params.validate()?;

        progress.on_state(PipelineState::Preparing);
        let guide = {
            let _span = tracing::info_span!("prepare").entered();
            if target.size() != guidance.size() {
                return Err(FilterError::mismatch(target.size(), guidance.size()));
            }
            debug!(weight = params.weight, "Weight is reserved and not applied");
            to_grayscale(guidance)
        };

        let mut working = target.clone().into_channels();
        let iterations = params.iterations;

        for k in 0..iterations {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    info!(completed = k, "Filtering cancelled");
                    return Err(FilterError::Cancelled { completed: k });
                }
            }

            progress.on_state(PipelineState::Iterating(k));
            progress.report(k as f32 * 100.0 / iterations as f32);

            let _span = tracing::info_span!("iteration", k).entered();
            working = filter_channels(working, &guide, params)?;
        }

        progress.on_state(PipelineState::Done);
        progress.report(100.0);

        let [red, green, blue] = working;
        info!(iterations, "Mutual structure filtering complete");
        PlaneSet::new(red, green, blue)
    }
}

fn filter_channels(channels: [Plane; 3], guide: &Plane, params: &FilterParams) -> Result<[Plane; 3]> {
    let [red, green, blue] = channels;
    Ok([
        guided_filter_channel(&red, guide, params.radius, params.epsilon)?,
        guided_filter_channel(&green, guide, params.radius, params.epsilon)?,
        guided_filter_channel(&blue, guide, params.radius, params.epsilon)?,
    ])
}

/// Runs [`MutualStructureFilter`] once on two rasters of identical size.
pub fn mutual_structure_filter(
    target: &RasterImage,
    guidance: &RasterImage,
    params: FilterParams,
    progress: &mut dyn ProgressSink,
) -> Result<RasterImage> {
    MutualStructureFilter::new(params).filter(target, guidance, progress)
}
