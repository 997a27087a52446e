//! Single-channel guided image filter.

use rayon::prelude::*;
use tracing::trace;

use crate::image_pipeline::common::error::{FilterError, Result};
use crate::image_pipeline::filter::box_filter::box_filter;
use crate::image_pipeline::raster::types::Plane;

/// Filters `input` under the structure of `guide`.
///
/// Fits the local affine model `input ≈ a * guide + b` in every `(2 * radius + 1)^2` window,
/// averages the coefficients of all windows covering a pixel and evaluates the model there.
/// Where the guide is flat `a` tends to 0 and the output tends to the local mean of `input`;
/// across guide edges `a` tends to 1 and the edge is carried into the output.
///
/// `epsilon` regularizes the fit and must be positive and finite. Output values are not
/// clamped.
pub fn guided_filter_channel(
    input: &Plane,
    guide: &Plane,
    radius: usize,
    epsilon: f32,
) -> Result<Plane> {
    if !(epsilon > 0.0 && epsilon.is_finite()) {
        return Err(FilterError::InvalidParameter(format!(
            "epsilon must be positive and finite, got {}",
            epsilon
        )));
    }
    if input.size() != guide.size() {
        return Err(FilterError::mismatch(input.size(), guide.size()));
    }

    let (width, height) = input.size();
    trace!(width, height, radius, epsilon, "Guided filter channel");

    let mean_p = box_filter(input, radius);
    let mean_i = box_filter(guide, radius);
    let mean_ii = box_filter(&guide.zip_map(guide, |i, j| i * j), radius);
    let mean_ip = box_filter(&guide.zip_map(input, |i, p| i * p), radius);

    let (a, b): (Vec<f32>, Vec<f32>) = mean_p
        .as_slice()
        .par_iter()
        .zip(mean_i.as_slice().par_iter())
        .zip(mean_ii.as_slice().par_iter())
        .zip(mean_ip.as_slice().par_iter())
        .map(|(((&mp, &mi), &mii), &mip)| {
            let var_i = mii - mi * mi;
            let cov_ip = mip - mi * mp;
            let a = cov_ip / (var_i + epsilon);
            (a, mp - a * mi)
        })
        .unzip();

    let mean_a = box_filter(&Plane::from_raw_parts(width, height, a), radius);
    let mean_b = box_filter(&Plane::from_raw_parts(width, height, b), radius);

    let data = mean_a
        .as_slice()
        .par_iter()
        .zip(mean_b.as_slice().par_iter())
        .zip(guide.as_slice().par_iter())
        .map(|((&ma, &mb), &i)| ma * i + mb)
        .collect();

    Ok(Plane::from_raw_parts(width, height, data))
}
