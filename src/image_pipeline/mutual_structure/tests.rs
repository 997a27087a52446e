#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::image_pipeline::common::error::FilterError;
    use crate::image_pipeline::mutual_structure::{
        CancelToken, FilterParams, MutualStructureFilter, NoProgress, PipelineState,
        ProgressSink, mutual_structure_filter,
    };
    use crate::image_pipeline::raster::{Plane, PlaneSet, RasterImage};

    #[derive(Default)]
    struct Recorder {
        percents: Vec<f32>,
        states: Vec<PipelineState>,
    }

    impl ProgressSink for Recorder {
        fn report(&mut self, percent: f32) {
            self.percents.push(percent);
        }

        fn on_state(&mut self, state: PipelineState) {
            self.states.push(state);
        }
    }

    /// 4x4 plane of `base` with a single 1.0 sample at (2, 2).
    fn spot_plane(base: f32) -> Plane {
        let mut data = vec![base; 16];
        data[2 * 4 + 2] = 1.0;
        Plane::new(4, 4, data).unwrap()
    }

    fn spot_planes(base: f32) -> PlaneSet {
        PlaneSet::new(spot_plane(base), spot_plane(base), spot_plane(base)).unwrap()
    }

    fn spot_raster() -> RasterImage {
        let mut raster = vec![128u8, 128, 128, 255].repeat(16);
        let offset = (2 * 4 + 2) * 4;
        raster[offset..offset + 3].copy_from_slice(&[255, 255, 255]);
        RasterImage::new(4, 4, raster).unwrap()
    }

    fn spot_raster_sized(width: usize, height: usize) -> RasterImage {
        let mut raster = vec![128u8, 128, 128, 255].repeat(width * height);
        let offset = (height / 2 * width + width / 2) * 4;
        raster[offset..offset + 3].copy_from_slice(&[255, 255, 255]);
        RasterImage::new(width, height, raster).unwrap()
    }

    fn params(radius: usize, epsilon: f32, iterations: usize) -> FilterParams {
        FilterParams::builder()
            .radius(radius)
            .epsilon(epsilon)
            .iterations(iterations)
            .build()
    }

    #[test]
    fn test_params_builder_defaults() {
        let params = FilterParams::builder().radius(7).build();
        assert_eq!(params.radius, 7);
        assert_eq!(params.epsilon, FilterParams::default().epsilon);
        assert_eq!(params.iterations, 3);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_progress_is_reported_before_each_iteration() {
        let planes = spot_planes(0.5);
        let mut recorder = Recorder::default();

        MutualStructureFilter::new(params(1, 0.01, 4))
            .filter_planes(&planes, &planes, &mut recorder)
            .unwrap();

        assert_eq!(recorder.percents, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(
            recorder.states,
            vec![
                PipelineState::Idle,
                PipelineState::Preparing,
                PipelineState::Iterating(0),
                PipelineState::Iterating(1),
                PipelineState::Iterating(2),
                PipelineState::Iterating(3),
                PipelineState::Done,
            ]
        );
    }

    #[test]
    fn test_progress_is_monotonic_and_ends_at_100() {
        for iterations in [1, 2, 3, 7] {
            let planes = spot_planes(0.5);
            let mut percents = Vec::new();
            let mut sink = |p: f32| percents.push(p);

            MutualStructureFilter::new(params(1, 0.05, iterations))
                .filter_planes(&planes, &planes, &mut sink)
                .unwrap();

            assert_eq!(percents.len(), iterations + 1);
            assert_eq!(percents[0], 0.0);
            assert_eq!(*percents.last().unwrap(), 100.0);
            assert_eq!(percents.iter().filter(|&&p| p == 100.0).count(), 1);
            assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_invalid_params_fail_without_progress() {
        let planes = spot_planes(0.5);
        let cases = [
            params(1, 0.01, 0),
            params(1, 0.0, 1),
            params(1, -1.0, 1),
            params(usize::MAX / 2 + 1, 0.01, 1),
        ];

        for case in cases {
            let mut recorder = Recorder::default();
            let result =
                MutualStructureFilter::new(case).filter_planes(&planes, &planes, &mut recorder);

            assert!(matches!(result, Err(FilterError::InvalidParameter(_))));
            assert!(recorder.percents.is_empty());
            assert_eq!(recorder.states, vec![PipelineState::Idle, PipelineState::Failed]);
        }
    }

    #[test]
    fn test_mismatched_guidance_fails_before_filtering() {
        let target = spot_planes(0.5);
        let guidance = PlaneSet::new(
            Plane::from_value(4, 3, 0.5).unwrap(),
            Plane::from_value(4, 3, 0.5).unwrap(),
            Plane::from_value(4, 3, 0.5).unwrap(),
        )
        .unwrap();
        let mut recorder = Recorder::default();

        let result = MutualStructureFilter::new(params(1, 0.01, 2)).filter_planes(
            &target,
            &guidance,
            &mut recorder,
        );

        assert!(matches!(result, Err(FilterError::DimensionMismatch { .. })));
        assert!(recorder.percents.is_empty());
        assert_eq!(
            recorder.states,
            vec![PipelineState::Idle, PipelineState::Preparing, PipelineState::Failed]
        );
    }

    #[test]
    fn test_mismatched_rasters_fail() {
        let target = spot_raster();
        let guidance = RasterImage::from_pixel(5, 4, [0, 0, 0, 255]).unwrap();

        let result =
            mutual_structure_filter(&target, &guidance, FilterParams::default(), &mut NoProgress);

        assert!(matches!(result, Err(FilterError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_single_spot_spreads_into_neighbourhood() {
        let planes = spot_planes(0.5);

        let result = MutualStructureFilter::new(params(1, 0.01, 1))
            .filter_planes(&planes, &planes, &mut NoProgress)
            .unwrap();

        assert_eq!(result.size(), (4, 4));
        for channel in result.channels() {
            let corner = channel.get(0, 0);
            assert_relative_eq!(corner, 0.5, epsilon = 0.005);

            let center = channel.get(2, 2);
            assert!(center > 0.8 && center < 0.95, "center {}", center);

            for y in 1..=3 {
                for x in 1..=3 {
                    if (x, y) != (2, 2) {
                        assert!(channel.get(x, y) > corner);
                        assert!(channel.get(x, y) < center);
                    }
                }
            }
            assert_relative_eq!(channel.get(1, 2), channel.get(2, 1), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_raster_end_to_end_keeps_flat_corner() {
        let raster = spot_raster();

        let result =
            mutual_structure_filter(&raster, &raster, params(1, 0.01, 1), &mut NoProgress).unwrap();

        assert_eq!(result.size(), (4, 4));
        assert_eq!(result.pixel(0, 0), [128, 128, 128, 255]);
        let center = result.pixel(2, 2);
        assert!((220..=224).contains(&center[0]), "center {:?}", center);
        assert_eq!(center[3], 255);
    }

    #[test]
    fn test_further_iterations_keep_smoothing_with_fixed_guidance() {
        let planes = spot_planes(0.5);

        let once = MutualStructureFilter::new(params(1, 0.01, 1))
            .filter_planes(&planes, &planes, &mut NoProgress)
            .unwrap();
        let twice = MutualStructureFilter::new(params(1, 0.01, 2))
            .filter_planes(&planes, &planes, &mut NoProgress)
            .unwrap();

        assert!(twice.red().get(2, 2) < once.red().get(2, 2));
        assert_eq!(once.red(), once.green());
        assert_eq!(twice.green(), twice.blue());
    }

    #[test]
    fn test_radius_zero_returns_target_unchanged() {
        let data = (0..5 * 3)
            .flat_map(|i| [(i * 37 % 256) as u8, (i * 11 % 256) as u8, (255 - i * 13) as u8, 255])
            .collect();
        let target = RasterImage::new(5, 3, data).unwrap();
        let guidance = spot_raster_sized(5, 3);

        for epsilon in [1e-6, 0.01, 10.0] {
            let result =
                mutual_structure_filter(&target, &guidance, params(0, epsilon, 3), &mut NoProgress)
                    .unwrap();
            assert_eq!(result, target, "epsilon {}", epsilon);
        }
    }

    #[test]
    fn test_radius_far_beyond_image_flattens_spot() {
        let planes = spot_planes(0.5);

        for radius in [1_000_000_000, usize::MAX / 2] {
            let mut recorder = Recorder::default();
            let result = MutualStructureFilter::new(params(radius, 0.01, 2))
                .filter_planes(&planes, &planes, &mut recorder)
                .unwrap();

            // every window sees the replicated 0.5 border almost exclusively
            for channel in result.channels() {
                for &value in channel.as_slice() {
                    assert_relative_eq!(value, 0.5, epsilon = 1e-3);
                }
            }
            assert_eq!(recorder.percents, vec![0.0, 50.0, 100.0]);
        }
    }

    #[test]
    fn test_cancelled_run_returns_no_output() {
        let planes = spot_planes(0.5);
        let token = CancelToken::new();
        let filter = MutualStructureFilter::new(params(1, 0.01, 5)).with_cancel_token(token.clone());

        let mut percents = Vec::new();
        let mut sink = |p: f32| {
            percents.push(p);
            if p >= 40.0 {
                token.cancel();
            }
        };
        let result = filter.filter_planes(&planes, &planes, &mut sink);

        assert!(matches!(result, Err(FilterError::Cancelled { completed: 3 })));
        assert_eq!(percents, vec![0.0, 20.0, 40.0]);
    }
}
