use tracing::{info, instrument, warn};
use std::io::Write;
use std::path::Path;

use crate::image_pipeline::{
    common::error::{FilterError, Result},
    conversions::explainer::Explainer,
    mutual_structure::{CancelToken, FilterParams, MutualStructureFilter, ProgressSink},
    raster::{resize_bilinear, RasterImage},
    tiff::{RasterReader, RasterWriter, StandardTiffReader, StandardTiffWriter, TransferConfig},
};

/// Outcome of a successful transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReport {
    pub width: usize,
    pub height: usize,
    /// Whether the guidance had to be resampled to the target size
    pub guidance_resampled: bool,
    /// Text from the attached explainer, if one ran successfully
    pub explanation: Option<String>,
}

pub struct StructureTransferPipeline<R: RasterReader, W: RasterWriter> {
    reader: R,
    writer: W,
    config: TransferConfig,
    explainer: Option<Box<dyn Explainer>>,
    cancel: Option<CancelToken>,
}

impl StructureTransferPipeline<StandardTiffReader, StandardTiffWriter> {
    pub fn new(config: TransferConfig) -> Self {
        Self::with_custom(StandardTiffReader, StandardTiffWriter, config)
    }
}

impl<R: RasterReader, W: RasterWriter> StructureTransferPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: TransferConfig) -> Self {
        Self {
            reader,
            writer,
            config,
            explainer: None,
            cancel: None,
        }
    }

    /// Attaches a best-effort explanation step that runs after a successful filter.
    pub fn with_explainer(mut self, explainer: Box<dyn Explainer>) -> Self {
        self.explainer = Some(explainer);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn validate_dimensions(&self, image: &RasterImage) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        let (width, height) = image.size();
        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(FilterError::UnsupportedFormat(format!(
                    "image dimensions {}x{} exceed maximum {}",
                    width, height, max
                )));
            }
        }

        Ok(())
    }

    fn match_guidance(&self, target: &RasterImage, guidance: RasterImage) -> Result<(RasterImage, bool)> {
        if guidance.size() == target.size() {
            return Ok((guidance, false));
        }
        if !self.config.resample_guidance {
            return Err(FilterError::mismatch(target.size(), guidance.size()));
        }
        let resized = resize_bilinear(&guidance, target.width(), target.height())?;
        Ok((resized, true))
    }

    #[instrument(skip_all, fields(target_size = target_data.len(), guidance_size = guidance_data.len()))]
    pub fn transfer(
        &self,
        target_data: &[u8],
        guidance_data: &[u8],
        params: &FilterParams,
        progress: &mut dyn ProgressSink,
        output: &mut dyn Write,
    ) -> Result<TransferReport> {
        info!("Starting structure transfer");

        let target = {
            let _span = tracing::info_span!("decode_target").entered();
            self.reader.read_raster(target_data)?
        };

        let guidance = {
            let _span = tracing::info_span!("decode_guidance").entered();
            self.reader.read_raster(guidance_data)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = target.width(),
                height = target.height()
            ).entered();
            self.validate_dimensions(&target)?;
            self.validate_dimensions(&guidance)?;
        }

        let (guidance, guidance_resampled) = {
            let _span = tracing::info_span!("match_guidance").entered();
            self.match_guidance(&target, guidance)?
        };

        let filtered = {
            let _span = tracing::info_span!("filter").entered();
            let mut filter = MutualStructureFilter::new(*params);
            if let Some(token) = &self.cancel {
                filter = filter.with_cancel_token(token.clone());
            }
            filter.filter(&target, &guidance, progress)?
        };

        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_raster(&filtered, output, &self.config)?;
        }

        let explanation = self.explain(params);

        info!(
            width = filtered.width(),
            height = filtered.height(),
            guidance_resampled,
            "Structure transfer complete"
        );
        Ok(TransferReport {
            width: filtered.width(),
            height: filtered.height(),
            guidance_resampled,
            explanation,
        })
    }

    #[instrument(skip_all)]
    pub fn transfer_file<P: AsRef<Path>, G: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        target_path: P,
        guidance_path: G,
        output_path: Q,
        params: &FilterParams,
        progress: &mut dyn ProgressSink,
    ) -> Result<TransferReport> {
        let target_path = target_path.as_ref();
        let guidance_path = guidance_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            target = %target_path.display(),
            guidance = %guidance_path.display(),
            output = %output_path.display(),
            "Transferring structure"
        );

        let target_data = {
            let _span = tracing::info_span!("read_target_file").entered();
            read_input(target_path)?
        };

        let guidance_data = {
            let _span = tracing::info_span!("read_guidance_file").entered();
            read_input(guidance_path)?
        };

        // the output file is only created once the whole run has succeeded
        let mut encoded = Vec::new();
        let report = self.transfer(&target_data, &guidance_data, params, progress, &mut encoded)?;

        {
            let _span = tracing::info_span!("write_output_file").entered();
            std::fs::write(output_path, &encoded).map_err(|e| {
                FilterError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        Ok(report)
    }

    fn explain(&self, params: &FilterParams) -> Option<String> {
        let explainer = self.explainer.as_ref()?;
        match explainer.explain(params) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Explanation unavailable: {:#}", e);
                None
            }
        }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TransferConfig) {
        self.config = config;
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| FilterError::InputReadError(format!("{}: {}", path.display(), e)))
}
