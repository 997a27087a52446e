use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use mutual_structure_rs::image_pipeline::{
    FilterParams, LogProgress, ParameterSummary, StructureTransferPipeline, TiffCompression,
    TransferConfig,
};
use mutual_structure_rs::logger;

use tracing::{error, info};

#[derive(Parser)]
#[command(name = "mutual-structure")]
#[command(version, about = "Transfer the shared structure of a guidance image onto a target image", long_about = None)]
struct Cli {
    /// Image whose texture is smoothed (8-bit TIFF)
    #[arg(short, long, value_name = "FILE")]
    target: PathBuf,

    /// Image providing the structure to keep (8-bit TIFF)
    #[arg(short, long, value_name = "FILE")]
    guidance: PathBuf,

    /// Output RGBA TIFF
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Filter window half-width in pixels
    #[arg(short, long, default_value_t = 4)]
    radius: usize,

    /// Regularization; larger values smooth more
    #[arg(short, long, default_value_t = 0.01)]
    epsilon: f32,

    /// Number of filter passes
    #[arg(short = 'n', long, default_value_t = 3)]
    iterations: usize,

    /// Reserved blend weight
    #[arg(long, default_value_t = 0.5)]
    weight: f32,

    /// Output compression
    #[arg(long, value_enum, default_value_t = Compression::Lzw)]
    compression: Compression,

    /// Fail instead of resampling a guidance image of a different size
    #[arg(long)]
    no_resample: bool,

    /// Print a short explanation of the chosen parameters
    #[arg(long)]
    explain: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Compression {
    None,
    Lzw,
    Deflate,
}

impl From<Compression> for TiffCompression {
    fn from(value: Compression) -> Self {
        match value {
            Compression::None => TiffCompression::None,
            Compression::Lzw => TiffCompression::Lzw,
            Compression::Deflate => TiffCompression::DeflateBalanced,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(&cli.log_level)?;

    info!("Starting mutual-structure...");

    let params = FilterParams::builder()
        .radius(cli.radius)
        .epsilon(cli.epsilon)
        .iterations(cli.iterations)
        .weight(cli.weight)
        .build();

    let config = TransferConfig::builder()
        .compression(cli.compression.into())
        .predictor(Some(2))
        .resample_guidance(!cli.no_resample)
        .build();

    let mut pipeline = StructureTransferPipeline::new(config);
    if cli.explain {
        pipeline = pipeline.with_explainer(Box::new(ParameterSummary));
    }

    info!(
        radius = params.radius,
        epsilon = params.epsilon,
        iterations = params.iterations,
        "Filter parameters"
    );
    info!("Compression: {:?}", pipeline.config().compression);

    match pipeline.transfer_file(&cli.target, &cli.guidance, &cli.output, &params, &mut LogProgress) {
        Ok(report) => {
            info!("Wrote {}x{} result to {}", report.width, report.height, cli.output.display());
            if let Some(text) = report.explanation {
                println!("{}", text);
            }
            Ok(())
        }
        Err(e) => {
            error!("Structure transfer failed: {}", e);
            Err(e.into())
        }
    }
}
