//! Raster segment tool.
//!
//! `encode` turns band rasters into a compressed segment file and manifest;
//! `decode` assembles one band back out of them.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use raster_segments::{
    config::{Cli, Command, DecodeConfig, EncodeConfig},
    format::to_raster_data,
    io::{FileSegmentSource, SegmentManifest},
    segment::SegmentCollection,
    tile::{SegmentWriter, TileReader, TileRequest},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Encode(config) => run_encode(config).await,
        Command::Decode(config) => run_decode(config).await,
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "raster_segments=debug"
    } else {
        "raster_segments=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// =============================================================================
// Encode Command
// =============================================================================

async fn run_encode(config: EncodeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    match encode(&config).await {
        Ok(segment_count) => {
            info!(
                "Wrote {} segment(s) to {}",
                segment_count,
                config.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Encode failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn encode(config: &EncodeConfig) -> Result<usize, String> {
    let layout = config.layout()?;

    info!("Configuration:");
    info!("  Raster: {}x{}, {} band(s)", layout.cols, layout.rows, layout.band_count);
    info!(
        "  Segments: {}x{} ({:?}, {:?} interleave)",
        layout.segment_cols, layout.segment_rows, layout.organization, layout.interleave
    );
    info!(
        "  Sample type: {:?}, byte order: {:?}, compression: {}",
        config.sample_type,
        config.byte_order,
        config.compression.name()
    );
    if let Some(nodata) = config.nodata {
        info!("  NoData: {}", nodata);
    }

    let collection = SegmentCollection::new(
        layout,
        config.sample_type,
        config.byte_order,
        config.nodata,
        config.compression,
    )
    .map_err(|e| e.to_string())?;

    let mut bands = Vec::with_capacity(config.inputs.len());
    for path in &config.inputs {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        let data = to_raster_data(&bytes, config.sample_type, layout.cols, layout.rows)
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        bands.push(data);
    }

    let segments = SegmentWriter::new(&collection)
        .write_segments(bands)
        .map_err(|e| e.to_string())?;

    let manifest =
        SegmentManifest::from_segments(&collection, &segments).map_err(|e| e.to_string())?;

    let body: Vec<u8> = segments.iter().flat_map(|s| s.iter().copied()).collect();
    tokio::fs::write(&config.output, &body)
        .await
        .map_err(|e| format!("{}: {}", config.output.display(), e))?;

    let manifest_path = config.manifest_path();
    manifest.save(&manifest_path).await.map_err(|e| e.to_string())?;
    info!("Manifest written to {}", manifest_path.display());

    Ok(segments.len())
}

// =============================================================================
// Decode Command
// =============================================================================

async fn run_decode(config: DecodeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    match decode(&config).await {
        Ok(len) => {
            info!("Wrote {} byte(s) to {}", len, config.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Decode failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn decode(config: &DecodeConfig) -> Result<usize, String> {
    let manifest = SegmentManifest::load(&config.manifest)
        .await
        .map_err(|e| e.to_string())?;
    let collection = manifest.collection().map_err(|e| e.to_string())?;

    let source = FileSegmentSource::open(
        config.segments_path(),
        manifest.offsets.clone(),
        manifest.byte_counts.clone(),
    )
    .await
    .map_err(|e| e.to_string())?;

    info!(
        "Reading band {} from {} ({} segments)",
        config.band,
        config.segments_path().display(),
        manifest.layout.segment_count()
    );

    let reader = TileReader::new(source, collection).map_err(|e| e.to_string())?;
    let request = TileRequest {
        band: config.band,
        window: config.pixel_window(),
    };
    let bytes = reader
        .read_tile_bytes(request)
        .await
        .map_err(|e| e.to_string())?;

    tokio::fs::write(&config.output, &bytes)
        .await
        .map_err(|e| format!("{}: {}", config.output.display(), e))?;

    Ok(bytes.len())
}
