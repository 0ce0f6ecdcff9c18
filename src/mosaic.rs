use crate::catalog::{parse_catalog, subdataset_entries};
use crate::cli::Config;
use crate::cog::{build_triad_overviews, convert_triad};
use crate::compose::compose_bands;
use crate::error::{MosaicError, Result};
use crate::raster::{open_triad, RasterBackend, RasterHandle};
use crate::validate::shared_projection;
use crate::vrt::MosaicDataset;
use crate::zones::{group_by_zone, resolve_triads, zone_output_path, TriadRecords};
use log::{info, warn};
use std::path::PathBuf;

/// Build one VRT per zone of the input product.
///
/// Every zone's triad is resolved before anything is opened, so an incomplete
/// zone aborts the run without output. Zones are then processed one after
/// another; the first fatal error stops the run.
pub fn build_mosaics<B: RasterBackend>(backend: &B, config: &Config) -> Result<Vec<MosaicDataset>> {
    let metadata = backend.subdatasets(&config.input)?;
    let entries = subdataset_entries(&metadata);
    if entries.is_empty() {
        return Err(MosaicError::NoSubdatasets(config.input.display().to_string()));
    }
    info!("Found {} subdatasets", entries.len());

    let records = parse_catalog(&entries)?;
    let groups = group_by_zone(records);
    let triads = resolve_triads(&groups)?;

    let zone_count = triads.len();
    let mut mosaics = Vec::with_capacity(zone_count);
    for (i, records) in triads.iter().enumerate() {
        info!("Processing zone {} ({}/{})", records.zone_key, i + 1, zone_count);
        let output_path = zone_output_path(&config.output, &records.zone_key, zone_count);
        mosaics.push(build_zone(backend, config, records, output_path, (i + 1, zone_count))?);
    }

    Ok(mosaics)
}

fn build_zone<B: RasterBackend>(
    backend: &B,
    config: &Config,
    records: &TriadRecords,
    output_path: PathBuf,
    (position, zone_count): (usize, usize),
) -> Result<MosaicDataset> {
    let mut triad = open_triad(backend, records)?;

    if config.cog {
        info!(
            "Converting zone {} to cloud-optimized GeoTIFF ({}/{})",
            records.zone_key, position, zone_count
        );
        triad = convert_triad(backend, triad, &config.input, &records.zone_key)?;
    }

    let projection = shared_projection(&triad, &records.zone_key)?;
    let (width, height) = triad.fine.raster_size();
    let geo_transform = triad.fine.geo_transform()?;
    let bands = compose_bands(&triad)?;

    if !config.overview_levels.is_empty() {
        info!(
            "Building overviews {:?} for zone {} ({}/{})",
            config.overview_levels, records.zone_key, position, zone_count
        );
        let failed = build_triad_overviews(backend, &mut triad, &config.overview_levels);
        if !failed.is_empty() {
            let labels: Vec<&str> = failed.iter().map(|t| t.label()).collect();
            warn!(
                "Zone {}: continuing without overviews for {}",
                records.zone_key,
                labels.join(", ")
            );
        }
    }

    let mosaic = MosaicDataset {
        output_path,
        width,
        height,
        projection,
        geo_transform,
        bands,
    };
    mosaic.write()?;

    Ok(mosaic)
}
