//! Mapping of the three resolution tiers onto the 13 product bands.

use crate::error::{MosaicError, Result};
use crate::raster::{RasterHandle, Triad};
use crate::zones::Tier;
use log::debug;

/// Resampling declared for every VRT source
pub const RESAMPLING: &str = "nearest";

/// One output band: which tier raster and which of its bands feeds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandSlot {
    pub tier: Tier,
    /// 1-based band index within the tier raster
    pub band: usize,
    pub name: &'static str,
}

const fn slot(tier: Tier, band: usize, name: &'static str) -> BandSlot {
    BandSlot { tier, band, name }
}

/// Output band order B01..B12 (with B8A after B08).
pub const CANONICAL_BANDS: [BandSlot; 13] = [
    slot(Tier::Coarse, 1, "B01"),
    slot(Tier::Fine, 1, "B02"),
    slot(Tier::Fine, 2, "B03"),
    slot(Tier::Fine, 3, "B04"),
    slot(Tier::Medium, 1, "B05"),
    slot(Tier::Medium, 2, "B06"),
    slot(Tier::Medium, 3, "B07"),
    slot(Tier::Fine, 4, "B08"),
    slot(Tier::Medium, 4, "B8A"),
    slot(Tier::Coarse, 2, "B09"),
    slot(Tier::Coarse, 3, "B10"),
    slot(Tier::Medium, 5, "B11"),
    slot(Tier::Medium, 6, "B12"),
];

/// Provenance of one VRT band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandSourceDescriptor {
    pub source_file: String,
    pub source_band: usize,
    pub source_width: usize,
    pub source_height: usize,
    pub source_data_type: String,
    pub dest_width: usize,
    pub dest_height: usize,
    pub resampling: &'static str,
    pub description: &'static str,
}

/// Describe all 13 bands in canonical order, declared on the 10m pixel grid.
pub fn compose_bands<H: RasterHandle>(triad: &Triad<H>) -> Result<Vec<BandSourceDescriptor>> {
    let (dest_width, dest_height) = triad.fine.raster_size();

    CANONICAL_BANDS
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let raster = triad.get(slot.tier);
            let attach_error = |reason: String| MosaicError::BandAttach {
                slot: index,
                reason,
            };

            if slot.band > raster.band_count() {
                return Err(attach_error(format!(
                    "{} has {} bands, band {} requested",
                    raster.description(),
                    raster.band_count(),
                    slot.band
                )));
            }

            let source_data_type = raster
                .band_type_name(slot.band)
                .map_err(|e| attach_error(e.to_string()))?;
            let (source_width, source_height) = raster.raster_size();

            debug!(
                "Slot {} ({}): {} band {} ({}x{} {})",
                index,
                slot.name,
                slot.tier.label(),
                slot.band,
                source_width,
                source_height,
                source_data_type
            );

            Ok(BandSourceDescriptor {
                source_file: raster.description().to_string(),
                source_band: slot.band,
                source_width,
                source_height,
                source_data_type,
                dest_width,
                dest_height,
                resampling: RESAMPLING,
                description: slot.name,
            })
        })
        .collect()
}
