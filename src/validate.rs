use crate::error::{MosaicError, Result};
use crate::raster::{RasterHandle, Triad};
use crate::zones::Tier;
use log::debug;

/// Require the 20m and 60m spatial references to equal the 10m one, byte for
/// byte. Returns the shared WKT.
///
/// Extent and pixel alignment are not checked: the product stores all tiers on
/// one footprint with fixed 1:2:6 pixel ratios.
pub fn shared_projection<H: RasterHandle>(triad: &Triad<H>, zone_key: &str) -> Result<String> {
    let fine = triad.fine.projection();
    for tier in [Tier::Medium, Tier::Coarse] {
        if triad.get(tier).projection() != fine {
            return Err(MosaicError::ProjectionMismatch {
                zone: zone_key.to_string(),
                tier: tier.label(),
            });
        }
    }
    debug!("Zone {}: projections match", zone_key);
    Ok(fine)
}
