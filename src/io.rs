use crate::cog;
use crate::error::{MosaicError, Result};
use crate::raster::{RasterBackend, RasterHandle};
use gdal::{Dataset, Metadata};
use log::{debug, info};
use std::path::Path;

/// Raster I/O through GDAL.
#[derive(Debug, Default, Clone, Copy)]
pub struct GdalBackend;

/// A GDAL dataset together with the name it was opened with.
pub struct GdalRaster {
    name: String,
    dataset: Dataset,
}

impl RasterHandle for GdalRaster {
    fn description(&self) -> &str {
        &self.name
    }

    fn raster_size(&self) -> (usize, usize) {
        self.dataset.raster_size()
    }

    fn band_count(&self) -> usize {
        self.dataset.raster_count()
    }

    fn projection(&self) -> String {
        self.dataset.projection()
    }

    fn geo_transform(&self) -> Result<[f64; 6]> {
        Ok(self.dataset.geo_transform()?)
    }

    fn band_type_name(&self, band: usize) -> Result<String> {
        let rasterband = self.dataset.rasterband(band)?;
        Ok(rasterband.band_type().name())
    }
}

impl RasterBackend for GdalBackend {
    type Handle = GdalRaster;

    fn subdatasets(&self, path: &Path) -> Result<Vec<String>> {
        info!("Opening input product: {}", path.display());
        let dataset = Dataset::open(path).map_err(|e| MosaicError::OpenFailure {
            reference: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(dataset.metadata_domain("SUBDATASETS").unwrap_or_default())
    }

    fn open(&self, identifier: &str) -> Result<GdalRaster> {
        debug!("Opening subdataset: {}", identifier);
        let dataset = Dataset::open(identifier).map_err(|e| MosaicError::OpenFailure {
            reference: identifier.to_string(),
            reason: e.to_string(),
        })?;

        let (width, height) = dataset.raster_size();
        debug!(
            "Subdataset size: {}x{}, {} bands",
            width,
            height,
            dataset.raster_count()
        );

        Ok(GdalRaster {
            name: identifier.to_string(),
            dataset,
        })
    }

    fn translate(
        &self,
        source: GdalRaster,
        destination: &Path,
        options: &[String],
    ) -> Result<GdalRaster> {
        let source_name = source.name.clone();
        // gdal_translate reads the source by name; release our handle first.
        drop(source);

        cog::run_gdal_translate(&source_name, destination, options)?;

        let translated = destination.to_string_lossy().into_owned();
        self.open(&translated)
            .map_err(|e| MosaicError::TranscodeFailure {
                source_name,
                destination: translated,
                reason: e.to_string(),
            })
    }

    fn build_overviews(
        &self,
        raster: &mut GdalRaster,
        resampling: &str,
        levels: &[u16],
    ) -> Result<()> {
        let levels: Vec<i32> = levels.iter().map(|&l| i32::from(l)).collect();
        // Empty bands list means build for all bands
        raster.dataset.build_overviews(resampling, &levels, &[])?;
        Ok(())
    }
}
