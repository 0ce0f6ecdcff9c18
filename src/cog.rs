use crate::error::{MosaicError, Result};
use crate::raster::{RasterBackend, Triad};
use crate::zones::Tier;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::Command;

/// DEFLATE level used for converted subdatasets
pub const DEFLATE_LEVEL: u8 = 6;

/// Resampling used for overview generation
pub const OVERVIEW_RESAMPLING: &str = "NEAREST";

/// gdal_translate arguments for tiled, compressed GeoTIFF output
pub fn translate_options() -> Vec<String> {
    vec![
        "-of".to_string(),
        "GTiff".to_string(),
        "-co".to_string(),
        "TILED=YES".to_string(),
        "-co".to_string(),
        "COPY_SRC_OVERVIEWS=YES".to_string(),
        "-co".to_string(),
        "COMPRESS=DEFLATE".to_string(),
        "-co".to_string(),
        format!("ZLEVEL={}", DEFLATE_LEVEL),
    ]
}

/// `<dir-of-input>/<tier-label><zone>.tif`
pub fn converted_path(input: &Path, tier: Tier, zone_key: &str) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{}{}.tif", tier.label(), zone_key))
}

/// Run gdal_translate on a named raster
pub fn run_gdal_translate(source: &str, destination: &Path, options: &[String]) -> Result<()> {
    debug!("gdal_translate {} {} {}", options.join(" "), source, destination.display());

    let failure = |reason: String| MosaicError::TranscodeFailure {
        source_name: source.to_string(),
        destination: destination.display().to_string(),
        reason,
    };

    let output = Command::new("gdal_translate")
        .args(options)
        .arg(source)
        .arg(destination)
        .output()
        .map_err(|e| failure(format!("cannot run gdal_translate: {}", e)))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(failure(format!("gdal_translate failed: {}", stderr.trim())))
    }
}

/// Replace each triad member by a tiled, compressed GeoTIFF copy next to the input.
pub fn convert_triad<B: RasterBackend>(
    backend: &B,
    triad: Triad<B::Handle>,
    input: &Path,
    zone_key: &str,
) -> Result<Triad<B::Handle>> {
    let options = translate_options();
    triad.try_map(|tier, handle| {
        let destination = converted_path(input, tier, zone_key);
        info!("Converting {} subdataset to {}", tier.label(), destination.display());
        backend.translate(handle, &destination, &options)
    })
}

/// Build overviews on each triad member. Failures are reported and skipped.
///
/// Returns the tiers for which overview generation failed.
pub fn build_triad_overviews<B: RasterBackend>(
    backend: &B,
    triad: &mut Triad<B::Handle>,
    levels: &[u16],
) -> Vec<Tier> {
    if levels.is_empty() {
        return Vec::new();
    }

    let mut failed = Vec::new();
    for tier in Tier::ALL {
        let result = backend
            .build_overviews(triad.get_mut(tier), OVERVIEW_RESAMPLING, levels)
            .map_err(|e| MosaicError::OverviewFailure {
                tier: tier.label(),
                reason: e.to_string(),
            });
        if let Err(e) = result {
            warn!("{}", e);
            failed.push(tier);
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_options() {
        let opts = translate_options();
        assert_eq!(opts.len(), 10);
        assert_eq!(&opts[0..2], &["-of".to_string(), "GTiff".to_string()]);
        assert!(opts.contains(&"TILED=YES".to_string()));
        assert!(opts.contains(&"COPY_SRC_OVERVIEWS=YES".to_string()));
        assert!(opts.contains(&"COMPRESS=DEFLATE".to_string()));
        assert!(opts.contains(&"ZLEVEL=6".to_string()));
    }

    #[test]
    fn test_converted_path() {
        assert_eq!(
            converted_path(Path::new("/data/S2A.SAFE/MTD_MSIL1C.xml"), Tier::Medium, "EPSG_32632"),
            PathBuf::from("/data/S2A.SAFE/20mEPSG_32632.tif")
        );
        assert_eq!(
            converted_path(Path::new("scene.zip"), Tier::Fine, "Z1"),
            PathBuf::from("10mZ1.tif")
        );
    }

    #[test]
    fn test_missing_gdal_translate_binary_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_gdal_translate("/nonexistent/source.tif", &dir.path().join("out.tif"), &[
            "--definitely-not-an-option".to_string(),
        ])
        .unwrap_err();
        assert!(matches!(err, MosaicError::TranscodeFailure { .. }));
    }

    struct Named(String);

    impl crate::raster::RasterHandle for Named {
        fn description(&self) -> &str {
            &self.0
        }
        fn raster_size(&self) -> (usize, usize) {
            (1, 1)
        }
        fn band_count(&self) -> usize {
            1
        }
        fn projection(&self) -> String {
            String::new()
        }
        fn geo_transform(&self) -> Result<[f64; 6]> {
            Ok([0.0; 6])
        }
        fn band_type_name(&self, _band: usize) -> Result<String> {
            Ok("UInt16".to_string())
        }
    }

    /// Fails overview generation for rasters whose name is listed.
    struct FailingOverviews(Vec<&'static str>);

    impl RasterBackend for FailingOverviews {
        type Handle = Named;

        fn subdatasets(&self, _path: &Path) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
        fn open(&self, identifier: &str) -> Result<Named> {
            Ok(Named(identifier.to_string()))
        }
        fn translate(&self, source: Named, _destination: &Path, _options: &[String]) -> Result<Named> {
            Ok(source)
        }
        fn build_overviews(&self, raster: &mut Named, _resampling: &str, _levels: &[u16]) -> Result<()> {
            if self.0.contains(&raster.0.as_str()) {
                return Err(MosaicError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "cannot write .ovr",
                )));
            }
            Ok(())
        }
    }

    fn named_triad() -> Triad<Named> {
        Triad {
            fine: Named("fine".to_string()),
            medium: Named("medium".to_string()),
            coarse: Named("coarse".to_string()),
        }
    }

    #[test]
    fn test_overview_failure_reports_only_failed_tier() {
        let backend = FailingOverviews(vec!["medium"]);
        let mut triad = named_triad();
        let failed = build_triad_overviews(&backend, &mut triad, &[2, 4, 8]);
        assert_eq!(failed, vec![Tier::Medium]);
    }

    #[test]
    fn test_overview_failures_do_not_stop_later_tiers() {
        let backend = FailingOverviews(vec!["fine", "coarse"]);
        let mut triad = named_triad();
        let failed = build_triad_overviews(&backend, &mut triad, &[2]);
        assert_eq!(failed, vec![Tier::Fine, Tier::Coarse]);
    }

    #[test]
    fn test_no_levels_builds_nothing() {
        let backend = FailingOverviews(vec!["fine", "medium", "coarse"]);
        let mut triad = named_triad();
        assert!(build_triad_overviews(&backend, &mut triad, &[]).is_empty());
    }
}
