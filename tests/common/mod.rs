//! In-memory raster backend for pipeline tests.

use s2_vrt::error::{MosaicError, Result};
use s2_vrt::{RasterBackend, RasterHandle};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const UTM32: &str = r#"PROJCS["WGS 84 / UTM zone 32N",AUTHORITY["EPSG","32632"]]"#;
pub const FINE_GT: [f64; 6] = [600000.0, 10.0, 0.0, 5300040.0, 0.0, -10.0];

#[derive(Debug, Clone)]
pub struct RasterInfo {
    pub size: (usize, usize),
    pub bands: usize,
    pub projection: String,
    pub geo_transform: [f64; 6],
    pub data_type: String,
}

impl RasterInfo {
    pub fn fine() -> Self {
        RasterInfo {
            size: (10980, 10980),
            bands: 4,
            projection: UTM32.to_string(),
            geo_transform: FINE_GT,
            data_type: "UInt16".to_string(),
        }
    }

    pub fn medium() -> Self {
        RasterInfo {
            size: (5490, 5490),
            bands: 6,
            geo_transform: [600000.0, 20.0, 0.0, 5300040.0, 0.0, -20.0],
            ..Self::fine()
        }
    }

    pub fn coarse() -> Self {
        RasterInfo {
            size: (1830, 1830),
            bands: 3,
            geo_transform: [600000.0, 60.0, 0.0, 5300040.0, 0.0, -60.0],
            ..Self::fine()
        }
    }
}

pub struct MockRaster {
    name: String,
    info: RasterInfo,
    open_handles: Rc<Cell<i64>>,
}

impl Drop for MockRaster {
    fn drop(&mut self) {
        self.open_handles.set(self.open_handles.get() - 1);
    }
}

impl RasterHandle for MockRaster {
    fn description(&self) -> &str {
        &self.name
    }

    fn raster_size(&self) -> (usize, usize) {
        self.info.size
    }

    fn band_count(&self) -> usize {
        self.info.bands
    }

    fn projection(&self) -> String {
        self.info.projection.clone()
    }

    fn geo_transform(&self) -> Result<[f64; 6]> {
        Ok(self.info.geo_transform)
    }

    fn band_type_name(&self, _band: usize) -> Result<String> {
        Ok(self.info.data_type.clone())
    }
}

#[derive(Default)]
pub struct MockBackend {
    pub metadata: Vec<String>,
    pub rasters: RefCell<HashMap<String, RasterInfo>>,
    pub fail_overviews: HashSet<String>,
    pub fail_translate: bool,
    pub open_handles: Rc<Cell<i64>>,
    pub opened: RefCell<Vec<String>>,
    pub overview_calls: RefCell<Vec<(String, String, Vec<u16>)>>,
    pub translate_calls: RefCell<Vec<(String, PathBuf, Vec<String>)>>,
}

impl MockBackend {
    /// Register a subdataset under the next SUBDATASET_<n> index.
    pub fn add(&mut self, identifier: &str, info: Option<RasterInfo>) {
        let n = self.metadata.len() / 2 + 1;
        self.metadata
            .push(format!("SUBDATASET_{}_NAME={}", n, identifier));
        self.metadata
            .push(format!("SUBDATASET_{}_DESC=Subdataset {}", n, n));
        if let Some(info) = info {
            self.rasters.borrow_mut().insert(identifier.to_string(), info);
        }
    }

    /// A complete 10m/20m/60m triad for each zone, files named `file<F|M|C>_<zone>`.
    pub fn with_zones(zones: &[&str]) -> Self {
        let mut backend = MockBackend::default();
        for zone in zones {
            backend.add_zone(zone);
        }
        backend
    }

    pub fn add_zone(&mut self, zone: &str) {
        self.add(
            &format!("A:fileF_{zone}:10m:{zone}"),
            Some(RasterInfo::fine()),
        );
        self.add(
            &format!("A:fileM_{zone}:20m:{zone}"),
            Some(RasterInfo::medium()),
        );
        self.add(
            &format!("A:fileC_{zone}:60m:{zone}"),
            Some(RasterInfo::coarse()),
        );
    }

    pub fn open_handle_count(&self) -> i64 {
        self.open_handles.get()
    }
}

impl RasterBackend for MockBackend {
    type Handle = MockRaster;

    fn subdatasets(&self, _path: &Path) -> Result<Vec<String>> {
        Ok(self.metadata.clone())
    }

    fn open(&self, identifier: &str) -> Result<MockRaster> {
        let info = self
            .rasters
            .borrow()
            .get(identifier)
            .cloned()
            .ok_or_else(|| MosaicError::OpenFailure {
                reference: identifier.to_string(),
                reason: "no such raster".to_string(),
            })?;
        self.opened.borrow_mut().push(identifier.to_string());
        self.open_handles.set(self.open_handles.get() + 1);
        Ok(MockRaster {
            name: identifier.to_string(),
            info,
            open_handles: Rc::clone(&self.open_handles),
        })
    }

    fn translate(
        &self,
        source: MockRaster,
        destination: &Path,
        options: &[String],
    ) -> Result<MockRaster> {
        self.translate_calls.borrow_mut().push((
            source.name.clone(),
            destination.to_path_buf(),
            options.to_vec(),
        ));
        if self.fail_translate {
            return Err(MosaicError::TranscodeFailure {
                source_name: source.name.clone(),
                destination: destination.display().to_string(),
                reason: "mock failure".to_string(),
            });
        }
        let name = destination.display().to_string();
        self.rasters
            .borrow_mut()
            .insert(name.clone(), source.info.clone());
        drop(source);
        self.open(&name)
    }

    fn build_overviews(
        &self,
        raster: &mut MockRaster,
        resampling: &str,
        levels: &[u16],
    ) -> Result<()> {
        self.overview_calls.borrow_mut().push((
            raster.name.clone(),
            resampling.to_string(),
            levels.to_vec(),
        ));
        if self.fail_overviews.contains(&raster.name) {
            return Err(MosaicError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "mock overview failure",
            )));
        }
        Ok(())
    }
}
