//! Boundary to the raster I/O library.
//!
//! Handles are owned values: dropping one closes the underlying raster, so a
//! triad is released on every exit path of the stage that holds it.

use crate::error::Result;
use crate::zones::{Tier, TriadRecords};
use std::path::Path;

/// An opened raster.
pub trait RasterHandle {
    /// Name the raster was opened with; VRT sources refer to it verbatim.
    fn description(&self) -> &str;

    /// (width, height) in pixels
    fn raster_size(&self) -> (usize, usize);

    fn band_count(&self) -> usize;

    /// Spatial reference as WKT
    fn projection(&self) -> String;

    fn geo_transform(&self) -> Result<[f64; 6]>;

    /// Pixel type name of a 1-based band, e.g. "UInt16".
    fn band_type_name(&self, band: usize) -> Result<String>;
}

pub trait RasterBackend {
    type Handle: RasterHandle;

    /// Raw `KEY=VALUE` items of the SUBDATASETS metadata domain of `path`.
    fn subdatasets(&self, path: &Path) -> Result<Vec<String>>;

    /// Open a raster read-only. Fails with `OpenFailure` naming `identifier`.
    fn open(&self, identifier: &str) -> Result<Self::Handle>;

    /// Copy `source` to `destination` with the given translate arguments and
    /// return a handle to the copy. `source` is closed either way.
    fn translate(
        &self,
        source: Self::Handle,
        destination: &Path,
        options: &[String],
    ) -> Result<Self::Handle>;

    /// Build internal or external overviews at the given decimation factors.
    fn build_overviews(
        &self,
        raster: &mut Self::Handle,
        resampling: &str,
        levels: &[u16],
    ) -> Result<()>;
}

/// The three open rasters of one zone.
#[derive(Debug)]
pub struct Triad<H> {
    pub fine: H,
    pub medium: H,
    pub coarse: H,
}

impl<H> Triad<H> {
    pub fn get(&self, tier: Tier) -> &H {
        match tier {
            Tier::Fine => &self.fine,
            Tier::Medium => &self.medium,
            Tier::Coarse => &self.coarse,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut H {
        match tier {
            Tier::Fine => &mut self.fine,
            Tier::Medium => &mut self.medium,
            Tier::Coarse => &mut self.coarse,
        }
    }

    /// Replace every member, in tier order. On error the members not yet
    /// replaced are dropped along with the partial result.
    pub fn try_map<F>(self, mut f: F) -> Result<Triad<H>>
    where
        F: FnMut(Tier, H) -> Result<H>,
    {
        let fine = f(Tier::Fine, self.fine)?;
        let medium = f(Tier::Medium, self.medium)?;
        let coarse = f(Tier::Coarse, self.coarse)?;
        Ok(Triad {
            fine,
            medium,
            coarse,
        })
    }
}

/// Open the three members of a resolved triad.
pub fn open_triad<B: RasterBackend>(
    backend: &B,
    records: &TriadRecords,
) -> Result<Triad<B::Handle>> {
    Ok(Triad {
        fine: backend.open(&records.fine.identifier)?,
        medium: backend.open(&records.medium.identifier)?,
        coarse: backend.open(&records.coarse.identifier)?,
    })
}
