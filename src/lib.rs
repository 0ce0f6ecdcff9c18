// Library exports for testing and reuse

pub mod catalog;
pub mod cli;
pub mod cog;
pub mod compose;
pub mod error;
pub mod io;
pub mod mosaic;
pub mod raster;
pub mod validate;
pub mod vrt;
pub mod zones;

// Re-export commonly used types
pub use cli::Config;
pub use error::{MosaicError, Result};
pub use io::GdalBackend;
pub use mosaic::build_mosaics;
pub use raster::{RasterBackend, RasterHandle, Triad};
