use crate::error::{MosaicError, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "s2vrt")]
#[command(about = "Combine the 10m, 20m and 60m subdatasets of a Sentinel-2 product into a 13-band VRT")]
#[command(version)]
pub struct Args {
    /// Input product (e.g. MTD_MSIL1C.xml or the zipped SAFE)
    #[arg(value_name = "INPUT")]
    pub input_file: Option<String>,

    /// Output VRT path (suffixed with _<zone> if the scene spans several zones)
    #[arg(value_name = "OUTPUT")]
    pub output_file: Option<String>,

    /// Overview levels which will be generated for input images, e.g. "2 4 8"
    #[arg(short, long, value_name = "LEVELS", default_value = "")]
    pub overview: String,

    /// Convert input subdatasets to cloud-optimized GeoTIFFs
    #[arg(long)]
    pub cog: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Immutable run configuration handed to every pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub overview_levels: Vec<u16>,
    pub cog: bool,
    pub verbose: bool,
}

impl TryFrom<Args> for Config {
    type Error = MosaicError;

    fn try_from(args: Args) -> Result<Self> {
        let input = args
            .input_file
            .ok_or(MosaicError::MissingArgument("input file"))?;
        let output = args
            .output_file
            .ok_or(MosaicError::MissingArgument("output file"))?;

        Ok(Config {
            input: PathBuf::from(input),
            output: PathBuf::from(output),
            overview_levels: parse_overview_levels(&args.overview)?,
            cog: args.cog,
            verbose: args.verbose,
        })
    }
}

/// Whether a clap error is a help or version request rather than a usage error.
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

/// Parse a whitespace-separated list of overview decimation factors.
pub fn parse_overview_levels(levels: &str) -> Result<Vec<u16>> {
    levels
        .split_whitespace()
        .map(|token| match token.parse::<u16>() {
            Ok(level) if level > 0 => Ok(level),
            _ => Err(MosaicError::InvalidOverviewLevel(token.to_string())),
        })
        .collect()
}
