use thiserror::Error;

#[derive(Error, Debug)]
pub enum MosaicError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("{0} missing")]
    MissingArgument(&'static str),

    #[error("Invalid overview level: {0:?} (must be a positive integer)")]
    InvalidOverviewLevel(String),

    #[error("Input has no subdatasets: {0}")]
    NoSubdatasets(String),

    #[error("Malformed subdataset identifier {identifier:?}: expected 4 ':'-separated fields, found {fields}")]
    MalformedSubdataset { identifier: String, fields: usize },

    #[error("Zone {zone} has no {tier} subdataset")]
    MissingResolutionTier { zone: String, tier: &'static str },

    #[error("Cannot open subdataset {reference}: {reason}")]
    OpenFailure { reference: String, reason: String },

    #[error("Projection mismatch in zone {zone}: {tier} subdataset differs from 10m")]
    ProjectionMismatch { zone: String, tier: &'static str },

    #[error("Cannot add band for slot {slot}: {reason}")]
    BandAttach { slot: usize, reason: String },

    #[error("Conversion of {source_name} to {destination} failed: {reason}")]
    TranscodeFailure {
        source_name: String,
        destination: String,
        reason: String,
    },

    #[error("Generation of overviews failed for {tier} subdataset: {reason}")]
    OverviewFailure { tier: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, MosaicError>;
