use crate::error::{MosaicError, Result};
use log::debug;
use std::collections::BTreeMap;

/// One NAME/DESC pair from the SUBDATASETS metadata domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdatasetEntry {
    pub name: String,
    pub description: String,
}

/// A parsed subdataset identifier `<productTag>:<fileReference>:<resolution>:<zone>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdatasetRecord {
    /// Full identifier, as passed to the raster library to open the subdataset
    pub identifier: String,
    pub product_tag: String,
    pub file_reference: String,
    pub resolution_key: String,
    pub zone_key: String,
}

impl SubdatasetRecord {
    pub fn parse(identifier: &str) -> Result<Self> {
        let fields: Vec<&str> = identifier.split(':').collect();
        if fields.len() != 4 {
            return Err(MosaicError::MalformedSubdataset {
                identifier: identifier.to_string(),
                fields: fields.len(),
            });
        }

        Ok(SubdatasetRecord {
            identifier: identifier.to_string(),
            product_tag: fields[0].to_string(),
            file_reference: fields[1].to_string(),
            resolution_key: fields[2].to_string(),
            zone_key: fields[3].to_string(),
        })
    }
}

/// Pair `SUBDATASET_<n>_NAME=` / `SUBDATASET_<n>_DESC=` items, ordered by `n`.
///
/// Items that do not follow this pattern are ignored. A NAME without a
/// matching DESC gets an empty description.
pub fn subdataset_entries(metadata: &[String]) -> Vec<SubdatasetEntry> {
    let mut names: BTreeMap<usize, String> = BTreeMap::new();
    let mut descriptions: BTreeMap<usize, String> = BTreeMap::new();

    for item in metadata {
        let Some((key, value)) = item.split_once('=') else {
            continue;
        };
        let Some(rest) = key.strip_prefix("SUBDATASET_") else {
            continue;
        };
        let Some((index, kind)) = rest.split_once('_') else {
            continue;
        };
        let Ok(index) = index.parse::<usize>() else {
            continue;
        };
        match kind {
            "NAME" => {
                names.insert(index, value.to_string());
            }
            "DESC" => {
                descriptions.insert(index, value.to_string());
            }
            _ => {}
        }
    }

    names
        .into_iter()
        .map(|(index, name)| SubdatasetEntry {
            name,
            description: descriptions.remove(&index).unwrap_or_default(),
        })
        .collect()
}

/// Parse every entry; the first malformed identifier aborts.
pub fn parse_catalog(entries: &[SubdatasetEntry]) -> Result<Vec<SubdatasetRecord>> {
    entries
        .iter()
        .map(|entry| {
            debug!("Subdataset {} ({})", entry.name, entry.description);
            SubdatasetRecord::parse(&entry.name)
        })
        .collect()
}
