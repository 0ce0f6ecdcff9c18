use crate::catalog::SubdatasetRecord;
use crate::error::{MosaicError, Result};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resolution tier of a multi-resolution product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Fine,
    Medium,
    Coarse,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Fine, Tier::Medium, Tier::Coarse];

    /// Resolution key used in subdataset identifiers and derived file names.
    pub fn label(self) -> &'static str {
        match self {
            Tier::Fine => "10m",
            Tier::Medium => "20m",
            Tier::Coarse => "60m",
        }
    }
}

/// All subdatasets of one zone, keyed by resolution label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneGroup {
    pub zone_key: String,
    pub members: BTreeMap<String, SubdatasetRecord>,
}

/// The three subdataset records a zone's mosaic is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct TriadRecords {
    pub zone_key: String,
    pub fine: SubdatasetRecord,
    pub medium: SubdatasetRecord,
    pub coarse: SubdatasetRecord,
}

impl TriadRecords {
    pub fn get(&self, tier: Tier) -> &SubdatasetRecord {
        match tier {
            Tier::Fine => &self.fine,
            Tier::Medium => &self.medium,
            Tier::Coarse => &self.coarse,
        }
    }
}

impl ZoneGroup {
    /// Pick the 10m, 20m and 60m members; any other resolution labels are ignored.
    pub fn resolve_triad(&self) -> Result<TriadRecords> {
        let take = |tier: Tier| {
            self.members
                .get(tier.label())
                .cloned()
                .ok_or_else(|| MosaicError::MissingResolutionTier {
                    zone: self.zone_key.clone(),
                    tier: tier.label(),
                })
        };

        for label in self.members.keys() {
            if !Tier::ALL.iter().any(|t| t.label() == label.as_str()) {
                debug!("Zone {}: ignoring {} subdataset", self.zone_key, label);
            }
        }

        Ok(TriadRecords {
            zone_key: self.zone_key.clone(),
            fine: take(Tier::Fine)?,
            medium: take(Tier::Medium)?,
            coarse: take(Tier::Coarse)?,
        })
    }
}

/// Group records by zone key, in zone key order.
///
/// If a zone lists the same resolution twice, the first record is kept.
pub fn group_by_zone(records: Vec<SubdatasetRecord>) -> Vec<ZoneGroup> {
    let mut zones: BTreeMap<String, ZoneGroup> = BTreeMap::new();
    for record in records {
        let group = zones
            .entry(record.zone_key.clone())
            .or_insert_with(|| ZoneGroup {
                zone_key: record.zone_key.clone(),
                members: BTreeMap::new(),
            });
        group
            .members
            .entry(record.resolution_key.clone())
            .or_insert(record);
    }

    if let Some(message) = multi_zone_warning(zones.len()) {
        warn!("{}", message);
    }

    zones.into_values().collect()
}

/// Warning for scenes that need one mosaic per zone, `None` for a single zone.
pub fn multi_zone_warning(zone_count: usize) -> Option<String> {
    (zone_count > 1).then(|| {
        format!(
            "The scene contains images from {} different zones, separate VRT datasets will be created",
            zone_count
        )
    })
}

/// Resolve every zone's triad; the first incomplete zone aborts the whole run.
pub fn resolve_triads(groups: &[ZoneGroup]) -> Result<Vec<TriadRecords>> {
    groups.iter().map(ZoneGroup::resolve_triad).collect()
}

/// Output path of a zone's mosaic: the configured path for a single zone,
/// `<output>_<zone>` otherwise.
pub fn zone_output_path(output: &Path, zone_key: &str, zone_count: usize) -> PathBuf {
    if zone_count == 1 {
        return output.to_path_buf();
    }
    let mut path = OsString::from(output.as_os_str());
    path.push("_");
    path.push(zone_key);
    PathBuf::from(path)
}
