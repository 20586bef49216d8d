//! CSV importers for supply chain data sets.

mod csv_tables;

pub use csv_tables::{parse_arcs, parse_ids, parse_sources};

use anyhow::{anyhow, Context, Result};
use biochain_core::{ArcSet, Diagnostics, FacilityRecord, LoadStats, NetworkData, TransferRecord};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

pub const SUPPLIERS_FILE: &str = "suppliers.csv";
pub const HUBS_FILE: &str = "hubs.csv";
pub const PLANTS_FILE: &str = "plants.csv";

/// File name holding one arc list
pub fn arc_file(set: ArcSet) -> &'static str {
    match set {
        ArcSet::SourceToFacility => "roads_s_p.csv",
        ArcSet::SourceToTransfer => "roads_s_h.csv",
        ArcSet::TransferToFacility => "railroads_h_p.csv",
    }
}

/// Records read from a data directory together with everything noticed on the way
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    pub data: NetworkData,
    pub diagnostics: Diagnostics,
    pub stats: LoadStats,
}

impl LoadResult {
    /// Hand out the data only if loading and validation found no errors.
    pub fn into_data(self) -> Result<NetworkData> {
        if self.diagnostics.has_errors() {
            let first = self
                .diagnostics
                .errors()
                .next()
                .map(|issue| issue.to_string())
                .unwrap_or_default();
            return Err(anyhow!(
                "data set has {} ({first})",
                self.diagnostics.summary()
            ));
        }
        Ok(self.data)
    }
}

/// Load every known table from `dir` and validate the result.
///
/// `suppliers.csv` and `plants.csv` must exist. Hub and arc tables are
/// optional because single-echelon data sets have no hubs and hubbed data
/// sets have no supplier→plant roads; the topology builder reports a missing
/// echelon when a scenario actually needs it.
pub fn load_data_dir(dir: impl AsRef<Path>) -> Result<LoadResult> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(anyhow!("data directory '{}' does not exist", dir.display()));
    }

    let mut result = LoadResult::default();

    let suppliers = dir.join(SUPPLIERS_FILE);
    result.data.sources = parse_sources(
        open(&suppliers)?,
        &mut result.diagnostics,
        &mut result.stats,
    )
    .with_context(|| format!("reading {}", suppliers.display()))?;

    let plants = dir.join(PLANTS_FILE);
    result.data.facilities = parse_ids(open(&plants)?, &mut result.diagnostics, &mut result.stats)
        .with_context(|| format!("reading {}", plants.display()))?
        .into_iter()
        .map(|id| FacilityRecord { id })
        .collect();

    let hubs = dir.join(HUBS_FILE);
    if hubs.is_file() {
        result.data.transfers = parse_ids(open(&hubs)?, &mut result.diagnostics, &mut result.stats)
            .with_context(|| format!("reading {}", hubs.display()))?
            .into_iter()
            .map(|id| TransferRecord { id })
            .collect();
    } else {
        debug!(path = %hubs.display(), "no hub table");
    }

    for set in ArcSet::ALL {
        let path = dir.join(arc_file(set));
        if !path.is_file() {
            debug!(path = %path.display(), "no {} arc table", set.as_str());
            continue;
        }
        let arcs = parse_arcs(open(&path)?, &mut result.diagnostics, &mut result.stats)
            .with_context(|| format!("reading {}", path.display()))?;
        *result.data.arcs_mut(set) = arcs;
    }

    result.stats.sources = result.data.sources.len();
    result.stats.transfers = result.data.transfers.len();
    result.stats.facilities = result.data.facilities.len();
    result.stats.arcs = ArcSet::ALL
        .iter()
        .map(|set| result.data.arcs(*set).len())
        .sum();

    result.data.validate_into(&mut result.diagnostics);

    info!(
        sources = result.stats.sources,
        transfers = result.stats.transfers,
        facilities = result.stats.facilities,
        arcs = result.stats.arcs,
        skipped = result.stats.skipped_lines,
        "loaded data set from {}",
        dir.display()
    );

    Ok(result)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("opening {}", path.display()))
}
