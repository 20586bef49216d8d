//! Flat network records as they arrive from tabular inputs.
//!
//! These are the shapes the topology builder consumes: one record per
//! supplier, hub and plant, plus three arc lists (supplier→plant roads,
//! supplier→hub roads, hub→plant railroads). Hub and plant capacities are
//! scenario-wide constants, so their records carry only an id.

use crate::diagnostics::Diagnostics;
use crate::units::{Kilometers, Megagrams};
use crate::{SiteId, SiteKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A raw-material supplier and its total available supply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: SiteId,
    pub supply: Megagrams,
}

/// A candidate transfer hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: SiteId,
}

/// A candidate processing plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub id: SiteId,
}

/// A directed haul between two sites with a distance-based rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcRecord {
    pub origin: SiteId,
    pub destination: SiteId,
    pub distance: Kilometers,
    /// Currency per Mg per km
    pub rate: f64,
}

impl ArcRecord {
    pub fn new(origin: usize, destination: usize, distance_km: f64, rate: f64) -> Self {
        Self {
            origin: SiteId::new(origin),
            destination: SiteId::new(destination),
            distance: Kilometers(distance_km),
            rate,
        }
    }

    /// Currency per Mg moved over the full arc (distance × rate)
    pub fn unit_cost(&self) -> f64 {
        self.distance.haul_cost(self.rate)
    }
}

/// The three arc lists a data set may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArcSet {
    /// Supplier → plant roads (single echelon)
    SourceToFacility,
    /// Supplier → hub roads
    SourceToTransfer,
    /// Hub → plant railroads
    TransferToFacility,
}

impl ArcSet {
    pub const ALL: [ArcSet; 3] = [
        ArcSet::SourceToFacility,
        ArcSet::SourceToTransfer,
        ArcSet::TransferToFacility,
    ];

    /// Kinds of the origin and destination endpoints
    pub fn endpoints(self) -> (SiteKind, SiteKind) {
        match self {
            ArcSet::SourceToFacility => (SiteKind::Source, SiteKind::Facility),
            ArcSet::SourceToTransfer => (SiteKind::Source, SiteKind::Transfer),
            ArcSet::TransferToFacility => (SiteKind::Transfer, SiteKind::Facility),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArcSet::SourceToFacility => "source-to-facility",
            ArcSet::SourceToTransfer => "source-to-transfer",
            ArcSet::TransferToFacility => "transfer-to-facility",
        }
    }
}

/// Everything read from a data directory, before any scenario is applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkData {
    pub sources: Vec<SourceRecord>,
    pub transfers: Vec<TransferRecord>,
    pub facilities: Vec<FacilityRecord>,
    #[serde(default)]
    pub source_facility_arcs: Vec<ArcRecord>,
    #[serde(default)]
    pub source_transfer_arcs: Vec<ArcRecord>,
    #[serde(default)]
    pub transfer_facility_arcs: Vec<ArcRecord>,
}

impl NetworkData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, id: usize, supply_mg: f64) -> Self {
        self.sources.push(SourceRecord {
            id: SiteId::new(id),
            supply: Megagrams(supply_mg),
        });
        self
    }

    pub fn with_transfer(mut self, id: usize) -> Self {
        self.transfers.push(TransferRecord { id: SiteId::new(id) });
        self
    }

    pub fn with_facility(mut self, id: usize) -> Self {
        self.facilities.push(FacilityRecord { id: SiteId::new(id) });
        self
    }

    pub fn with_arc(mut self, set: ArcSet, arc: ArcRecord) -> Self {
        self.arcs_mut(set).push(arc);
        self
    }

    pub fn arcs(&self, set: ArcSet) -> &[ArcRecord] {
        match set {
            ArcSet::SourceToFacility => &self.source_facility_arcs,
            ArcSet::SourceToTransfer => &self.source_transfer_arcs,
            ArcSet::TransferToFacility => &self.transfer_facility_arcs,
        }
    }

    pub fn arcs_mut(&mut self, set: ArcSet) -> &mut Vec<ArcRecord> {
        match set {
            ArcSet::SourceToFacility => &mut self.source_facility_arcs,
            ArcSet::SourceToTransfer => &mut self.source_transfer_arcs,
            ArcSet::TransferToFacility => &mut self.transfer_facility_arcs,
        }
    }

    /// Sum of all finite supplier supplies
    pub fn total_supply(&self) -> Megagrams {
        self.sources.iter().map(|s| s.supply).sum()
    }

    /// Id for a synthetic supplier that cannot clash with a real one
    pub fn next_source_id(&self) -> SiteId {
        let max = self.sources.iter().map(|s| s.id.value()).max();
        SiteId::new(max.map_or(1, |m| m + 1))
    }

    fn ids_of(&self, kind: SiteKind) -> Vec<SiteId> {
        match kind {
            SiteKind::Source => self.sources.iter().map(|s| s.id).collect(),
            SiteKind::Transfer => self.transfers.iter().map(|t| t.id).collect(),
            SiteKind::Facility => self.facilities.iter().map(|f| f.id).collect(),
            SiteKind::ExternalSource => Vec::new(),
        }
    }

    /// Check records for problems that would make a model meaningless.
    ///
    /// Errors: duplicate ids within a kind, arcs whose endpoints are not
    /// declared, duplicate arcs, negative or non-finite distances and rates,
    /// negative supplies. Warnings: zero supply, declared sites that no arc
    /// touches.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        for kind in [SiteKind::Source, SiteKind::Transfer, SiteKind::Facility] {
            let mut seen = HashSet::new();
            for id in self.ids_of(kind) {
                if !seen.insert(id) {
                    diag.add_error_with_entity(
                        "structure",
                        "Duplicate id",
                        &format!("{} {}", kind.label(), id.value()),
                    );
                }
            }
        }

        for source in &self.sources {
            let entity = format!("Source {}", source.id.value());
            if !source.supply.is_finite() || source.supply.value() < 0.0 {
                diag.add_error_with_entity(
                    "capacity",
                    "Supply must be a non-negative number",
                    &entity,
                );
            } else if source.supply.value() == 0.0 {
                diag.add_warning_with_entity("capacity", "Supplier has zero supply", &entity);
            }
        }

        let mut touched: HashSet<(SiteKind, SiteId)> = HashSet::new();
        for set in ArcSet::ALL {
            let (from_kind, to_kind) = set.endpoints();
            let origins: HashSet<SiteId> = self.ids_of(from_kind).into_iter().collect();
            let destinations: HashSet<SiteId> = self.ids_of(to_kind).into_iter().collect();
            let mut pairs = HashSet::new();

            for arc in self.arcs(set) {
                let entity = format!(
                    "{} arc {}->{}",
                    set.as_str(),
                    arc.origin.value(),
                    arc.destination.value()
                );
                if !origins.contains(&arc.origin) {
                    diag.add_error_with_entity(
                        "reference",
                        &format!("Origin is not a declared {}", from_kind.label()),
                        &entity,
                    );
                }
                if !destinations.contains(&arc.destination) {
                    diag.add_error_with_entity(
                        "reference",
                        &format!("Destination is not a declared {}", to_kind.label()),
                        &entity,
                    );
                }
                if !pairs.insert((arc.origin, arc.destination)) {
                    diag.add_error_with_entity("structure", "Duplicate arc", &entity);
                }
                if !arc.distance.is_finite() || arc.distance.value() < 0.0 {
                    diag.add_error_with_entity("cost", "Distance must be non-negative", &entity);
                }
                if !arc.rate.is_finite() || arc.rate < 0.0 {
                    diag.add_error_with_entity("cost", "Rate must be non-negative", &entity);
                }
                touched.insert((from_kind, arc.origin));
                touched.insert((to_kind, arc.destination));
            }
        }

        for kind in [SiteKind::Source, SiteKind::Transfer, SiteKind::Facility] {
            for id in self.ids_of(kind) {
                if !touched.contains(&(kind, id)) {
                    diag.add_warning_with_entity(
                        "structure",
                        "Site has no arcs",
                        &format!("{} {}", kind.label(), id.value()),
                    );
                }
            }
        }
    }
}
