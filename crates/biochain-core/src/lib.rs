//! # biochain-core: Supply Chain Network Core
//!
//! Provides the data structures for biomass-to-fuel supply chain planning.
//!
//! ## Design Philosophy
//!
//! A supply chain is modeled as a **directed graph** where:
//! - **Nodes**: [`Site`]s (suppliers, transfer hubs, processing plants, and an
//!   optional external market supplier)
//! - **Edges**: [`Route`]s carrying biomass in one [`TransportMode`], with a
//!   per-Mg haul cost, an optional vehicle capacity and a per-trip handling cost
//!
//! Raw tabular inputs live in [`data::NetworkData`]. A planning scenario turns
//! those records into a [`SupplyNetwork`] holding only the sites and routes
//! that scenario may use.
//!
//! ## Quick Start
//!
//! ```rust
//! use biochain_core::*;
//! use biochain_core::units::Megagrams;
//!
//! let mut network = SupplyNetwork::new();
//! let farm = SiteKey::new(SiteKind::Source, 1);
//! let plant = SiteKey::new(SiteKind::Facility, 7);
//!
//! network.add_site(Site::source(farm.id, Megagrams(1000.0)))?;
//! network.add_site(Site::new(plant, Capacity::Finite(Megagrams(2000.0)), 100.0))?;
//! network.add_route(Route {
//!     origin: farm,
//!     destination: plant,
//!     mode: TransportMode::Truck,
//!     unit_cost: 1.0,
//!     vehicle_capacity: Some(Megagrams(500.0)),
//!     trip_handling_cost: 10.0,
//! })?;
//!
//! assert_eq!(network.stats().num_routes, 1);
//! # Ok::<(), biochain_core::BiochainError>(())
//! ```
//!
//! ## ID System
//!
//! Ids are unique **within a kind**: supplier 1 and plant 1 are different
//! sites. A [`SiteKey`] pairs the kind with the id and is what the graph is
//! indexed by.
//!
//! ## Modules
//!
//! - [`data`] - Flat input records and their validation
//! - [`diagnostics`] - Issue collection for loading and validation
//! - [`error`] - Unified error type
//! - [`units`] - Mass, volume and distance newtypes

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod data;
pub mod diagnostics;
pub mod error;
pub mod units;

pub use data::{ArcRecord, ArcSet, FacilityRecord, NetworkData, SourceRecord, TransferRecord};
pub use diagnostics::{DiagnosticIssue, Diagnostics, LoadStats, Severity};
pub use error::{BiochainError, BiochainResult};
use units::Megagrams;

/// Newtype wrapper for site ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(usize);

impl SiteId {
    #[inline]
    pub fn new(value: usize) -> Self {
        SiteId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

/// Role a site plays in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteKind {
    /// Raw-material supplier with finite supply
    Source,
    /// Optional intermediate hub
    Transfer,
    /// Processing plant where biomass becomes fuel
    Facility,
    /// Market supplier with unbounded supply
    ExternalSource,
}

impl SiteKind {
    pub fn label(self) -> &'static str {
        match self {
            SiteKind::Source => "Source",
            SiteKind::Transfer => "Transfer",
            SiteKind::Facility => "Facility",
            SiteKind::ExternalSource => "External",
        }
    }

    /// Whether the site only exists if a build decision opens it
    pub fn is_optional(self) -> bool {
        matches!(self, SiteKind::Transfer | SiteKind::Facility)
    }

    /// Whether material enters the chain at this site
    pub fn is_supply(self) -> bool {
        matches!(self, SiteKind::Source | SiteKind::ExternalSource)
    }
}

/// Graph key: a site id qualified by its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteKey {
    pub kind: SiteKind,
    pub id: SiteId,
}

impl SiteKey {
    pub fn new(kind: SiteKind, id: usize) -> Self {
        Self {
            kind,
            id: SiteId::new(id),
        }
    }
}

impl std::fmt::Display for SiteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind.label(), self.id.value())
    }
}

/// Supply (for suppliers) or throughput (for hubs and plants) limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    Finite(Megagrams),
    Unbounded,
}

impl Capacity {
    pub fn finite(&self) -> Option<Megagrams> {
        match self {
            Capacity::Finite(mg) => Some(*mg),
            Capacity::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Capacity::Unbounded)
    }

    /// The tighter of two limits
    pub fn min(self, other: Capacity) -> Capacity {
        match (self, other) {
            (Capacity::Finite(a), Capacity::Finite(b)) => Capacity::Finite(a.min(b)),
            (Capacity::Finite(a), Capacity::Unbounded) => Capacity::Finite(a),
            (Capacity::Unbounded, other) => other,
        }
    }
}

impl std::fmt::Display for Capacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capacity::Finite(mg) => write!(f, "{}", mg),
            Capacity::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// A node of the supply chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub key: SiteKey,
    pub capacity: Capacity,
    /// Fixed investment cost charged when the site is built (0 for suppliers)
    pub activation_cost: f64,
}

impl Site {
    pub fn new(key: SiteKey, capacity: Capacity, activation_cost: f64) -> Self {
        Self {
            key,
            capacity,
            activation_cost,
        }
    }

    /// A supplier with finite supply and no activation cost
    pub fn source(id: SiteId, supply: Megagrams) -> Self {
        Self::new(
            SiteKey {
                kind: SiteKind::Source,
                id,
            },
            Capacity::Finite(supply),
            0.0,
        )
    }

    /// The always-available market supplier
    pub fn external(id: SiteId) -> Self {
        Self::new(
            SiteKey {
                kind: SiteKind::ExternalSource,
                id,
            },
            Capacity::Unbounded,
            0.0,
        )
    }

    pub fn kind(&self) -> SiteKind {
        self.key.kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Truck,
    Train,
}

impl TransportMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Truck => "truck",
            TransportMode::Train => "train",
        }
    }
}

/// A directed haul between two sites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub origin: SiteKey,
    pub destination: SiteKey,
    pub mode: TransportMode,
    /// Currency per Mg carried over the whole route
    pub unit_cost: f64,
    /// Mass per trip; `None` means the route is not split into trips
    pub vehicle_capacity: Option<Megagrams>,
    /// Fixed cost per dispatched trip
    pub trip_handling_cost: f64,
}

impl Route {
    pub fn label(&self) -> String {
        format!(
            "{}->{} ({})",
            self.origin,
            self.destination,
            self.mode.as_str()
        )
    }
}

/// Basic counts over a [`SupplyNetwork`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkStats {
    pub num_sources: usize,
    pub num_transfers: usize,
    pub num_facilities: usize,
    pub has_external_source: bool,
    pub num_routes: usize,
    pub num_truck_routes: usize,
    pub num_train_routes: usize,
    /// Sum of finite supplier supplies
    pub total_supply_mg: f64,
}

/// Directed graph of the sites and routes one scenario may use
#[derive(Debug, Clone, Default)]
pub struct SupplyNetwork {
    pub graph: DiGraph<Site, Route>,
    index: HashMap<SiteKey, NodeIndex>,
}

impl SupplyNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a site; its key must be new.
    pub fn add_site(&mut self, site: Site) -> BiochainResult<NodeIndex> {
        if self.index.contains_key(&site.key) {
            return Err(BiochainError::Configuration(format!(
                "duplicate site {}",
                site.key
            )));
        }
        let key = site.key;
        let idx = self.graph.add_node(site);
        self.index.insert(key, idx);
        Ok(idx)
    }

    /// Insert a route; both endpoints must already exist.
    pub fn add_route(&mut self, route: Route) -> BiochainResult<EdgeIndex> {
        let from = self.node_index(&route.origin).ok_or_else(|| {
            BiochainError::Configuration(format!(
                "route {} starts at unknown site {}",
                route.label(),
                route.origin
            ))
        })?;
        let to = self.node_index(&route.destination).ok_or_else(|| {
            BiochainError::Configuration(format!(
                "route {} ends at unknown site {}",
                route.label(),
                route.destination
            ))
        })?;
        Ok(self.graph.add_edge(from, to, route))
    }

    pub fn node_index(&self, key: &SiteKey) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    pub fn site(&self, key: &SiteKey) -> Option<&Site> {
        self.node_index(key).map(|idx| &self.graph[idx])
    }

    /// Sites of one kind in insertion order
    pub fn sites_of_kind(&self, kind: SiteKind) -> impl Iterator<Item = &Site> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| &self.graph[idx])
            .filter(move |site| site.kind() == kind)
    }

    /// All routes in insertion order
    pub fn routes(&self) -> impl Iterator<Item = (EdgeIndex, &Route)> + '_ {
        self.graph
            .edge_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// Routes leaving `key`, in insertion order
    pub fn routes_from(&self, key: &SiteKey) -> Vec<EdgeIndex> {
        self.routes_directed(key, Direction::Outgoing)
    }

    /// Routes entering `key`, in insertion order
    pub fn routes_into(&self, key: &SiteKey) -> Vec<EdgeIndex> {
        self.routes_directed(key, Direction::Incoming)
    }

    fn routes_directed(&self, key: &SiteKey, direction: Direction) -> Vec<EdgeIndex> {
        let Some(idx) = self.node_index(key) else {
            return Vec::new();
        };
        let mut edges: Vec<EdgeIndex> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| edge.id())
            .collect();
        // petgraph walks adjacency lists newest-first
        edges.sort();
        edges
    }

    pub fn stats(&self) -> NetworkStats {
        let mut stats = NetworkStats::default();

        for site in self.graph.node_weights() {
            match site.kind() {
                SiteKind::Source => {
                    stats.num_sources += 1;
                    if let Some(supply) = site.capacity.finite() {
                        stats.total_supply_mg += supply.value();
                    }
                }
                SiteKind::Transfer => stats.num_transfers += 1,
                SiteKind::Facility => stats.num_facilities += 1,
                SiteKind::ExternalSource => stats.has_external_source = true,
            }
        }

        for route in self.graph.edge_weights() {
            stats.num_routes += 1;
            match route.mode {
                TransportMode::Truck => stats.num_truck_routes += 1,
                TransportMode::Train => stats.num_train_routes += 1,
            }
        }

        stats
    }

    /// Structural checks on an assembled network.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        let stats = self.stats();

        if stats.num_facilities == 0 {
            diag.add_error("structure", "Network has no facilities");
            return;
        }
        if stats.num_routes == 0 {
            diag.add_error("structure", "Network has no routes");
            return;
        }

        for site in self.graph.node_weights() {
            let entity = site.key.to_string();
            if let Capacity::Finite(mg) = site.capacity {
                if !mg.is_finite() || mg.value() < 0.0 {
                    diag.add_error_with_entity(
                        "capacity",
                        "Capacity must be a non-negative number",
                        &entity,
                    );
                } else if site.kind().is_optional() && mg.value() == 0.0 {
                    diag.add_error_with_entity("capacity", "Capacity must be positive", &entity);
                }
            }
            if site.kind().is_supply() && self.routes_from(&site.key).is_empty() {
                diag.add_warning_with_entity(
                    "structure",
                    "Supplier has no outgoing routes",
                    &entity,
                );
            }
            if site.kind() == SiteKind::Facility && self.routes_into(&site.key).is_empty() {
                diag.add_warning_with_entity(
                    "structure",
                    "Facility has no incoming routes",
                    &entity,
                );
            }
        }

        for (_, route) in self.routes() {
            if !route.unit_cost.is_finite() || route.unit_cost < 0.0 {
                diag.add_error_with_entity(
                    "cost",
                    "Unit cost must be non-negative",
                    &route.label(),
                );
            }
            if let Some(cap) = route.vehicle_capacity {
                if cap.value() <= 0.0 {
                    diag.add_error_with_entity(
                        "capacity",
                        "Vehicle capacity must be positive",
                        &route.label(),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_echelon() -> SupplyNetwork {
        let mut network = SupplyNetwork::new();
        network
            .add_site(Site::source(SiteId::new(1), Megagrams(1000.0)))
            .unwrap();
        network
            .add_site(Site::new(
                SiteKey::new(SiteKind::Transfer, 1),
                Capacity::Finite(Megagrams(300.0)),
                50.0,
            ))
            .unwrap();
        network
            .add_site(Site::new(
                SiteKey::new(SiteKind::Facility, 1),
                Capacity::Finite(Megagrams(600.0)),
                100.0,
            ))
            .unwrap();
        network
            .add_route(Route {
                origin: SiteKey::new(SiteKind::Source, 1),
                destination: SiteKey::new(SiteKind::Transfer, 1),
                mode: TransportMode::Truck,
                unit_cost: 2.0,
                vehicle_capacity: Some(Megagrams(50.0)),
                trip_handling_cost: 5.0,
            })
            .unwrap();
        network
            .add_route(Route {
                origin: SiteKey::new(SiteKind::Transfer, 1),
                destination: SiteKey::new(SiteKind::Facility, 1),
                mode: TransportMode::Train,
                unit_cost: 1.0,
                vehicle_capacity: Some(Megagrams(200.0)),
                trip_handling_cost: 20.0,
            })
            .unwrap();
        network
    }

    #[test]
    fn test_same_id_different_kind() {
        let network = two_echelon();
        assert_eq!(network.graph.node_count(), 3);
        let hub = network.site(&SiteKey::new(SiteKind::Transfer, 1)).unwrap();
        assert_eq!(hub.activation_cost, 50.0);
    }

    #[test]
    fn test_duplicate_site_rejected() {
        let mut network = two_echelon();
        let err = network
            .add_site(Site::source(SiteId::new(1), Megagrams(5.0)))
            .unwrap_err();
        assert!(matches!(err, BiochainError::Configuration(_)));
    }

    #[test]
    fn test_route_to_unknown_site_rejected() {
        let mut network = two_echelon();
        let err = network
            .add_route(Route {
                origin: SiteKey::new(SiteKind::Source, 1),
                destination: SiteKey::new(SiteKind::Facility, 9),
                mode: TransportMode::Truck,
                unit_cost: 1.0,
                vehicle_capacity: None,
                trip_handling_cost: 0.0,
            })
            .unwrap_err();
        assert!(err.to_string().contains("Facility 9"));
    }

    #[test]
    fn test_directed_lookup() {
        let network = two_echelon();
        let hub = SiteKey::new(SiteKind::Transfer, 1);
        assert_eq!(network.routes_into(&hub).len(), 1);
        assert_eq!(network.routes_from(&hub).len(), 1);
        assert!(network
            .routes_into(&SiteKey::new(SiteKind::Source, 1))
            .is_empty());
    }

    #[test]
    fn test_stats() {
        let stats = two_echelon().stats();
        assert_eq!(stats.num_sources, 1);
        assert_eq!(stats.num_transfers, 1);
        assert_eq!(stats.num_facilities, 1);
        assert_eq!(stats.num_truck_routes, 1);
        assert_eq!(stats.num_train_routes, 1);
        assert!(!stats.has_external_source);
        assert_eq!(stats.total_supply_mg, 1000.0);
    }

    #[test]
    fn test_capacity_min() {
        let a = Capacity::Finite(Megagrams(10.0));
        assert_eq!(a.min(Capacity::Unbounded), a);
        assert_eq!(Capacity::Unbounded.min(a), a);
        assert_eq!(
            a.min(Capacity::Finite(Megagrams(4.0))),
            Capacity::Finite(Megagrams(4.0))
        );
        assert!(Capacity::Unbounded.min(Capacity::Unbounded).is_unbounded());
    }

    #[test]
    fn test_validate_flags_bad_vehicle_capacity() {
        let mut network = two_echelon();
        network
            .add_route(Route {
                origin: SiteKey::new(SiteKind::Source, 1),
                destination: SiteKey::new(SiteKind::Facility, 1),
                mode: TransportMode::Truck,
                unit_cost: 1.0,
                vehicle_capacity: Some(Megagrams(0.0)),
                trip_handling_cost: 0.0,
            })
            .unwrap();
        let mut diag = Diagnostics::new();
        network.validate_into(&mut diag);
        assert_eq!(diag.error_count(), 1);
    }

    #[test]
    fn test_validate_flags_undefined_supply_and_negative_cost() {
        let mut network = two_echelon();
        network
            .add_site(Site::source(SiteId::new(2), Megagrams(f64::NAN)))
            .unwrap();
        network
            .add_route(Route {
                origin: SiteKey::new(SiteKind::Source, 2),
                destination: SiteKey::new(SiteKind::Facility, 1),
                mode: TransportMode::Truck,
                unit_cost: -3.0,
                vehicle_capacity: Some(Megagrams(500.0)),
                trip_handling_cost: 0.0,
            })
            .unwrap();
        let mut diag = Diagnostics::new();
        network.validate_into(&mut diag);

        assert_eq!(diag.issues_by_category("capacity").count(), 1);
        assert_eq!(diag.issues_by_category("cost").count(), 1);
    }
}
