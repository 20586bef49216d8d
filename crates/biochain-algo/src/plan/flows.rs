//! Quantized flow generation.
//!
//! Every route with a vehicle capacity gets a sequence of trip slots, each a
//! continuous variable in `[0, vehicle_capacity]`. The number of slots is
//!
//! ```text
//! floor(min(origin capacity, destination capacity) / vehicle capacity) + 1
//! ```
//!
//! which is always at least one and always covers the most either endpoint
//! could ever handle. Routes without a vehicle capacity (the external
//! market) get one unbounded continuous variable instead.

use super::params::HandlingCostPolicy;
use crate::model::{LinearExpr, ModelBuilder, VarId, VariableDef};
use crate::PlanError;
use biochain_core::units::Megagrams;
use biochain_core::{Capacity, SiteKey, SupplyNetwork};
use petgraph::graph::EdgeIndex;

/// Flow variables for one route
#[derive(Debug, Clone, PartialEq)]
pub struct FlowAllocation {
    pub route: EdgeIndex,
    /// Trip slots in order; a single unbounded variable for unquantized routes
    pub slots: Vec<VarId>,
    /// Binary usage indicator per slot, empty unless handling is charged
    /// per dispatched slot
    pub usage: Vec<VarId>,
    pub vehicle_capacity: Option<Megagrams>,
}

impl FlowAllocation {
    pub fn is_quantized(&self) -> bool {
        self.vehicle_capacity.is_some()
    }

    /// Total flow on the route
    pub fn throughput(&self) -> LinearExpr {
        LinearExpr::sum(self.slots.iter().copied())
    }
}

/// Number of trip slots for a route between two sites.
pub fn slot_count(
    origin: Capacity,
    destination: Capacity,
    vehicle_capacity: Megagrams,
) -> Result<usize, PlanError> {
    if !(vehicle_capacity.is_finite() && vehicle_capacity.value() > 0.0) {
        return Err(PlanError::Configuration(format!(
            "vehicle capacity must be positive, got {vehicle_capacity}"
        )));
    }
    for side in [origin, destination] {
        if let Capacity::Finite(mg) = side {
            if !mg.is_finite() || mg.value() < 0.0 {
                return Err(PlanError::Configuration(format!(
                    "site capacity must be a non-negative number, got {mg}"
                )));
            }
        }
    }
    let limit = origin.min(destination).finite().ok_or_else(|| {
        PlanError::Configuration(
            "cannot quantize a route between two unbounded sites".to_string(),
        )
    })?;
    let full_loads = (limit.value() / vehicle_capacity.value()).floor();
    Ok(full_loads as usize + 1)
}

/// All flow allocations of a model, indexed by route
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowAllocations {
    by_route: Vec<FlowAllocation>,
}

impl FlowAllocations {
    pub fn get(&self, route: EdgeIndex) -> Option<&FlowAllocation> {
        self.by_route.get(route.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlowAllocation> {
        self.by_route.iter()
    }

    pub fn len(&self) -> usize {
        self.by_route.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_route.is_empty()
    }

    pub fn throughput(&self, route: EdgeIndex) -> Result<LinearExpr, PlanError> {
        self.get(route)
            .map(FlowAllocation::throughput)
            .ok_or_else(|| {
                PlanError::ModelBuild(format!("route #{} has no flow variables", route.index()))
            })
    }

    /// Total flow entering `site`
    pub fn inflow(&self, network: &SupplyNetwork, site: &SiteKey) -> Result<LinearExpr, PlanError> {
        self.total(network.routes_into(site))
    }

    /// Total flow leaving `site`
    pub fn outflow(
        &self,
        network: &SupplyNetwork,
        site: &SiteKey,
    ) -> Result<LinearExpr, PlanError> {
        self.total(network.routes_from(site))
    }

    fn total(&self, routes: Vec<EdgeIndex>) -> Result<LinearExpr, PlanError> {
        routes
            .into_iter()
            .try_fold(LinearExpr::zero(), |acc, route| Ok(acc + self.throughput(route)?))
    }
}

/// Create the flow variables of every route in `network`.
///
/// Slot counts are computed for all routes before the first variable is
/// added, so a bad vehicle capacity leaves `builder` untouched.
pub fn generate_flows(
    network: &SupplyNetwork,
    policy: HandlingCostPolicy,
    builder: &mut ModelBuilder,
) -> Result<FlowAllocations, PlanError> {
    let mut plan = Vec::new();
    for (route_idx, route) in network.routes() {
        let slots = match route.vehicle_capacity {
            Some(vehicle_capacity) => {
                let origin = endpoint_capacity(network, &route.origin)?;
                let destination = endpoint_capacity(network, &route.destination)?;
                Some(slot_count(origin, destination, vehicle_capacity).map_err(|e| match e {
                    PlanError::Configuration(msg) => {
                        PlanError::Configuration(format!("{}: {msg}", route.label()))
                    }
                    other => other,
                })?)
            }
            None => None,
        };
        plan.push((route_idx, slots));
    }

    let mut by_route = Vec::with_capacity(plan.len());
    for (route_idx, slots) in plan {
        let route = &network.graph[route_idx];
        let label = route.label();
        let allocation = match (slots, route.vehicle_capacity) {
            (Some(count), Some(vehicle_capacity)) => {
                let cap = vehicle_capacity.value();
                let slots: Vec<VarId> = (0..count)
                    .map(|k| {
                        builder.add_variable(VariableDef::continuous(
                            format!("flow[{label}][{k}]"),
                            0.0,
                            Some(cap),
                        ))
                    })
                    .collect();
                let usage = match policy {
                    HandlingCostPolicy::PerDispatchedSlot => (0..count)
                        .map(|k| {
                            builder.add_variable(VariableDef::binary(format!("used[{label}][{k}]")))
                        })
                        .collect(),
                    HandlingCostPolicy::PerLoad => Vec::new(),
                };
                FlowAllocation {
                    route: route_idx,
                    slots,
                    usage,
                    vehicle_capacity: Some(vehicle_capacity),
                }
            }
            _ => FlowAllocation {
                route: route_idx,
                slots: vec![builder.add_variable(VariableDef::continuous(
                    format!("flow[{label}]"),
                    0.0,
                    None,
                ))],
                usage: Vec::new(),
                vehicle_capacity: None,
            },
        };
        by_route.push(allocation);
    }

    Ok(FlowAllocations { by_route })
}

fn endpoint_capacity(network: &SupplyNetwork, key: &SiteKey) -> Result<Capacity, PlanError> {
    network
        .site(key)
        .map(|site| site.capacity)
        .ok_or_else(|| PlanError::ModelBuild(format!("route endpoint {key} is not in the network")))
}
