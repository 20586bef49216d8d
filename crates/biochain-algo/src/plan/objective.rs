//! Objective composition: transport + handling + investment.

use super::facilities::FacilityDecisions;
use super::flows::FlowAllocations;
use super::params::HandlingCostPolicy;
use crate::model::LinearExpr;
use biochain_core::{SupplyNetwork, TransportMode};
use std::collections::BTreeMap;

/// The three cost components, kept apart so solutions can report each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectiveParts {
    pub transport: LinearExpr,
    pub handling: LinearExpr,
    pub investment: LinearExpr,
    pub transport_by_mode: BTreeMap<TransportMode, LinearExpr>,
    pub handling_by_mode: BTreeMap<TransportMode, LinearExpr>,
}

impl ObjectiveParts {
    pub fn total(&self) -> LinearExpr {
        self.transport.clone() + self.handling.clone() + self.investment.clone()
    }
}

pub fn compose_objective(
    network: &SupplyNetwork,
    flows: &FlowAllocations,
    decisions: &FacilityDecisions,
    policy: HandlingCostPolicy,
) -> ObjectiveParts {
    let per_route: Vec<RouteCost> = flows
        .iter()
        .map(|allocation| {
            let route = &network.graph[allocation.route];

            let transport = allocation
                .slots
                .iter()
                .map(|slot| (*slot, route.unit_cost))
                .collect();

            let handling = match (allocation.vehicle_capacity, policy) {
                (None, _) => LinearExpr::zero(),
                (Some(_), HandlingCostPolicy::PerDispatchedSlot) => allocation
                    .usage
                    .iter()
                    .map(|used| (*used, route.trip_handling_cost))
                    .collect(),
                (Some(capacity), HandlingCostPolicy::PerLoad) => {
                    let per_unit = route.trip_handling_cost / capacity.value();
                    allocation.slots.iter().map(|slot| (*slot, per_unit)).collect()
                }
            };

            RouteCost {
                mode: route.mode,
                transport,
                handling,
            }
        })
        .collect();

    ObjectiveParts {
        transport: per_route.iter().map(|c| c.transport.clone()).sum(),
        handling: per_route.iter().map(|c| c.handling.clone()).sum(),
        investment: decisions
            .iter()
            .map(|d| (d.var, d.activation_cost))
            .collect(),
        transport_by_mode: by_mode(&per_route, |c| &c.transport),
        handling_by_mode: by_mode(&per_route, |c| &c.handling),
    }
}

struct RouteCost {
    mode: TransportMode,
    transport: LinearExpr,
    handling: LinearExpr,
}

fn by_mode(
    costs: &[RouteCost],
    part: impl Fn(&RouteCost) -> &LinearExpr,
) -> BTreeMap<TransportMode, LinearExpr> {
    costs.iter().fold(BTreeMap::new(), |mut acc, cost| {
        let entry: &mut LinearExpr = acc.entry(cost.mode).or_default();
        *entry = std::mem::take(entry) + part(cost).clone();
        acc
    })
}
