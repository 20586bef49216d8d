//! Biomass-to-fuel supply chain design
//!
//! This module formulates the facility location and flow problem as a
//! Mixed-Integer Linear Program and hands it to a [`SolverBackend`].
//!
//! ## Problem Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SUPPLY CHAIN DESIGN                                                     │
//! │  ───────────────────                                                     │
//! │                                                                          │
//! │  Given:                                                                  │
//! │    • Suppliers with finite biomass supply                               │
//! │    • Candidate hubs and plants with fixed capacity and build cost       │
//! │    • Truck and train routes with per-Mg haul cost and vehicle size      │
//! │                                                                          │
//! │  Decide:                                                                 │
//! │    • Which hubs and plants to build (binary)                            │
//! │    • How much moves on each trip slot of each route (continuous)        │
//! │                                                                          │
//! │  Minimize:                                                               │
//! │    Transport cost + Handling cost + Investment cost                     │
//! │                                                                          │
//! │  Subject to:                                                             │
//! │    • Supplier supply limits                                             │
//! │    • Hub and plant capacity, open only if built                         │
//! │    • Flow conservation at hubs, global mass balance                     │
//! │    • Plants receive enough biomass for the fuel target                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## MILP Formulation
//!
//! ```text
//! minimize    Σ_a Σ_k c_a · f_ak  +  Σ_a Σ_k h_a · u_ak  +  Σ_n F_n · y_n
//!             └───────────────┘     └──────────────┘     └───────────┘
//!               transport             handling            investment
//!
//! subject to:
//!   Σ_out f ≤ S_i                     Supply at each supplier i
//!   Σ_in f - C_n · y_n ≤ 0            Gate at each hub and plant n
//!   Σ_in f = Σ_out f                  Balance at each hub
//!   Σ_suppliers out = Σ_plants in     Global mass balance
//!   Σ_plants in ≥ goal / yield        Production goal
//!   f_ak - V_a · u_ak ≤ 0             Slot usage (per-dispatched-slot policy)
//!   0 ≤ f_ak ≤ V_a,  u_ak, y_n ∈ {0,1}
//! ```
//!
//! Each route `a` carries `floor(min(cap(origin), cap(dest)) / V_a) + 1`
//! trip slots `f_ak`. With [`HandlingCostPolicy::PerLoad`] the `u_ak` binaries
//! are dropped and `h_a / V_a` is added to the per-Mg cost instead.
//!
//! ## Variants
//!
//! - [`ScenarioVariant::Direct`]: suppliers → plants by truck
//! - [`ScenarioVariant::Hubbed`]: suppliers → hubs by truck → plants by train
//! - [`ScenarioVariant::HubbedWithExternalMarket`]: hubbed, plus an unbounded
//!   market supplier feeding every hub at a flat per-Mg price, with no trip
//!   slots on those routes

mod constraints;
mod facilities;
mod flows;
mod formulation;
mod objective;
mod params;
mod solution;
mod topology;
mod verify;

pub use facilities::{FacilityDecision, FacilityDecisions};
pub use flows::{slot_count, FlowAllocation, FlowAllocations};
pub use formulation::{formulate, formulate_network, PlanModel};
pub use objective::ObjectiveParts;
pub use params::{HandlingCostPolicy, ModeParameters, PlanParameters, ScenarioVariant};
pub use solution::{CostBreakdown, PlanSolution, RouteFlow};
pub use topology::{arc_sets, build_topology, check_inputs, mode_of};
pub use verify::{verify_solution, Violation};

use crate::solver::{MilpSolverKind, SolverBackend};
use crate::PlanError;
use biochain_core::data::NetworkData;
use tracing::{info, warn};

/// Solve a formulated plan.
///
/// Never fails: infeasible, unbounded and errored solves come back as a
/// [`PlanSolution`] with the matching status.
pub fn solve_plan(plan: &PlanModel, backend: &dyn SolverBackend) -> PlanSolution {
    let outcome = backend.solve(&plan.model);
    let solution = PlanSolution::from_outcome(plan, backend.id(), outcome);

    if solution.is_optimal() {
        info!(
            variant = %plan.variant,
            backend = backend.id(),
            cost = solution.total_cost,
            solve_ms = solution.solve_time_ms,
            "found optimal plan"
        );
    } else {
        warn!(
            variant = %plan.variant,
            backend = backend.id(),
            status = %solution.status,
            "no solution found"
        );
    }
    solution
}

/// Formulate and solve in one step.
///
/// # Example
///
/// ```no_run
/// use biochain_algo::plan::{plan_supply_chain, PlanParameters, ScenarioVariant};
/// use biochain_algo::solver::MilpSolverKind;
/// use biochain_core::data::NetworkData;
///
/// let data = NetworkData::new(); // load with biochain-io
/// let solution = plan_supply_chain(
///     &data,
///     &PlanParameters::default(),
///     ScenarioVariant::Hubbed,
///     MilpSolverKind::default(),
/// )?;
/// println!("{}", solution.report_line());
/// # Ok::<(), biochain_algo::PlanError>(())
/// ```
pub fn plan_supply_chain(
    data: &NetworkData,
    params: &PlanParameters,
    variant: ScenarioVariant,
    solver: MilpSolverKind,
) -> Result<PlanSolution, PlanError> {
    let plan = formulate(data, params, variant)?;
    Ok(solve_plan(&plan, solver.backend().as_ref()))
}
