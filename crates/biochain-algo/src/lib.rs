//! # biochain-algo: Supply Chain Formulation Engine
//!
//! Turns [`biochain_core::data::NetworkData`] into a mixed-integer linear
//! program for biomass-to-fuel supply chain design, solves it through a
//! pluggable backend and reads the result back.
//!
//! ## Modules
//!
//! - [`model`] - Solver-neutral variables, expressions and constraints
//! - [`plan`] - Topology, trip-slot flows, facility decisions, constraints,
//!   objective, solution report and verification
//! - [`solver`] - [`solver::SolverBackend`] trait and the `good_lp` backends
//!
//! ## Quick Start
//!
//! ```no_run
//! use biochain_algo::plan::{formulate, solve_plan, PlanParameters, ScenarioVariant};
//! use biochain_algo::solver::MilpSolverKind;
//! use biochain_core::data::{ArcRecord, ArcSet, NetworkData};
//!
//! let data = NetworkData::new()
//!     .with_source(1, 1000.0)
//!     .with_facility(1)
//!     .with_arc(ArcSet::SourceToFacility, ArcRecord::new(1, 1, 12.0, 9.0));
//!
//! let plan = formulate(&data, &PlanParameters::default(), ScenarioVariant::Direct)?;
//! println!("{}", plan.stats());
//!
//! let solution = solve_plan(&plan, MilpSolverKind::default().backend().as_ref());
//! println!("{}", solution.report_line());
//! # Ok::<(), biochain_algo::PlanError>(())
//! ```

pub mod error;
pub mod model;
pub mod plan;
pub mod solver;

pub use error::PlanError;
pub use plan::{
    formulate, plan_supply_chain, solve_plan, verify_solution, HandlingCostPolicy, PlanModel,
    PlanParameters, PlanSolution, ScenarioVariant,
};
pub use solver::{MilpSolverKind, SolveStatus, SolverBackend};
