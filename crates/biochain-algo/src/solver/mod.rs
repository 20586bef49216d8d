//! Solver interface.
//!
//! The formulation never solves anything itself. It hands a finished
//! [`Model`] to a [`SolverBackend`] and gets back a [`SolveOutcome`]: a
//! status, and for optimal results the objective value and one value per
//! variable. Backends never fail with an error; a broken solve is reported
//! as [`SolveStatus::Error`] with a message.

mod good_lp_backend;

pub use good_lp_backend::GoodLpBackend;

use crate::model::Model;
use crate::PlanError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

#[cfg(not(any(feature = "solver-microlp", feature = "solver-highs")))]
compile_error!("enable at least one of the `solver-microlp` or `solver-highs` features");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error,
}

impl SolveStatus {
    pub fn is_optimal(self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a backend reports back
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    /// Objective value, present only when optimal
    pub objective_value: Option<f64>,
    /// One value per model variable, present only when optimal
    pub values: Option<Vec<f64>>,
    pub solve_time: Duration,
    /// Backend message for `Error` verdicts
    pub message: Option<String>,
}

impl SolveOutcome {
    pub fn optimal(objective_value: f64, values: Vec<f64>, solve_time: Duration) -> Self {
        Self {
            status: SolveStatus::Optimal,
            objective_value: Some(objective_value),
            values: Some(values),
            solve_time,
            message: None,
        }
    }

    pub fn without_solution(status: SolveStatus, solve_time: Duration) -> Self {
        Self {
            status,
            objective_value: None,
            values: None,
            solve_time,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Anything that can solve a [`Model`].
pub trait SolverBackend {
    /// Short identifier (e.g. "microlp", "highs")
    fn id(&self) -> &str;

    /// Solve synchronously. Blocks until the backend reaches a verdict.
    fn solve(&self, model: &Model) -> SolveOutcome;
}

/// MILP backends compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MilpSolverKind {
    #[cfg(feature = "solver-microlp")]
    Microlp,
    #[cfg(feature = "solver-highs")]
    Highs,
}

#[allow(clippy::derivable_impls)]
impl Default for MilpSolverKind {
    fn default() -> Self {
        #[cfg(feature = "solver-microlp")]
        {
            MilpSolverKind::Microlp
        }
        #[cfg(not(feature = "solver-microlp"))]
        {
            MilpSolverKind::Highs
        }
    }
}

const AVAILABLE_MILP_SOLVERS: &[&str] = &[
    #[cfg(feature = "solver-microlp")]
    "microlp",
    #[cfg(feature = "solver-highs")]
    "highs",
];

impl MilpSolverKind {
    pub fn available() -> &'static [&'static str] {
        AVAILABLE_MILP_SOLVERS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            #[cfg(feature = "solver-microlp")]
            MilpSolverKind::Microlp => "microlp",
            #[cfg(feature = "solver-highs")]
            MilpSolverKind::Highs => "highs",
        }
    }

    pub fn backend(self) -> Box<dyn SolverBackend> {
        match self {
            #[cfg(feature = "solver-microlp")]
            MilpSolverKind::Microlp => Box::new(GoodLpBackend::new(
                "microlp",
                good_lp::solvers::microlp::microlp,
            )),
            #[cfg(feature = "solver-highs")]
            MilpSolverKind::Highs => {
                Box::new(GoodLpBackend::new("highs", good_lp::solvers::highs::highs))
            }
        }
    }
}

fn unknown_solver_error(label: &str) -> PlanError {
    PlanError::Configuration(format!(
        "unknown milp solver '{}'; supported values: {}",
        label,
        MilpSolverKind::available().join(", ")
    ))
}

impl FromStr for MilpSolverKind {
    type Err = PlanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.to_ascii_lowercase();
        match normalized.as_str() {
            "microlp" => {
                #[cfg(feature = "solver-microlp")]
                {
                    Ok(MilpSolverKind::Microlp)
                }
                #[cfg(not(feature = "solver-microlp"))]
                {
                    Err(unknown_solver_error(&normalized))
                }
            }
            "highs" => {
                #[cfg(feature = "solver-highs")]
                {
                    Ok(MilpSolverKind::Highs)
                }
                #[cfg(not(feature = "solver-highs"))]
                {
                    Err(unknown_solver_error(&normalized))
                }
            }
            other => Err(unknown_solver_error(other)),
        }
    }
}

impl std::fmt::Display for MilpSolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_solver_lists_available() {
        let err = "gurobi".parse::<MilpSolverKind>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("gurobi"));
        for name in MilpSolverKind::available() {
            assert!(msg.contains(name));
        }
    }

    #[test]
    fn test_default_round_trips_through_name() {
        let kind = MilpSolverKind::default();
        assert_eq!(kind.as_str().parse::<MilpSolverKind>().unwrap(), kind);
        assert_eq!(kind.backend().id(), kind.as_str());
    }

    #[cfg(feature = "solver-microlp")]
    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "MicroLP".parse::<MilpSolverKind>().unwrap(),
            MilpSolverKind::Microlp
        );
    }
}
