//! Formulation and solve errors.

use crate::solver::SolveStatus;
use biochain_core::BiochainError;
use thiserror::Error;

/// Failures raised while turning network data into a model, or while
/// reading a solver verdict back.
///
/// `Configuration` and `ModelBuild` abort before the solver is called.
/// `SolverStatus` is never produced by [`crate::plan::solve_plan`] itself:
/// a non-optimal verdict is a valid outcome and is reported on the
/// [`crate::plan::PlanSolution`]. Use [`crate::plan::PlanSolution::into_result`]
/// to turn it into this error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Malformed or inconsistent network data or parameters
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An internal invariant broke while assembling the model
    #[error("model build error: {0}")]
    ModelBuild(String),

    /// The solver finished without an optimal assignment
    #[error("no solution found: solver reported {0}")]
    SolverStatus(SolveStatus),
}

impl From<PlanError> for BiochainError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::Configuration(msg) => BiochainError::Configuration(msg),
            PlanError::ModelBuild(msg) => BiochainError::ModelBuild(msg),
            PlanError::SolverStatus(status) => BiochainError::Solver(status.to_string()),
        }
    }
}
