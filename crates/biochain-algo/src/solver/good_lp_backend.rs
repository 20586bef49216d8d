//! [`SolverBackend`] on top of `good_lp`.

use super::{SolveOutcome, SolveStatus, SolverBackend};
use crate::model::{LinearExpr, Model, Sense, VarKind};
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, Solver,
    SolverModel, Variable,
};
use std::time::Instant;
use tracing::debug;

/// Translates a [`Model`] into `good_lp` calls and solves it with `S`.
#[derive(Debug, Clone)]
pub struct GoodLpBackend<S> {
    id: &'static str,
    solver: S,
}

impl<S> GoodLpBackend<S> {
    pub fn new(id: &'static str, solver: S) -> Self {
        Self { id, solver }
    }
}

impl<S> SolverBackend for GoodLpBackend<S>
where
    S: Solver + Clone,
    S::Model: SolverModel<Error = ResolutionError>,
{
    fn id(&self) -> &str {
        self.id
    }

    fn solve(&self, model: &Model) -> SolveOutcome {
        let start = Instant::now();

        let mut problem = ProblemVariables::new();
        let vars: Vec<Variable> = model
            .variables()
            .iter()
            .map(|def| {
                let definition = match def.kind {
                    VarKind::Binary => variable().binary(),
                    VarKind::Continuous => {
                        let base = variable().min(def.lower);
                        match def.upper {
                            Some(upper) => base.max(upper),
                            None => base,
                        }
                    }
                };
                problem.add(definition.name(def.name.clone()))
            })
            .collect();

        let objective = to_expression(model.objective(), &vars);
        let mut solver_model = problem.minimise(objective).using(self.solver.clone());

        for c in model.constraints() {
            let lhs = to_expression(&c.expr, &vars);
            let rhs = Expression::from(c.rhs);
            let translated = match c.sense {
                Sense::Le => constraint::leq(lhs, rhs),
                Sense::Ge => constraint::geq(lhs, rhs),
                Sense::Eq => constraint::eq(lhs, rhs),
            };
            solver_model = solver_model.with(translated);
        }

        debug!(
            backend = self.id,
            variables = vars.len(),
            constraints = model.constraints().len(),
            "handing model to solver"
        );

        match solver_model.solve() {
            Ok(solution) => {
                let values: Vec<f64> = vars.iter().map(|v| solution.value(*v)).collect();
                let objective_value = model.objective().evaluate(&values);
                SolveOutcome::optimal(objective_value, values, start.elapsed())
            }
            Err(ResolutionError::Infeasible) => {
                SolveOutcome::without_solution(SolveStatus::Infeasible, start.elapsed())
            }
            Err(ResolutionError::Unbounded) => {
                SolveOutcome::without_solution(SolveStatus::Unbounded, start.elapsed())
            }
            Err(other) => SolveOutcome::without_solution(SolveStatus::Error, start.elapsed())
                .with_message(other.to_string()),
        }
    }
}

fn to_expression(expr: &LinearExpr, vars: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant);
    for (id, coef) in &expr.terms {
        out += *coef * vars[id.index()];
    }
    out
}

#[cfg(all(test, feature = "solver-microlp"))]
mod tests {
    use super::*;
    use crate::model::{Constraint, ConstraintFamily, ModelBuilder, VariableDef};
    use crate::solver::MilpSolverKind;

    fn backend() -> Box<dyn SolverBackend> {
        MilpSolverKind::Microlp.backend()
    }

    #[test]
    fn test_binary_gate_is_respected() {
        // min 3x + 10y  s.t.  x >= 4,  x <= 5y
        let mut builder = ModelBuilder::new();
        let x = builder.add_variable(VariableDef::continuous("x", 0.0, None));
        let y = builder.add_variable(VariableDef::binary("y"));
        builder
            .set_objective(LinearExpr::term(x, 3.0).plus_term(y, 10.0))
            .unwrap();
        builder
            .add_constraint(Constraint::new(
                "demand",
                ConstraintFamily::ProductionGoal,
                LinearExpr::term(x, 1.0),
                Sense::Ge,
                4.0,
            ))
            .unwrap();
        builder
            .add_constraint(Constraint::new(
                "gate",
                ConstraintFamily::FacilityThroughput,
                LinearExpr::term(x, 1.0).plus_term(y, -5.0),
                Sense::Le,
                0.0,
            ))
            .unwrap();

        let outcome = backend().solve(&builder.build());
        assert_eq!(outcome.status, SolveStatus::Optimal);
        let values = outcome.values.unwrap();
        assert!((values[0] - 4.0).abs() < 1e-6);
        assert!((values[1] - 1.0).abs() < 1e-6);
        assert!((outcome.objective_value.unwrap() - 22.0).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible_is_reported_not_raised() {
        let mut builder = ModelBuilder::new();
        let x = builder.add_variable(VariableDef::continuous("x", 0.0, Some(1.0)));
        builder.set_objective(LinearExpr::term(x, 1.0)).unwrap();
        builder
            .add_constraint(Constraint::new(
                "too much",
                ConstraintFamily::ProductionGoal,
                LinearExpr::term(x, 1.0),
                Sense::Ge,
                2.0,
            ))
            .unwrap();

        let outcome = backend().solve(&builder.build());
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(outcome.values.is_none());
    }
}
