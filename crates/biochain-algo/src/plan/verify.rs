//! Independent re-check of a solved plan.
//!
//! Checks variable bounds and integrality, every model constraint, and then
//! recomputes transfer balance, global balance and the production goal
//! directly from the flow allocations rather than trusting the constraint
//! rows.

use super::constraints::{facility_inflow, supply_outflow};
use super::formulation::PlanModel;
use super::solution::PlanSolution;
use crate::model::VarKind;
use biochain_core::SiteKind;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// What was checked (variable, constraint or property name)
    pub subject: String,
    pub amount: f64,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} violated by {:.6}", self.subject, self.amount)
    }
}

/// All violations of `solution` against `plan`; empty when the solution
/// holds up within `tolerance`.
pub fn verify_solution(
    plan: &PlanModel,
    solution: &PlanSolution,
    tolerance: f64,
) -> Vec<Violation> {
    let Some(values) = solution.assignment.as_deref() else {
        return vec![Violation {
            subject: format!("assignment ({} solution has none)", solution.status),
            amount: f64::INFINITY,
        }];
    };

    let mut violations = Vec::new();
    let mut flag = |subject: String, amount: f64| {
        if amount > tolerance {
            violations.push(Violation { subject, amount });
        }
    };

    if values.len() != plan.model.num_variables() {
        flag(
            format!(
                "assignment length ({} values for {} variables)",
                values.len(),
                plan.model.num_variables()
            ),
            (values.len() as f64 - plan.model.num_variables() as f64).abs(),
        );
        return violations;
    }

    for (def, value) in plan.model.variables().iter().zip(values) {
        flag(format!("lower bound of {}", def.name), def.lower - value);
        if let Some(upper) = def.upper {
            flag(format!("upper bound of {}", def.name), value - upper);
        }
        if def.kind == VarKind::Binary {
            flag(format!("integrality of {}", def.name), (value - value.round()).abs());
        }
    }

    for constraint in plan.model.constraints() {
        flag(constraint.name.clone(), constraint.violation(values));
    }

    for site in plan.network.sites_of_kind(SiteKind::Transfer) {
        let balance = plan
            .flows
            .inflow(&plan.network, &site.key)
            .and_then(|inflow| Ok(inflow - plan.flows.outflow(&plan.network, &site.key)?));
        if let Ok(expr) = balance {
            flag(format!("flow conservation at {}", site.key), expr.evaluate(values).abs());
        }
    }

    if let (Ok(shipped), Ok(delivered)) = (
        supply_outflow(&plan.network, &plan.flows),
        facility_inflow(&plan.network, &plan.flows),
    ) {
        let shipped = shipped.evaluate(values);
        let delivered = delivered.evaluate(values);
        flag("global mass balance".to_string(), (shipped - delivered).abs());
        flag(
            "production goal".to_string(),
            plan.params.goal_mass().value() - delivered,
        );
    }

    violations
}
