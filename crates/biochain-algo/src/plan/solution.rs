//! Reading solver results back in supply chain terms.

use super::formulation::PlanModel;
use super::params::ScenarioVariant;
use crate::model::{LinearExpr, VarId};
use crate::solver::{SolveOutcome, SolveStatus};
use crate::PlanError;
use biochain_core::{SiteKey, SiteKind, TransportMode};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Flow below this is treated as zero when reporting
const FLOW_EPSILON: f64 = 1e-6;

/// Cost components of an optimal plan
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub transport: f64,
    pub handling: f64,
    pub investment: f64,
    pub transport_by_mode: BTreeMap<TransportMode, f64>,
    pub handling_by_mode: BTreeMap<TransportMode, f64>,
}

/// Quantity moved on one route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteFlow {
    pub origin: SiteKey,
    pub destination: SiteKey,
    pub mode: TransportMode,
    /// Mg carried
    pub quantity: f64,
    /// Trip slots carrying flow; `None` for unquantized routes
    pub used_slots: Option<usize>,
}

/// Outcome of solving one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSolution {
    pub variant: ScenarioVariant,
    pub status: SolveStatus,
    pub backend: String,
    pub total_cost: Option<f64>,
    pub costs: Option<CostBreakdown>,
    pub built_transfers: Vec<SiteKey>,
    pub built_facilities: Vec<SiteKey>,
    pub flows: Vec<RouteFlow>,
    /// Mg reaching plants
    pub delivered: f64,
    /// Mg plants must receive
    pub goal: f64,
    /// Mg bought from the external market
    pub external_purchase: f64,
    pub solve_time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Raw assignment, one value per model variable
    #[serde(skip)]
    pub assignment: Option<Vec<f64>>,
}

impl PlanSolution {
    pub fn from_outcome(plan: &PlanModel, backend: &str, outcome: SolveOutcome) -> Self {
        let mut solution = Self {
            variant: plan.variant,
            status: outcome.status,
            backend: backend.to_string(),
            total_cost: None,
            costs: None,
            built_transfers: Vec::new(),
            built_facilities: Vec::new(),
            flows: Vec::new(),
            delivered: 0.0,
            goal: plan.params.goal_mass().value(),
            external_purchase: 0.0,
            solve_time_ms: outcome.solve_time.as_secs_f64() * 1000.0,
            message: outcome.message,
            assignment: None,
        };

        let (SolveStatus::Optimal, Some(values)) = (outcome.status, outcome.values) else {
            return solution;
        };

        let value = |var: VarId| values.get(var.index()).copied().unwrap_or(0.0);
        let eval = |expr: &LinearExpr| expr.evaluate(&values);
        let by_mode = |parts: &BTreeMap<TransportMode, LinearExpr>| {
            parts.iter().map(|(mode, e)| (*mode, eval(e))).collect()
        };
        let costs = CostBreakdown {
            transport: eval(&plan.objective.transport),
            handling: eval(&plan.objective.handling),
            investment: eval(&plan.objective.investment),
            transport_by_mode: by_mode(&plan.objective.transport_by_mode),
            handling_by_mode: by_mode(&plan.objective.handling_by_mode),
        };
        solution.total_cost = outcome
            .objective_value
            .or(Some(costs.transport + costs.handling + costs.investment));
        solution.costs = Some(costs);

        for decision in plan.decisions.iter() {
            if value(decision.var) > 0.5 {
                match decision.site.kind {
                    SiteKind::Transfer => solution.built_transfers.push(decision.site),
                    _ => solution.built_facilities.push(decision.site),
                }
            }
        }

        for allocation in plan.flows.iter() {
            let route = &plan.network.graph[allocation.route];
            let quantity = allocation.throughput().evaluate(&values);
            let used_slots = allocation.is_quantized().then(|| {
                allocation
                    .slots
                    .iter()
                    .filter(|slot| value(**slot) > FLOW_EPSILON)
                    .count()
            });
            if route.destination.kind == SiteKind::Facility {
                solution.delivered += quantity;
            }
            if route.origin.kind == SiteKind::ExternalSource {
                solution.external_purchase += quantity;
            }
            if quantity > FLOW_EPSILON {
                solution.flows.push(RouteFlow {
                    origin: route.origin,
                    destination: route.destination,
                    mode: route.mode,
                    quantity,
                    used_slots,
                });
            }
        }

        solution.assignment = Some(values);
        solution
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    /// Total cost rounded to the nearest currency unit
    pub fn rounded_cost(&self) -> Option<i64> {
        self.total_cost.map(|c| c.round() as i64)
    }

    /// One-line console result
    pub fn report_line(&self) -> String {
        match self.rounded_cost() {
            Some(cost) if self.is_optimal() => format!("Minimal Total Cost: ${cost}"),
            _ => "No solution found.".to_string(),
        }
    }

    /// Human-readable multi-line report
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Scenario: {} ({} via {})", self.variant, self.status, self.backend);
        let _ = writeln!(out, "{}", self.report_line());
        if let Some(msg) = &self.message {
            let _ = writeln!(out, "Solver message: {msg}");
        }
        let Some(costs) = &self.costs else {
            return out;
        };

        let _ = writeln!(out, "  Transport:  {:.2}", costs.transport);
        for (mode, cost) in &costs.transport_by_mode {
            let _ = writeln!(out, "    {:<6} {:.2}", mode.as_str(), cost);
        }
        let _ = writeln!(out, "  Handling:   {:.2}", costs.handling);
        for (mode, cost) in &costs.handling_by_mode {
            let _ = writeln!(out, "    {:<6} {:.2}", mode.as_str(), cost);
        }
        let _ = writeln!(out, "  Investment: {:.2}", costs.investment);
        let _ = writeln!(out, "Delivered: {:.2} Mg (goal {:.2} Mg)", self.delivered, self.goal);
        if self.external_purchase > FLOW_EPSILON {
            let _ = writeln!(out, "External purchase: {:.2} Mg", self.external_purchase);
        }
        if !self.built_transfers.is_empty() {
            let _ = writeln!(out, "Built hubs: {}", join(&self.built_transfers));
        }
        let _ = writeln!(out, "Built plants: {}", join(&self.built_facilities));
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// `Err(PlanError::SolverStatus)` unless optimal
    pub fn into_result(self) -> Result<Self, PlanError> {
        if self.is_optimal() {
            Ok(self)
        } else {
            Err(PlanError::SolverStatus(self.status))
        }
    }
}

fn join(keys: &[SiteKey]) -> String {
    if keys.is_empty() {
        return "none".to_string();
    }
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
