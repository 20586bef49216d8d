use anyhow::{anyhow, Context, Result};
use biochain_algo::plan::{HandlingCostPolicy, ModeParameters, PlanParameters, ScenarioVariant};
use biochain_algo::MilpSolverKind;
use biochain_core::units::{Liters, LitersPerMegagram, Megagrams};
use crate::manifest::sanitize_name;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub version: Option<u32>,
    /// Data directory used by scenarios that do not name their own
    pub data_dir: Option<String>,
    #[serde(default)]
    pub defaults: ScenarioDefaults,
    #[serde(default)]
    pub scenarios: Vec<ScenarioSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioDefaults {
    pub variant: Option<ScenarioVariant>,
    pub solver: Option<String>,
    #[serde(default)]
    pub parameters: ParameterOverrides,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub scenario_id: String,
    pub description: Option<String>,
    pub variant: Option<ScenarioVariant>,
    pub solver: Option<String>,
    pub data_dir: Option<String>,
    #[serde(default)]
    pub overrides: ParameterOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeOverrides {
    pub vehicle_capacity: Option<f64>,
    pub trip_handling_cost: Option<f64>,
}

impl ModeOverrides {
    fn apply(&self, mode: &mut ModeParameters) {
        if let Some(v) = self.vehicle_capacity {
            mode.vehicle_capacity = Megagrams(v);
        }
        if let Some(v) = self.trip_handling_cost {
            mode.trip_handling_cost = v;
        }
    }
}

/// Any subset of [`PlanParameters`]; unset fields keep the value underneath.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterOverrides {
    pub truck: Option<ModeOverrides>,
    pub train: Option<ModeOverrides>,
    pub transfer_capacity: Option<f64>,
    pub transfer_activation_cost: Option<f64>,
    pub facility_capacity: Option<f64>,
    pub facility_activation_cost: Option<f64>,
    pub fuel_yield: Option<f64>,
    pub production_goal: Option<f64>,
    pub external_unit_cost: Option<f64>,
    pub handling_policy: Option<HandlingCostPolicy>,
}

impl ParameterOverrides {
    pub fn apply(&self, params: &mut PlanParameters) {
        if let Some(truck) = &self.truck {
            truck.apply(&mut params.truck);
        }
        if let Some(train) = &self.train {
            train.apply(&mut params.train);
        }
        if let Some(v) = self.transfer_capacity {
            params.transfer_capacity = Megagrams(v);
        }
        if let Some(v) = self.transfer_activation_cost {
            params.transfer_activation_cost = v;
        }
        if let Some(v) = self.facility_capacity {
            params.facility_capacity = Liters(v);
        }
        if let Some(v) = self.facility_activation_cost {
            params.facility_activation_cost = v;
        }
        if let Some(v) = self.fuel_yield {
            params.fuel_yield = LitersPerMegagram(v);
        }
        if let Some(v) = self.production_goal {
            params.production_goal = Liters(v);
        }
        if let Some(v) = self.external_unit_cost {
            params.external_unit_cost = v;
        }
        if let Some(v) = self.handling_policy {
            params.handling_policy = v;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedScenario {
    pub scenario_id: String,
    pub description: Option<String>,
    pub variant: ScenarioVariant,
    pub solver: MilpSolverKind,
    pub data_dir: Option<PathBuf>,
    pub parameters: PlanParameters,
}

/// Read a scenario set. `.json` files are parsed as JSON, anything else as
/// YAML (which also accepts JSON documents).
pub fn load_spec_from_path(path: &Path) -> Result<ScenarioSet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading scenario set '{}'", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("parsing scenario set '{}' as json", path.display()))
    } else {
        serde_yaml::from_str(&text)
            .with_context(|| format!("parsing scenario set '{}' as yaml", path.display()))
    }
}

/// Apply defaults and overrides to every scenario, in file order.
pub fn resolve_scenarios(set: &ScenarioSet) -> Result<Vec<ResolvedScenario>> {
    if set.scenarios.is_empty() {
        return Err(anyhow!("scenario set contains no scenarios"));
    }
    let defaults = &set.defaults;
    let mut ids: HashSet<&str> = HashSet::new();
    let mut dirs: HashMap<String, &str> = HashMap::new();
    let mut resolved = Vec::new();
    for scenario in &set.scenarios {
        let id = scenario.scenario_id.trim();
        if id.is_empty() {
            return Err(anyhow!("every scenario needs a non-empty scenario_id"));
        }
        if !ids.insert(id) {
            return Err(anyhow!("duplicate scenario_id '{id}' in scenario set"));
        }
        let dir = sanitize_name(id);
        if let Some(other) = dirs.insert(dir.clone(), id) {
            return Err(anyhow!(
                "scenario ids '{other}' and '{id}' share the output directory '{dir}'"
            ));
        }

        let variant = scenario.variant.or(defaults.variant).ok_or_else(|| {
            anyhow!(
                "scenario '{}' has no variant and the set declares no default",
                scenario.scenario_id
            )
        })?;

        let solver = match scenario.solver.as_deref().or(defaults.solver.as_deref()) {
            Some(name) => name.parse::<MilpSolverKind>().with_context(|| {
                format!("choosing solver for scenario '{}'", scenario.scenario_id)
            })?,
            None => MilpSolverKind::default(),
        };

        let mut parameters = PlanParameters::default();
        defaults.parameters.apply(&mut parameters);
        scenario.overrides.apply(&mut parameters);
        parameters
            .validate()
            .with_context(|| format!("parameters of scenario '{}'", scenario.scenario_id))?;

        let data_dir = scenario
            .data_dir
            .as_ref()
            .or(set.data_dir.as_ref())
            .map(PathBuf::from);

        resolved.push(ResolvedScenario {
            scenario_id: scenario.scenario_id.clone(),
            description: scenario.description.clone(),
            variant,
            solver,
            data_dir,
            parameters,
        });
    }
    Ok(resolved)
}

pub fn validate(set: &ScenarioSet) -> Result<()> {
    resolve_scenarios(set).map(|_| ())
}
