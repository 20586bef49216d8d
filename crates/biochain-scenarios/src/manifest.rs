use anyhow::{anyhow, Context, Result};
use biochain_algo::plan::{formulate, solve_plan, PlanSolution, ScenarioVariant};
use biochain_algo::SolveStatus;
use biochain_core::data::NetworkData;
use biochain_io::load_data_dir;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::spec::ResolvedScenario;

/// One line of a batch run's manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioArtifact {
    pub scenario_id: String,
    pub description: Option<String>,
    pub variant: ScenarioVariant,
    pub data_dir: String,
    pub status: SolveStatus,
    pub total_cost: Option<f64>,
    pub rounded_cost: Option<i64>,
    /// Per-scenario solution report, when an output directory was given
    pub solution_file: Option<String>,
}

/// Run every scenario in order, each as an independent model.
///
/// **Algorithm:**
/// 1. Load the scenario's data directory (each directory is read once).
/// 2. Formulate the scenario; configuration errors abort the whole run.
/// 3. Solve. Infeasible or unbounded scenarios are recorded, not fatal.
/// 4. With `out_dir`, write `out_dir/<scenario_id>/solution.json` and a
///    `scenario_manifest.json` listing every scenario.
///
/// **Output structure:**
/// ```text
/// out_dir/
///   scenario_manifest.json
///   <scenario_id>/
///     solution.json
/// ```
pub fn run_scenarios(
    scenarios: &[ResolvedScenario],
    default_data_dir: Option<&Path>,
    out_dir: Option<&Path>,
) -> Result<Vec<(ScenarioArtifact, PlanSolution)>> {
    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating scenario output directory '{}'", dir.display()))?;
    }

    let mut loaded: HashMap<PathBuf, NetworkData> = HashMap::new();
    let mut results = Vec::with_capacity(scenarios.len());

    for scenario in scenarios {
        let data_dir = scenario
            .data_dir
            .as_deref()
            .or(default_data_dir)
            .ok_or_else(|| {
                anyhow!(
                    "scenario '{}' has no data directory; set data_dir or pass --data",
                    scenario.scenario_id
                )
            })?
            .to_path_buf();

        if !loaded.contains_key(&data_dir) {
            let data = load_data_dir(&data_dir)?
                .into_data()
                .with_context(|| format!("loading data for scenario '{}'", scenario.scenario_id))?;
            loaded.insert(data_dir.clone(), data);
        }
        let data = loaded
            .get(&data_dir)
            .ok_or_else(|| anyhow!("data for '{}' went missing", data_dir.display()))?;

        let plan = formulate(data, &scenario.parameters, scenario.variant)
            .with_context(|| format!("formulating scenario '{}'", scenario.scenario_id))?;
        let solution = solve_plan(&plan, scenario.solver.backend().as_ref());
        info!(
            scenario = %scenario.scenario_id,
            status = %solution.status,
            "{}",
            solution.report_line()
        );

        let solution_file = match out_dir {
            Some(dir) => {
                let scenario_dir = dir.join(sanitize_name(&scenario.scenario_id));
                fs::create_dir_all(&scenario_dir).with_context(|| {
                    format!("creating scenario directory '{}'", scenario_dir.display())
                })?;
                let path = scenario_dir.join("solution.json");
                fs::write(&path, solution.to_json()?)
                    .with_context(|| format!("writing solution '{}'", path.display()))?;
                Some(path.display().to_string())
            }
            None => None,
        };

        results.push((
            ScenarioArtifact {
                scenario_id: scenario.scenario_id.clone(),
                description: scenario.description.clone(),
                variant: scenario.variant,
                data_dir: data_dir.display().to_string(),
                status: solution.status,
                total_cost: solution.total_cost,
                rounded_cost: solution.rounded_cost(),
                solution_file,
            },
            solution,
        ));
    }

    if let Some(dir) = out_dir {
        let artifacts: Vec<ScenarioArtifact> = results.iter().map(|(a, _)| a.clone()).collect();
        write_manifest(&dir.join("scenario_manifest.json"), &artifacts)?;
    }
    Ok(results)
}

pub fn write_manifest(path: &Path, artifacts: &[ScenarioArtifact]) -> Result<()> {
    let json = serde_json::to_string_pretty(artifacts).context("serializing scenario manifest")?;
    fs::write(path, json).with_context(|| format!("writing scenario manifest '{}'", path.display()))
}

pub fn load_manifest(path: &Path) -> Result<Vec<ScenarioArtifact>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading scenario manifest '{}'", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing scenario manifest '{}'", path.display()))
}

/// Directory name for a scenario id: anything outside `[A-Za-z0-9_-]` becomes `_`
pub(crate) fn sanitize_name(id: &str) -> String {
    id.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{resolve_scenarios, ScenarioSet};
    use tempfile::tempdir;

    fn write_data(dir: &Path) {
        fs::write(dir.join("suppliers.csv"), "id,supply\n1,1000\n").unwrap();
        fs::write(dir.join("plants.csv"), "id\n1\n").unwrap();
        fs::write(
            dir.join("roads_s_p.csv"),
            "origin,destination,distance,rate\n1,1,1,1\n",
        )
        .unwrap();
    }

    fn scenarios() -> Vec<ResolvedScenario> {
        let set: ScenarioSet = serde_yaml::from_str(
            r#"
defaults:
  variant: direct
  parameters:
    fuel_yield: 1
    facility_capacity: 2000
    facility_activation_cost: 100
    truck: {trip_handling_cost: 0}
scenarios:
  - scenario_id: feasible
    overrides: {production_goal: 800}
  - scenario_id: short/plant
    overrides: {production_goal: 800, facility_capacity: 500}
"#,
        )
        .unwrap();
        resolve_scenarios(&set).unwrap()
    }

    #[test]
    fn runs_each_scenario_and_writes_manifest() {
        let data = tempdir().unwrap();
        write_data(data.path());
        let out = tempdir().unwrap();

        let results = run_scenarios(&scenarios(), Some(data.path()), Some(out.path())).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.status, SolveStatus::Optimal);
        assert_eq!(results[0].0.rounded_cost, Some(900));
        assert_eq!(results[1].0.status, SolveStatus::Infeasible);

        assert!(out.path().join("short_plant/solution.json").is_file());
        let manifest = load_manifest(&out.path().join("scenario_manifest.json")).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest[1].scenario_id, "short/plant");
    }

    #[test]
    fn missing_data_dir_is_an_error() {
        let err = run_scenarios(&scenarios(), None, None).unwrap_err();
        assert!(err.to_string().contains("no data directory"));
    }
}
