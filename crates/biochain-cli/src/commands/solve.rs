use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use biochain_algo::plan::{formulate, solve_plan};
use biochain_algo::MilpSolverKind;
use biochain_cli::PlanArgs;
use tracing::info;

use super::{load_data, parameters};

pub fn handle(
    args: &PlanArgs,
    solver: Option<MilpSolverKind>,
    out: Option<&Path>,
    detailed: bool,
) -> Result<()> {
    let data = load_data(args)?;
    let params = parameters(args);
    let solver = solver.unwrap_or_default();

    let plan = formulate(&data, &params, args.variant)
        .with_context(|| format!("formulating {} scenario", args.variant))?;
    let stats = plan.stats();
    info!(
        variant = %args.variant,
        solver = %solver,
        variables = stats.total_variables(),
        binaries = stats.binary_variables,
        constraints = stats.constraints,
        "model ready"
    );

    let backend = solver.backend();
    let solution = solve_plan(&plan, backend.as_ref());

    if detailed {
        print!("{}", solution.summary());
    } else {
        println!("{}", solution.report_line());
    }

    if let Some(path) = out {
        let json = solution.to_json().context("serializing solution")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!("solution written to {}", path.display());
    }

    Ok(())
}
