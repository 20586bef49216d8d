use std::path::Path;

use anyhow::{bail, Result};
use biochain_algo::plan::{check_inputs, PlanParameters, ScenarioVariant};
use biochain_io::load_data_dir;

pub fn handle(data: &Path, variant: Option<ScenarioVariant>) -> Result<()> {
    let mut result = load_data_dir(data)?;
    if let Some(variant) = variant {
        // check_inputs re-runs data validation, so start from the parse issues only
        result
            .diagnostics
            .issues
            .retain(|issue| issue.category == "parse");
        check_inputs(
            &result.data,
            &PlanParameters::default(),
            variant,
            &mut result.diagnostics,
        );
    }

    let stats = &result.stats;
    println!(
        "Loaded {} suppliers, {} hubs, {} plants, {} arcs ({} lines skipped)",
        stats.sources, stats.transfers, stats.facilities, stats.arcs, stats.skipped_lines
    );
    print!("{}", result.diagnostics);

    if result.diagnostics.has_errors() {
        bail!(
            "data set '{}' has {}",
            data.display(),
            result.diagnostics.summary()
        );
    }
    Ok(())
}
