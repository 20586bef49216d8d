use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use biochain_scenarios::{load_spec_from_path, resolve_scenarios, run_scenarios};
use tabwriter::TabWriter;

pub fn handle(spec: &Path, data: Option<&Path>, out_dir: Option<&Path>) -> Result<()> {
    let set = load_spec_from_path(spec)?;
    let mut scenarios = resolve_scenarios(&set)?;

    // Relative data directories are read from beside the scenario file
    if let Some(base) = spec.parent() {
        for scenario in &mut scenarios {
            if let Some(dir) = scenario.data_dir.as_mut() {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }
    }

    let results = run_scenarios(&scenarios, data, out_dir)?;

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "SCENARIO\tVARIANT\tSTATUS\tCOST")?;
    for (artifact, _) in &results {
        let cost = artifact
            .rounded_cost
            .map_or_else(|| "-".to_string(), |c| format!("${c}"));
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            artifact.scenario_id, artifact.variant, artifact.status, cost
        )?;
    }
    writer.flush()?;

    if let Some(dir) = out_dir {
        println!(
            "Manifest written to {}",
            dir.join("scenario_manifest.json").display()
        );
    }
    Ok(())
}
