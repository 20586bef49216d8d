use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use biochain_cli::ScenariosCommands;
use biochain_scenarios::{load_spec_from_path, resolve_scenarios};
use tabwriter::TabWriter;

pub fn handle(command: &ScenariosCommands) -> Result<()> {
    match command {
        ScenariosCommands::Validate { spec } => handle_validate(spec),
        ScenariosCommands::List { spec } => handle_list(spec),
    }
}

fn handle_validate(spec: &Path) -> Result<()> {
    let set = load_spec_from_path(spec)?;
    let resolved = resolve_scenarios(&set)?;
    println!(
        "Scenario set {} is valid ({} scenarios)",
        spec.display(),
        resolved.len()
    );
    Ok(())
}

fn handle_list(spec: &Path) -> Result<()> {
    let set = load_spec_from_path(spec)?;
    let resolved = resolve_scenarios(&set)?;

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "SCENARIO\tVARIANT\tSOLVER\tGOAL (L)\tHANDLING\tDATA")?;
    for scenario in &resolved {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            scenario.scenario_id,
            scenario.variant,
            scenario.solver,
            scenario.parameters.production_goal.value(),
            scenario.parameters.handling_policy.as_str(),
            scenario
                .data_dir
                .as_ref()
                .map_or_else(|| "-".to_string(), |d| d.display().to_string()),
        )?;
    }
    writer.flush()?;
    Ok(())
}
