pub mod manifest;
pub mod spec;

pub use manifest::{load_manifest, run_scenarios, write_manifest, ScenarioArtifact};
pub use spec::{
    load_spec_from_path, resolve_scenarios, validate, ModeOverrides, ParameterOverrides,
    ResolvedScenario, ScenarioDefaults, ScenarioSet, ScenarioSpec,
};
