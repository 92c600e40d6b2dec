//! The `tahsil simulate-bac` command.

use std::path::PathBuf;

use anyhow::Result;

use tahsil_advisor::load_config_from;
use tahsil_core::aggregate::Pillar;
use tahsil_core::projection::PillarSimulation;

use crate::commands::{parse_slot, resolve_target};
use crate::display::describe_projection;

pub fn execute(
    national: String,
    regional: String,
    continuous: String,
    target: Option<f64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let target = resolve_target(target, config.default_target)?;

    let simulation = PillarSimulation {
        national: parse_slot("national", &national)?,
        regional: parse_slot("regional", &regional)?,
        continuous: parse_slot("continuous", &continuous)?,
    };
    let projection = simulation.project(target)?;

    let unknown: Vec<&str> = Pillar::ALL
        .iter()
        .filter(|p| simulation.slot(**p).is_unknown())
        .map(|p| p.as_str())
        .collect();
    let label = match unknown.as_slice() {
        [one] => format!("the {one} mark"),
        many => format!("each of the {} marks", many.join(" and ")),
    };
    println!("{}", describe_projection(&projection, target, &label));

    Ok(())
}
