//! The `tahsil simulate-subject` command.

use std::path::PathBuf;

use anyhow::Result;

use tahsil_advisor::load_config_from;
use tahsil_core::model::ActivitiesWeight;
use tahsil_core::projection::{Projection, SubjectSimulation, UnknownSlot};

use crate::commands::{parse_slot, resolve_target};
use crate::display::describe_projection;

pub fn execute(
    tests: String,
    activity: Option<String>,
    no_activities: bool,
    activities_weight: Option<f64>,
    target: Option<f64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let target = resolve_target(target, config.default_target)?;

    let assessments = tests
        .split(',')
        .enumerate()
        .map(|(i, t)| parse_slot(&format!("devoir {}", i + 1), t))
        .collect::<Result<Vec<_>>>()?;

    let activity = if no_activities {
        None
    } else {
        let text = activity
            .ok_or_else(|| anyhow::anyhow!("--activity is required unless --no-activities is set"))?;
        Some(parse_slot("activity", &text)?)
    };

    let activities_weight = activities_weight
        .map(ActivitiesWeight::new)
        .transpose()?
        .unwrap_or_default();

    let simulation = SubjectSimulation {
        assessments,
        activity,
        activities_weight,
    };
    let unknown = simulation.unknown_slots();
    let projection = simulation.project(target);

    let label = match unknown.as_slice() {
        [UnknownSlot::Assessment(i)] => format!("devoir {}", i + 1),
        [UnknownSlot::Activity] => "the activity mark".to_string(),
        _ => String::new(),
    };
    println!("{}", describe_projection(&projection, target, &label));
    if matches!(projection, Projection::Current { .. }) && unknown.len() > 1 {
        println!("Mark exactly one slot with '?' to solve for it; unknown slots counted as zero.");
    }

    Ok(())
}
