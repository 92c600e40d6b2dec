//! The `tahsil compute` command.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use tahsil_advisor::load_config_from;
use tahsil_core::aggregate::Evaluation;
use tahsil_core::chart::{chart_points, ChartPoint};
use tahsil_core::distinction::Distinction;
use tahsil_core::parser::parse_sheet;
use tahsil_core::projection::{project_pending, Projection};

use crate::commands::resolve_target;
use crate::display::{chart_lines, describe_projection, subject_table};

#[derive(Serialize)]
struct ComputeOutput<'a> {
    evaluation: &'a Evaluation,
    distinction: Distinction,
    chart: Vec<ChartPoint>,
    target: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    projection: Option<Projection>,
}

pub fn execute(
    sheet_path: PathBuf,
    target: Option<f64>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let sheet = parse_sheet(&sheet_path)?;
    let target = resolve_target(target.or(sheet.target), config.default_target)?;

    let evaluation = sheet.evaluate()?;
    let projection = evaluation
        .has_pending()
        .then(|| project_pending(target, &evaluation.summary));
    info!(
        sheet = %sheet_path.display(),
        mode = %evaluation.mode,
        average = evaluation.final_average,
        "computed average"
    );

    let output = ComputeOutput {
        evaluation: &evaluation,
        distinction: evaluation.distinction(),
        chart: chart_points(&evaluation),
        target,
        projection,
    };

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            // text format
            match &sheet.stream {
                Some(stream) => println!("Mode: {} ({})", evaluation.mode, stream.name),
                None => println!("Mode: {}", evaluation.mode),
            }
            println!("{}", subject_table(&evaluation));
            println!(
                "Average: {:.2}/20 ({})",
                evaluation.final_average, output.distinction
            );

            if evaluation.has_pending() {
                let names: Vec<&str> = evaluation.pending.iter().map(|s| s.name.as_str()).collect();
                println!(
                    "\nPending ({} coefficient(s)): {}",
                    evaluation.summary.pending_coefficients(),
                    names.join(", ")
                );
                println!("The average above counts pending subjects as zero.");
                if let Some(p) = &output.projection {
                    println!("{}", describe_projection(p, target, "each pending subject"));
                }
            }

            if !output.chart.is_empty() {
                println!("\nChart:");
                for line in chart_lines(&output.chart) {
                    println!("{line}");
                }
            }
        }
    }

    Ok(())
}
