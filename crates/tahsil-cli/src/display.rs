//! Console rendering shared by the commands.

use comfy_table::{Cell, Table};

use tahsil_core::aggregate::Evaluation;
use tahsil_core::chart::ChartPoint;
use tahsil_core::projection::Projection;

const BAR_WIDTH: usize = 30;

/// One sentence describing a projection outcome for `subject`.
pub fn describe_projection(projection: &Projection, target: f64, subject: &str) -> String {
    match projection {
        Projection::AlreadySecured { .. } => {
            format!("Target {target:.2} is already secured, whatever {subject} turns out to be.")
        }
        Projection::Needed { needed } => {
            format!("To reach {target:.2} you need {needed:.2}/20 in {subject}.")
        }
        Projection::Unreachable { needed } => format!(
            "Target {target:.2} is out of reach: {subject} would need {needed:.2}/20."
        ),
        Projection::Current { average } => {
            format!("Nothing to solve for; current average is {average:.2}/20.")
        }
    }
}

pub fn subject_table(evaluation: &Evaluation) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Subject", "Coef", "Average"]);
    for s in &evaluation.subjects {
        let average = match s.average {
            Some(avg) => format!("{avg:.2}"),
            None if s.pending => "pending".to_string(),
            None => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(format!("{}", s.coefficient)),
            Cell::new(average),
        ]);
    }
    table
}

/// Horizontal bars, one per chart point.
pub fn chart_lines(points: &[ChartPoint]) -> Vec<String> {
    let width = points
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);
    points
        .iter()
        .map(|p| {
            let filled = ((p.value / p.scale_max) * BAR_WIDTH as f64)
                .round()
                .clamp(0.0, BAR_WIDTH as f64) as usize;
            let pad = width - p.label.chars().count();
            format!(
                "  {}{} {}{} {:.2}",
                p.label,
                " ".repeat(pad),
                "#".repeat(filled),
                ".".repeat(BAR_WIDTH - filled),
                p.value
            )
        })
        .collect()
}
