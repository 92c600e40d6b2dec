//! The `tahsil streams` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use tahsil_core::catalog::{all_streams, extra_subjects, streams};
use tahsil_core::model::{Level, Subject};

fn total(subjects: &[Subject]) -> f64 {
    subjects.iter().map(|s| s.coefficient).sum()
}

pub fn execute(level: Option<String>) -> Result<()> {
    let list = match level {
        Some(l) => {
            let level: Level = l.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
            streams(level)
        }
        None => all_streams(),
    };

    let mut table = Table::new();
    table.set_header(vec!["Id", "Name", "Level", "Subjects", "Coef", "Exam table"]);
    for stream in &list {
        let exam = if !stream.national_exam_subjects.is_empty() {
            format!("national ({} coef)", total(&stream.national_exam_subjects))
        } else if !stream.regional_exam_subjects.is_empty() {
            format!("regional ({} coef)", total(&stream.regional_exam_subjects))
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            Cell::new(&stream.id),
            Cell::new(&stream.name),
            Cell::new(stream.level.to_string()),
            Cell::new(stream.subjects.len()),
            Cell::new(total(&stream.subjects)),
            Cell::new(exam),
        ]);
    }
    println!("{table}");

    let extras: Vec<String> = extra_subjects()
        .iter()
        .map(|s| format!("{} ({})", s.id, s.coefficient))
        .collect();
    println!("Extra subjects: {}", extras.join(", "));

    Ok(())
}
