//! The `tahsil template` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use tahsil_advisor::load_config_from;
use tahsil_core::parser::parse_sheet;
use tahsil_core::template::{FileTemplateStore, Template, TemplateKind, TemplateStore};

fn open_store(config_path: Option<PathBuf>) -> Result<FileTemplateStore> {
    let config = load_config_from(config_path.as_deref())?;
    Ok(FileTemplateStore::new(config.template_dir))
}

fn parse_kind(kind: &str) -> Result<TemplateKind> {
    kind.parse().map_err(|e: String| anyhow::anyhow!("{}", e))
}

pub fn save(sheet_path: PathBuf, with_grades: bool, config_path: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path)?;
    let sheet = parse_sheet(&sheet_path)?;
    let kind = TemplateKind::for_mode(sheet.mode).with_context(|| {
        format!("only custom sheets can be saved as templates, got {}", sheet.mode)
    })?;

    let grades = with_grades.then(|| sheet.grades.clone());
    let template = Template::new(kind, sheet.subjects.clone(), sheet.activities_weight, grades)?;
    store.save(&template)?;

    println!(
        "Saved {kind} template with {} subject(s) to {}",
        template.subjects.len(),
        store.path_for(kind).display()
    );
    Ok(())
}

pub fn show(kind: String, config_path: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path)?;
    let kind = parse_kind(&kind)?;

    let Some(template) = store.load(kind)? else {
        println!("No {kind} template saved.");
        return Ok(());
    };

    println!(
        "Template {} ({kind}), saved {}",
        template.id,
        template.saved_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("Activities weight: {}", template.activities_weight.value());

    let grades = template.grade_map();
    let mut table = Table::new();
    table.set_header(vec!["Id", "Name", "Coef", "Activities", "Marks"]);
    for subject in &template.subjects {
        let marks = grades
            .get(&subject.id)
            .map(|d| {
                d.assessments
                    .iter()
                    .map(|a| a.value.map(|v| format!("{v}")).unwrap_or_else(|| "_".into()))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&subject.id),
            Cell::new(&subject.name),
            Cell::new(subject.coefficient),
            Cell::new(if subject.has_activities { "yes" } else { "no" }),
            Cell::new(marks),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn remove(kind: String, config_path: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path)?;
    let kind = parse_kind(&kind)?;
    store.remove(kind)?;
    println!("Removed {kind} template.");
    Ok(())
}
