//! The `tahsil analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use tahsil_advisor::{create_advisor, load_config_from};
use tahsil_core::model::Lang;
use tahsil_core::parser::parse_sheet;
use tahsil_core::traits::{AnalysisRequest, GradeAnalysis, SchoolSuggestions, SuggestionRequest};

pub async fn execute(
    sheet_path: PathBuf,
    lang: Option<String>,
    year: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let sheet = parse_sheet(&sheet_path)?;
    let lang: Lang = match lang {
        Some(l) => l.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?,
        None => sheet.lang.unwrap_or(config.lang),
    };
    let stream = sheet
        .stream
        .as_ref()
        .map(|s| s.name.clone())
        .unwrap_or_else(|| "custom".to_string());

    let advisor = create_advisor(&config.backend)?;
    let request = AnalysisRequest {
        grades: sheet.grades.clone(),
        stream: stream.clone(),
        level: sheet.level,
        lang,
    };
    info!(advisor = advisor.name(), %stream, "requesting analysis");

    let (analysis, suggestions) = match year {
        Some(year) => {
            let evaluation = sheet.evaluate()?;
            let suggestion = SuggestionRequest::from_evaluation(&evaluation, &stream, year, lang);
            let (analysis, suggestions) = futures::try_join!(
                advisor.analyze_grades(&request),
                advisor.suggest_schools(&suggestion)
            )?;
            (analysis, Some(suggestions))
        }
        None => (advisor.analyze_grades(&request).await?, None),
    };

    print_analysis(&analysis);
    if let Some(s) = suggestions {
        print_suggestions(&s);
    }

    Ok(())
}

fn print_analysis(analysis: &GradeAnalysis) {
    println!("{}", analysis.summary);
    for (title, items) in [
        ("Strengths", &analysis.strengths),
        ("Weaknesses", &analysis.weaknesses),
        ("Plan", &analysis.plan),
    ] {
        if items.is_empty() {
            continue;
        }
        println!("\n{title}:");
        for item in items {
            println!("  - {item}");
        }
    }
    if !analysis.prediction.is_empty() {
        println!("\nPrediction: {}", analysis.prediction);
    }
}

fn print_suggestions(suggestions: &SchoolSuggestions) {
    println!("\n{}", suggestions.summary);
    for school in &suggestions.suggested_schools {
        println!("  [{}] {}: {}", school.chance, school.name, school.description);
    }
}
