//! The `tahsil bac` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;

use tahsil_advisor::{create_advisor, load_config_from};
use tahsil_core::aggregate::{evaluate, AggregateInput, ContinuousPillar, Evaluation, Pillar, PillarMarks};
use tahsil_core::catalog::find_stream;
use tahsil_core::distinction::Distinction;
use tahsil_core::model::{GradeMap, ScoringMode};
use tahsil_core::traits::{SchoolSuggestions, SuggestionRequest};

use crate::commands::check_mark;

pub struct BacArgs {
    pub national: f64,
    pub regional: f64,
    pub continuous: Option<f64>,
    pub s1: Option<f64>,
    pub s2: Option<f64>,
    pub suggest: bool,
    pub stream: Option<String>,
    pub year: Option<String>,
    pub format: String,
}

#[derive(Serialize)]
struct BacOutput<'a> {
    evaluation: &'a Evaluation,
    distinction: Distinction,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestions: Option<SchoolSuggestions>,
}

pub async fn execute(args: BacArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let continuous = match args.continuous {
        Some(mark) => ContinuousPillar::Annual {
            mark: Some(check_mark("continuous", mark)?),
        },
        None => ContinuousPillar::Semesters {
            s1: args.s1.map(|m| check_mark("s1", m)).transpose()?,
            s2: args.s2.map(|m| check_mark("s2", m)).transpose()?,
        },
    };
    let pillars = PillarMarks {
        national: Some(check_mark("national", args.national)?),
        regional: Some(check_mark("regional", args.regional)?),
        continuous,
    };

    let grades = GradeMap::new();
    let evaluation =
        evaluate(&AggregateInput::new(ScoringMode::GeneralBac, &[], &grades).with_pillars(&pillars))?;

    let suggestions = match (args.suggest, &args.stream) {
        (true, Some(stream_id)) => {
            let stream = find_stream(stream_id)?;
            let year = args
                .year
                .clone()
                .unwrap_or_else(|| chrono::Local::now().year().to_string());
            let advisor = create_advisor(&config.backend)?;
            let request = SuggestionRequest::from_evaluation(&evaluation, stream.name, year, config.lang);
            Some(advisor.suggest_schools(&request).await?)
        }
        _ => None,
    };

    let output = BacOutput {
        evaluation: &evaluation,
        distinction: evaluation.distinction(),
        suggestions,
    };

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            for pillar in Pillar::ALL {
                let mark = pillars.get(pillar).unwrap_or_default();
                println!(
                    "  {:<10} {:>6.2} x {:.2}",
                    pillar.as_str(),
                    mark,
                    pillar.weight()
                );
            }
            println!(
                "Average: {:.2}/20 ({})",
                evaluation.final_average, output.distinction
            );

            if let Some(s) = &output.suggestions {
                println!("\n{}", s.summary);
                for school in &s.suggested_schools {
                    println!("  [{}] {}: {}", school.chance, school.name, school.description);
                }
            }
        }
    }

    Ok(())
}
