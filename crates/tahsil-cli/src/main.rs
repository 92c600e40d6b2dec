//! tahsil CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod display;

#[derive(Parser)]
#[command(
    name = "tahsil",
    version,
    about = "Moroccan baccalaureate average calculator and goal planner"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the average of a grade sheet
    Compute {
        /// Path to a .toml grade sheet
        #[arg(long)]
        sheet: PathBuf,

        /// Target average for the pending-subject projection
        #[arg(long)]
        target: Option<f64>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// General baccalaureate average from the three pillars
    Bac {
        /// National exam mark
        #[arg(long)]
        national: f64,

        /// Regional exam mark
        #[arg(long)]
        regional: f64,

        /// Annual continuous-assessment mark
        #[arg(long, conflicts_with_all = ["s1", "s2"], required_unless_present = "s1")]
        continuous: Option<f64>,

        /// First-semester mark
        #[arg(long, requires = "s2")]
        s1: Option<f64>,

        /// Second-semester mark
        #[arg(long, requires = "s1")]
        s2: Option<f64>,

        /// Ask the backend for school suggestions
        #[arg(long, requires = "stream")]
        suggest: bool,

        /// Stream id used for suggestions (e.g. "pc")
        #[arg(long)]
        stream: Option<String>,

        /// Exam year used for suggestions (defaults to the current year)
        #[arg(long)]
        year: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Mark still needed in one assessment slot of a subject
    SimulateSubject {
        /// Assessment marks, comma-separated; "?" marks the unknown (e.g. "12,?")
        #[arg(long)]
        tests: String,

        /// Activity mark, or "?" when it is the unknown
        #[arg(long, conflicts_with = "no_activities")]
        activity: Option<String>,

        /// The subject has no activities
        #[arg(long)]
        no_activities: bool,

        /// Activity share for custom modes (strictly between 0 and 1)
        #[arg(long)]
        activities_weight: Option<f64>,

        /// Target subject average
        #[arg(long)]
        target: Option<f64>,
    },

    /// Pillar marks still needed for a general-bac target
    SimulateBac {
        /// National exam mark, or "?"
        #[arg(long)]
        national: String,

        /// Regional exam mark, or "?"
        #[arg(long)]
        regional: String,

        /// Continuous-assessment mark, or "?"
        #[arg(long)]
        continuous: String,

        /// Target final average
        #[arg(long)]
        target: Option<f64>,
    },

    /// Ask the backend to analyze a grade sheet
    Analyze {
        /// Path to a .toml grade sheet
        #[arg(long)]
        sheet: PathBuf,

        /// Answer language: ar, fr
        #[arg(long)]
        lang: Option<String>,

        /// Also fetch school suggestions for this exam year
        #[arg(long)]
        year: Option<String>,
    },

    /// List the built-in streams
    Streams {
        /// Filter by level: 1ere_bac, 2eme_bac
        #[arg(long)]
        level: Option<String>,
    },

    /// Save or show custom-mode templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Create starter config and example grade sheet
    Init,
}

#[derive(Subcommand)]
enum TemplateAction {
    /// Save the curriculum of a custom sheet
    Save {
        /// Path to a custom-mode .toml grade sheet
        #[arg(long)]
        sheet: PathBuf,

        /// Keep the sheet's marks in the template
        #[arg(long)]
        with_grades: bool,
    },

    /// Show a saved template
    Show {
        /// Template kind: continuous, exam
        #[arg(long)]
        kind: String,
    },

    /// Delete a saved template
    Remove {
        /// Template kind: continuous, exam
        #[arg(long)]
        kind: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let directive = if cli.verbose { "tahsil=debug" } else { "tahsil=info" };
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match directive.parse() {
        Ok(d) => filter.add_directive(d),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config;
    let result = match cli.command {
        Commands::Compute {
            sheet,
            target,
            format,
        } => commands::compute::execute(sheet, target, format, config),
        Commands::Bac {
            national,
            regional,
            continuous,
            s1,
            s2,
            suggest,
            stream,
            year,
            format,
        } => {
            commands::bac::execute(
                commands::bac::BacArgs {
                    national,
                    regional,
                    continuous,
                    s1,
                    s2,
                    suggest,
                    stream,
                    year,
                    format,
                },
                config,
            )
            .await
        }
        Commands::SimulateSubject {
            tests,
            activity,
            no_activities,
            activities_weight,
            target,
        } => commands::simulate_subject::execute(
            tests,
            activity,
            no_activities,
            activities_weight,
            target,
            config,
        ),
        Commands::SimulateBac {
            national,
            regional,
            continuous,
            target,
        } => commands::simulate_bac::execute(national, regional, continuous, target, config),
        Commands::Analyze { sheet, lang, year } => {
            commands::analyze::execute(sheet, lang, year, config).await
        }
        Commands::Streams { level } => commands::streams::execute(level),
        Commands::Template { action } => match action {
            TemplateAction::Save { sheet, with_grades } => {
                commands::template::save(sheet, with_grades, config)
            }
            TemplateAction::Show { kind } => commands::template::show(kind, config),
            TemplateAction::Remove { kind } => commands::template::remove(kind, config),
        },
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
