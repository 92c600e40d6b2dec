//! The `tahsil init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("tahsil.toml").exists() {
        println!("tahsil.toml already exists, skipping.");
    } else {
        std::fs::write("tahsil.toml", SAMPLE_CONFIG)?;
        println!("Created tahsil.toml");
    }

    std::fs::create_dir_all("sheets")?;
    let example_path = std::path::Path::new("sheets/example.toml");
    if example_path.exists() {
        println!("sheets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SHEET)?;
        println!("Created sheets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Fill in your marks in sheets/example.toml");
    println!("  2. Run: tahsil compute --sheet sheets/example.toml");
    println!("  3. Run: tahsil bac --national 12 --regional 14 --continuous 15");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# tahsil configuration

lang = "fr"
default_target = 10
template_dir = ".tahsil/templates"

[backend]
base_url = "${TAHSIL_BACKEND_URL}"
auth_key = "${TAHSIL_AUTH_KEY}"
timeout_secs = 30
max_retries = 2
retry_delay_ms = 500
"#;

const EXAMPLE_SHEET: &str = r#"# Second-year bac, physics stream, continuous assessment.
# Leave a mark blank ("") when it is not known yet; mark a subject
# pending when it has not been graded at all.

[sheet]
mode = "continuous"
level = "2eme_bac"
stream = "pc"
target = 12

[grades.math]
tests = [14, 16]
activity = 12

[grades.pc]
tests = [13, 15.5]
activity = 16

[grades.svt]
pending = true

[grades.philo]
tests = [11]
activity = 14

[grades.eng]
tests = [15, 17]
activity = 16

[grades.arabic]
tests = [12]
activity = 13

[grades.french]
tests = [10, 12]
activity = 14

[grades.islamic]
tests = [16]
activity = 17

[grades.history]
tests = [13]
activity = 15
"#;
