pub mod analyze;
pub mod bac;
pub mod compute;
pub mod init;
pub mod simulate_bac;
pub mod simulate_subject;
pub mod streams;
pub mod template;

use anyhow::{Context, Result};

use tahsil_core::model::{Mark, MAX_MARK};
use tahsil_core::parser::parse_mark;
use tahsil_core::projection::Slot;

/// Check a mark typed on the command line.
pub fn check_mark(name: &str, mark: Mark) -> Result<Mark> {
    anyhow::ensure!(
        mark.is_finite() && (0.0..=MAX_MARK).contains(&mark),
        "{name} must lie between 0 and 20, got {mark}"
    );
    Ok(mark)
}

/// The explicit target, or the configured default.
pub fn resolve_target(explicit: Option<f64>, fallback: f64) -> Result<f64> {
    check_mark("target", explicit.unwrap_or(fallback))
}

/// A mark, or `?` for the value being solved for.
pub fn parse_slot(name: &str, text: &str) -> Result<Slot> {
    let trimmed = text.trim();
    if trimmed == "?" {
        return Ok(Slot::Unknown);
    }
    let mark = parse_mark(trimmed).with_context(|| format!("invalid mark for {name}: '{trimmed}'"))?;
    Ok(Slot::Known(check_mark(name, mark)?))
}
