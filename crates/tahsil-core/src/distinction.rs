//! Mention awarded for a final average.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Distinction band of a final average on the 20-point scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distinction {
    NeedsEffort,
    Passable,
    PrettyGood,
    Good,
    Excellent,
}

impl Distinction {
    pub fn from_average(average: f64) -> Self {
        if average >= 16.0 {
            Distinction::Excellent
        } else if average >= 14.0 {
            Distinction::Good
        } else if average >= 12.0 {
            Distinction::PrettyGood
        } else if average >= 10.0 {
            Distinction::Passable
        } else {
            Distinction::NeedsEffort
        }
    }

    pub fn is_pass(self) -> bool {
        self >= Distinction::Passable
    }
}

impl fmt::Display for Distinction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Distinction::Excellent => "Très bien",
            Distinction::Good => "Bien",
            Distinction::PrettyGood => "Assez bien",
            Distinction::Passable => "Passable",
            Distinction::NeedsEffort => "Insuffisant",
        };
        f.write_str(s)
    }
}
