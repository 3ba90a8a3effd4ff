use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Below this many years a candidate is an associate.
pub const ENGINEER_MIN_YEARS: f64 = 2.0;
/// At or above this many years a candidate is senior.
pub const SENIOR_MIN_YEARS: f64 = 5.0;

/// Experience tier a candidate is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobLevel {
    Associate,
    Engineer,
    Senior,
}

impl JobLevel {
    pub fn all() -> &'static [JobLevel] {
        &[JobLevel::Associate, JobLevel::Engineer, JobLevel::Senior]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobLevel::Associate => "associate",
            JobLevel::Engineer => "engineer",
            JobLevel::Senior => "senior",
        }
    }
}

impl fmt::Display for JobLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "associate" => Ok(JobLevel::Associate),
            "engineer" => Ok(JobLevel::Engineer),
            "senior" => Ok(JobLevel::Senior),
            other => Err(format!("unknown job level: {other}")),
        }
    }
}

/// Classify years of experience into a tier. Plain float comparison, no rounding.
pub fn infer_level(experience_years: f64) -> JobLevel {
    if experience_years >= SENIOR_MIN_YEARS {
        JobLevel::Senior
    } else if experience_years >= ENGINEER_MIN_YEARS {
        JobLevel::Engineer
    } else {
        JobLevel::Associate
    }
}
