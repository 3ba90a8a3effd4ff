use serde::{Deserialize, Serialize};
use thiserror::Error;

use screener_core::{Assessment, JobLevel, Remark};

pub mod assemble;
pub mod export;
pub mod read;

pub use assemble::{ProgressEvent, build_report, screen_text};
pub use export::{COLUMNS, ExportFormat, export_results, render, render_table};
pub use read::{parse_report, read_report};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to create staging directory: {0}")]
    Staging(#[source] std::io::Error),
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("report is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("malformed report at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// One screened candidate: the upload's name plus every derived fact.
///
/// `education` keeps the extracted lowercase keyword; it is title-cased only
/// when rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub candidate: String,
    pub job_level: JobLevel,
    pub score: f64,
    pub remark: Remark,
    pub missing_must_have: Vec<String>,
    pub good_to_have: Vec<String>,
    pub preferred_tools: Vec<String>,
    pub certifications: Vec<String>,
    pub domains: Vec<String>,
    pub other_traits: Vec<String>,
    pub experience_years: f64,
    pub education: String,
    pub red_flags: Vec<String>,
}

impl ReportRow {
    pub fn from_assessment(candidate: impl Into<String>, assessment: &Assessment) -> Self {
        let m = &assessment.matches;
        Self {
            candidate: candidate.into(),
            job_level: assessment.level,
            score: assessment.score.score,
            remark: assessment.score.remark,
            missing_must_have: m.missing_must.clone(),
            good_to_have: m.good_to_have.clone(),
            preferred_tools: m.preferred_tools.clone(),
            certifications: m.certifications.clone(),
            domains: m.domain_keywords.clone(),
            other_traits: m.other_traits.clone(),
            experience_years: assessment.experience_years,
            education: assessment.education.clone(),
            red_flags: m.red_flags.clone(),
        }
    }

    /// Display cells, in [`COLUMNS`] order.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.candidate.clone(),
            self.job_level.to_string(),
            format_number(self.score),
            self.remark.to_string(),
            self.missing_must_have.join(LIST_SEPARATOR),
            self.good_to_have.join(LIST_SEPARATOR),
            self.preferred_tools.join(LIST_SEPARATOR),
            self.certifications.join(LIST_SEPARATOR),
            self.domains.join(LIST_SEPARATOR),
            self.other_traits.join(LIST_SEPARATOR),
            format_number(self.experience_years),
            title_case(&self.education),
            self.red_flags.join(LIST_SEPARATOR),
        ]
    }
}

/// Separator for list-valued cells.
pub const LIST_SEPARATOR: &str = ", ";

/// Whole numbers keep one decimal (`20.0`), others print as-is (`16.67`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Uppercase the first letter of every run of letters, lowercase the rest
/// (`"b.tech"` → `"B.Tech"`).
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Remark tallies for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub strong: usize,
    pub moderate: usize,
    pub weak: usize,
    pub disqualified: usize,
}

impl Summary {
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        let mut s = Summary {
            total: rows.len(),
            ..Default::default()
        };
        for row in rows {
            match row.remark {
                Remark::StrongMatch => s.strong += 1,
                Remark::Moderate => s.moderate += 1,
                Remark::Weak => s.weak += 1,
                Remark::Disqualified => s.disqualified += 1,
            }
        }
        s
    }
}
