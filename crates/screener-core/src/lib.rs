use std::path::Path;

use serde::Serialize;
use thiserror::Error;

pub mod config_file;
pub mod education;
pub mod experience;
pub mod level;
pub mod matching;
pub mod profile;
pub mod scoring;

// Re-export for convenience
pub use education::{UNKNOWN_EDUCATION, extract_education};
pub use experience::{extract_years_experience, normalize_number_words};
pub use level::{JobLevel, infer_level};
pub use matching::{MatchResult, OTHER_TRAITS, match_keywords};
pub use profile::{
    CategoryWeights, ProfileError, ProfileSchema, RequirementsProfile, TermSet, TierTable,
    TierThresholds,
};
pub use scoring::{Remark, ScoreResult, score_candidate};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
}

/// Trait for PDF text extraction backends.
///
/// Implementors return the text of every page, in page order, joined by
/// newlines. Case folding and error recovery happen in the ingest layer.
pub trait PdfBackend: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}

/// Everything derived from one candidate's text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub matches: MatchResult,
    pub experience_years: f64,
    pub education: String,
    pub level: JobLevel,
    pub score: ScoreResult,
}

/// Run matching, experience/education extraction, level inference and
/// scoring over lowercased `text`.
///
/// Empty text is valid input and simply produces no matches.
pub fn assess(text: &str, profile: &RequirementsProfile) -> Assessment {
    let matches = match_keywords(text, profile);
    let experience_years = extract_years_experience(text);
    let education = extract_education(text, &profile.min_education_keywords).to_string();
    let level = infer_level(experience_years);
    let score = score_candidate(&matches, experience_years, &education, level, profile);

    tracing::debug!(
        must_have = matches.must_have.len(),
        missing = matches.missing_must.len(),
        red_flags = matches.red_flags.len(),
        experience_years,
        %education,
        %level,
        score = score.score,
        remark = %score.remark,
        "assessed candidate"
    );

    Assessment {
        matches,
        experience_years,
        education,
        level,
        score,
    }
}
