use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::level::{JobLevel, SENIOR_MIN_YEARS};
use crate::matching::MatchResult;
use crate::profile::RequirementsProfile;

/// Points available for good-to-have skills on top of the technical weight.
pub const GOOD_TO_HAVE_WEIGHT: f64 = 10.0;
/// Bonus for meeting the profile's minimum years of experience.
pub const EXPERIENCE_BONUS: f64 = 3.0;
/// Extra bonus for senior candidates with at least five years.
pub const SENIOR_BONUS: f64 = 2.0;
/// Bonus when the detected education is one of the accepted keywords.
pub const EDUCATION_BONUS: f64 = 2.0;
/// Scores at or above this are a strong match regardless of the profile minimum.
pub const STRONG_MATCH_SCORE: f64 = 80.0;

/// Qualitative verdict attached to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Remark {
    #[serde(rename = "Strong match")]
    StrongMatch,
    Moderate,
    Weak,
    Disqualified,
}

impl Remark {
    pub fn as_str(&self) -> &'static str {
        match self {
            Remark::StrongMatch => "Strong match",
            Remark::Moderate => "Moderate",
            Remark::Weak => "Weak",
            Remark::Disqualified => "Disqualified",
        }
    }
}

impl fmt::Display for Remark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Remark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Strong match" => Ok(Remark::StrongMatch),
            "Moderate" => Ok(Remark::Moderate),
            "Weak" => Ok(Remark::Weak),
            "Disqualified" => Ok(Remark::Disqualified),
            other => Err(format!("unknown remark: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Percentage-style score, rounded to 2 decimals. Never negative, but not
    /// clamped at 100: stacked bonuses can push it over.
    pub score: f64,
    pub remark: Remark,
}

impl ScoreResult {
    pub fn disqualified() -> Self {
        Self {
            score: 0.0,
            remark: Remark::Disqualified,
        }
    }
}

/// `min(found, expected) / expected * weight`, or 0 when nothing is expected.
fn capped_ratio(found: usize, expected: u32, weight: f64) -> f64 {
    if expected == 0 {
        return 0.0;
    }
    let expected = expected as f64;
    (found as f64).min(expected) / expected * weight
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn remark_for(score: f64, min_total_score: f64) -> Remark {
    if score >= STRONG_MATCH_SCORE {
        Remark::StrongMatch
    } else if score >= min_total_score {
        Remark::Moderate
    } else {
        Remark::Weak
    }
}

/// Combine match counts, experience and education into a score and remark.
///
/// Any red flag short-circuits to `(0, Disqualified)`. Otherwise each bucket
/// is scored against the tier's expected count:
///
/// | bucket | points |
/// |---|---|
/// | must-have | `weights.technical_skills` |
/// | good-to-have | [`GOOD_TO_HAVE_WEIGHT`] |
/// | tools + certifications + domains | `weights.tools_and_tech` |
/// | other traits | `weights.other` |
///
/// plus the experience, senior and education bonuses.
pub fn score_candidate(
    matches: &MatchResult,
    experience_years: f64,
    education: &str,
    level: JobLevel,
    profile: &RequirementsProfile,
) -> ScoreResult {
    if matches.is_disqualified() {
        return ScoreResult::disqualified();
    }

    let tier = profile.thresholds.for_level(level);
    let weights = &profile.weights;

    let technical = capped_ratio(matches.must_have.len(), tier.must_have, weights.technical_skills)
        + capped_ratio(matches.good_to_have.len(), tier.good_to_have, GOOD_TO_HAVE_WEIGHT);
    let tools = capped_ratio(matches.tools_count(), tier.tools, weights.tools_and_tech);
    let other = capped_ratio(matches.other_traits.len(), tier.other, weights.other);

    let mut bonus = 0.0;
    if experience_years >= profile.min_years_experience {
        bonus += EXPERIENCE_BONUS;
    }
    if level == JobLevel::Senior && experience_years >= SENIOR_MIN_YEARS {
        bonus += SENIOR_BONUS;
    }
    if profile.min_education_keywords.contains(education) {
        bonus += EDUCATION_BONUS;
    }

    let score = round2(technical + tools + other + bonus);
    ScoreResult {
        score,
        remark: remark_for(score, profile.min_total_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::education::UNKNOWN_EDUCATION;
    use crate::profile::ProfileSchema;

    fn matches_with(must: &[&str]) -> MatchResult {
        MatchResult {
            must_have: must.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn profile_from(toml_str: &str) -> RequirementsProfile {
        RequirementsProfile::from_toml_str(toml_str, ProfileSchema::Lenient).unwrap()
    }

    #[test]
    fn technical_share_is_capped_by_expected_count() {
        // Two must-haves found against a senior expectation of six: 2/6 * 60 = 20.
        let profile = profile_from(
            r#"
must_have = ["selenium", "api testing"]
min_years_experience = 10
"#,
        );
        let matches = matches_with(&["selenium", "api testing"]);
        let result = score_candidate(&matches, 5.0, UNKNOWN_EDUCATION, JobLevel::Senior, &profile);
        // 20 technical + 2 senior bonus; below the 10-year minimum so no +3.
        assert_eq!(result.score, 22.0);
        assert_eq!(result.remark, Remark::Weak);
    }

    #[test]
    fn found_count_beyond_expectation_is_ignored() {
        let profile = profile_from(
            r#"
[thresholds.associate]
must_have = 1
good_to_have = 0
tools = 0
other = 0
"#,
        );
        let matches = matches_with(&["a", "b", "c"]);
        let result = score_candidate(&matches, 0.0, UNKNOWN_EDUCATION, JobLevel::Associate, &profile);
        assert_eq!(result.score, 60.0 + EXPERIENCE_BONUS);
    }

    #[test]
    fn red_flag_zeroes_everything() {
        let profile = RequirementsProfile::default();
        let mut matches = matches_with(&["selenium"]);
        matches.good_to_have = vec!["cypress".into()];
        matches.red_flags = vec!["terminated for cause".into()];
        let result = score_candidate(&matches, 12.0, "master", JobLevel::Senior, &profile);
        assert_eq!(result, ScoreResult::disqualified());
    }

    #[test]
    fn zero_expected_counts_contribute_nothing() {
        let profile = profile_from(
            r#"
min_years_experience = 1
[thresholds.engineer]
must_have = 0
good_to_have = 0
tools = 0
other = 0
"#,
        );
        let mut matches = matches_with(&["selenium"]);
        matches.preferred_tools = vec!["jira".into()];
        matches.other_traits = vec!["ownership".into()];
        let result = score_candidate(&matches, 3.0, UNKNOWN_EDUCATION, JobLevel::Engineer, &profile);
        assert_eq!(result.score, EXPERIENCE_BONUS);
        assert!(result.score.is_finite());
    }

    #[test]
    fn score_is_not_clamped_at_one_hundred() {
        let profile = profile_from(
            r#"
min_education_keywords = ["bachelor"]
[thresholds.senior]
must_have = 1
good_to_have = 1
tools = 1
other = 1
"#,
        );
        let matches = MatchResult {
            must_have: vec!["rust".into()],
            good_to_have: vec!["go".into()],
            certifications: vec!["cka".into()],
            other_traits: vec!["ownership".into()],
            ..Default::default()
        };
        let result = score_candidate(&matches, 8.0, "bachelor", JobLevel::Senior, &profile);
        // 60 + 10 + 20 + 20 + 3 + 2 + 2
        assert_eq!(result.score, 117.0);
        assert_eq!(result.remark, Remark::StrongMatch);
    }

    #[test]
    fn education_bonus_requires_an_accepted_keyword() {
        let profile = profile_from(r#"min_education_keywords = ["bachelor"]"#);
        let none = MatchResult::default();
        let with = score_candidate(&none, 0.0, "bachelor", JobLevel::Associate, &profile);
        let without = score_candidate(&none, 0.0, UNKNOWN_EDUCATION, JobLevel::Associate, &profile);
        assert_eq!(with.score - without.score, EDUCATION_BONUS);
        assert_eq!(without.score, EXPERIENCE_BONUS);
    }

    #[test]
    fn rounding_to_two_decimals() {
        let profile = profile_from(
            r#"
min_years_experience = 50
[thresholds.associate]
must_have = 3
good_to_have = 0
tools = 0
other = 0
"#,
        );
        let result = score_candidate(&matches_with(&["a"]), 0.0, UNKNOWN_EDUCATION, JobLevel::Associate, &profile);
        assert_eq!(result.score, 20.0);

        let profile = profile_from(
            r#"
min_years_experience = 50
[weights]
technical_skills = 50
[thresholds.associate]
must_have = 3
good_to_have = 0
tools = 0
other = 0
"#,
        );
        let result = score_candidate(&matches_with(&["a"]), 0.0, UNKNOWN_EDUCATION, JobLevel::Associate, &profile);
        assert_eq!(result.score, 16.67);
    }

    #[test]
    fn remark_thresholds() {
        assert_eq!(remark_for(80.0, 60.0), Remark::StrongMatch);
        assert_eq!(remark_for(79.99, 60.0), Remark::Moderate);
        assert_eq!(remark_for(60.0, 60.0), Remark::Moderate);
        assert_eq!(remark_for(59.99, 60.0), Remark::Weak);
        // A profile minimum above 80 never hides a strong match.
        assert_eq!(remark_for(85.0, 90.0), Remark::StrongMatch);
    }

    #[test]
    fn remark_round_trips_through_display() {
        for remark in [Remark::StrongMatch, Remark::Moderate, Remark::Weak, Remark::Disqualified] {
            assert_eq!(remark.to_string().parse::<Remark>().unwrap(), remark);
        }
    }
}
