use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::JobLevel;

pub const DEFAULT_EDUCATION_LEVEL: &str = "bachelor";
pub const DEFAULT_MIN_TOTAL_SCORE: f64 = 60.0;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON profile: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML profile: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("profile is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unsupported profile format `{0}` (expected .json or .toml)")]
    UnsupportedFormat(String),
}

/// How strictly a profile document is checked on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileSchema {
    /// Every field is optional and falls back to its default.
    #[default]
    Lenient,
    /// `must_have`, `good_to_have`, `min_years_experience` and
    /// `education_level` must be present.
    Strict,
}

/// An ordered, lowercased, deduplicated list of terms.
///
/// Declared order is preserved so that "first match wins" lookups
/// (education) are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TermSet(Vec<String>);

impl TermSet {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if term.is_empty() {
                continue;
            }
            if seen.insert(term.clone()) {
                out.push(term);
            }
        }
        Self(out)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.iter().any(|t| t == term)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Counts a candidate at a given tier is expected to hit in each bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub must_have: u32,
    pub good_to_have: u32,
    pub tools: u32,
    pub other: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierTable {
    pub associate: TierThresholds,
    pub engineer: TierThresholds,
    pub senior: TierThresholds,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            associate: TierThresholds {
                must_have: 3,
                good_to_have: 1,
                tools: 2,
                other: 1,
            },
            engineer: TierThresholds {
                must_have: 4,
                good_to_have: 2,
                tools: 3,
                other: 2,
            },
            senior: TierThresholds {
                must_have: 6,
                good_to_have: 3,
                tools: 4,
                other: 3,
            },
        }
    }
}

impl TierTable {
    pub fn for_level(&self, level: JobLevel) -> TierThresholds {
        match level {
            JobLevel::Associate => self.associate,
            JobLevel::Engineer => self.engineer,
            JobLevel::Senior => self.senior,
        }
    }

    fn slot_mut(&mut self, level: JobLevel) -> &mut TierThresholds {
        match level {
            JobLevel::Associate => &mut self.associate,
            JobLevel::Engineer => &mut self.engineer,
            JobLevel::Senior => &mut self.senior,
        }
    }
}

/// Maximum points each scored category contributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryWeights {
    pub technical_skills: f64,
    pub tools_and_tech: f64,
    pub other: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            technical_skills: 60.0,
            tools_and_tech: 20.0,
            other: 20.0,
        }
    }
}

/// The screening requirements every candidate is measured against.
///
/// Built once at startup and passed by reference; nothing mutates it after load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementsProfile {
    pub must_have: TermSet,
    pub good_to_have: TermSet,
    pub must_not_have: TermSet,
    pub preferred_tools: TermSet,
    pub certifications: TermSet,
    pub domain_keywords: TermSet,
    pub min_education_keywords: TermSet,
    pub min_years_experience: f64,
    /// Read for compatibility with existing profiles; scoring never consults it.
    pub education_level: String,
    pub min_total_score: f64,
    /// Read for compatibility with existing profiles; scoring never consults it.
    pub required_tools_count: u32,
    pub thresholds: TierTable,
    pub weights: CategoryWeights,
}

impl Default for RequirementsProfile {
    fn default() -> Self {
        RawProfile::default().into_profile()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTier {
    must_have: Option<u32>,
    good_to_have: Option<u32>,
    tools: Option<u32>,
    other: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWeights {
    technical_skills: Option<f64>,
    tools_and_tech: Option<f64>,
    other: Option<f64>,
}

/// On-disk shape. Every field is optional so partial profiles load.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProfile {
    must_have: Option<Vec<String>>,
    good_to_have: Option<Vec<String>>,
    must_not_have: Vec<String>,
    preferred_tools: Vec<String>,
    certifications: Vec<String>,
    domain_keywords: Vec<String>,
    min_education_keywords: Vec<String>,
    min_years_experience: Option<f64>,
    education_level: Option<String>,
    min_total_score: Option<f64>,
    required_tools_count: Option<u32>,
    thresholds: BTreeMap<String, RawTier>,
    weights: RawWeights,
}

impl RawProfile {
    fn check(&self, schema: ProfileSchema) -> Result<(), ProfileError> {
        if schema == ProfileSchema::Lenient {
            return Ok(());
        }
        if self.must_have.is_none() {
            return Err(ProfileError::MissingField("must_have"));
        }
        if self.good_to_have.is_none() {
            return Err(ProfileError::MissingField("good_to_have"));
        }
        if self.min_years_experience.is_none() {
            return Err(ProfileError::MissingField("min_years_experience"));
        }
        if self.education_level.is_none() {
            return Err(ProfileError::MissingField("education_level"));
        }
        Ok(())
    }

    fn into_profile(self) -> RequirementsProfile {
        let mut thresholds = TierTable::default();
        for (name, raw) in self.thresholds {
            let Ok(level) = name.parse::<JobLevel>() else {
                tracing::warn!(tier = %name, "ignoring thresholds for unknown tier");
                continue;
            };
            let slot = thresholds.slot_mut(level);
            slot.must_have = raw.must_have.unwrap_or(slot.must_have);
            slot.good_to_have = raw.good_to_have.unwrap_or(slot.good_to_have);
            slot.tools = raw.tools.unwrap_or(slot.tools);
            slot.other = raw.other.unwrap_or(slot.other);
        }

        let defaults = CategoryWeights::default();
        let weights = CategoryWeights {
            technical_skills: self
                .weights
                .technical_skills
                .unwrap_or(defaults.technical_skills),
            tools_and_tech: self
                .weights
                .tools_and_tech
                .unwrap_or(defaults.tools_and_tech),
            other: self.weights.other.unwrap_or(defaults.other),
        };

        RequirementsProfile {
            must_have: TermSet::new(self.must_have.unwrap_or_default()),
            good_to_have: TermSet::new(self.good_to_have.unwrap_or_default()),
            must_not_have: TermSet::new(self.must_not_have),
            preferred_tools: TermSet::new(self.preferred_tools),
            certifications: TermSet::new(self.certifications),
            domain_keywords: TermSet::new(self.domain_keywords),
            min_education_keywords: TermSet::new(self.min_education_keywords),
            min_years_experience: self.min_years_experience.unwrap_or(0.0),
            education_level: self
                .education_level
                .map(|e| e.trim().to_lowercase())
                .unwrap_or_else(|| DEFAULT_EDUCATION_LEVEL.to_string()),
            min_total_score: self.min_total_score.unwrap_or(DEFAULT_MIN_TOTAL_SCORE),
            required_tools_count: self.required_tools_count.unwrap_or(0),
            thresholds,
            weights,
        }
    }
}

impl RequirementsProfile {
    pub fn from_json_str(content: &str, schema: ProfileSchema) -> Result<Self, ProfileError> {
        let raw: RawProfile = serde_json::from_str(content)?;
        raw.check(schema)?;
        Ok(raw.into_profile())
    }

    pub fn from_toml_str(content: &str, schema: ProfileSchema) -> Result<Self, ProfileError> {
        let raw: RawProfile = toml::from_str(content)?;
        raw.check(schema)?;
        Ok(raw.into_profile())
    }

    /// Load a profile file, choosing the parser by extension (`.json` or `.toml`).
    pub fn load(path: &Path, schema: ProfileSchema) -> Result<Self, ProfileError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let profile = match ext.as_str() {
            "json" => Self::from_json_str(&content, schema)?,
            "toml" => Self::from_toml_str(&content, schema)?,
            other => return Err(ProfileError::UnsupportedFormat(other.to_string())),
        };

        tracing::debug!(
            path = %path.display(),
            must_have = profile.must_have.len(),
            good_to_have = profile.good_to_have.len(),
            red_flags = profile.must_not_have.len(),
            "loaded requirements profile"
        );
        Ok(profile)
    }
}
