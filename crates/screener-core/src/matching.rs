use serde::Serialize;

use crate::profile::{RequirementsProfile, TermSet};

/// Soft-skill vocabulary matched independently of the requirements profile.
///
/// Not configurable: moving it into profiles would change scores for every
/// existing profile file.
pub const OTHER_TRAITS: &[&str] = &[
    "collaboration",
    "communication",
    "ownership",
    "led",
    "mentored",
    "learner",
    "growth",
    "process improvement",
    "initiative",
];

/// Terms from each category found in a candidate's text.
///
/// Every list keeps the profile's declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub must_have: Vec<String>,
    pub good_to_have: Vec<String>,
    pub certifications: Vec<String>,
    pub domain_keywords: Vec<String>,
    pub preferred_tools: Vec<String>,
    pub other_traits: Vec<String>,
    pub red_flags: Vec<String>,
    /// Configured must-have terms that were not found.
    pub missing_must: Vec<String>,
}

impl MatchResult {
    pub fn is_disqualified(&self) -> bool {
        !self.red_flags.is_empty()
    }

    /// Preferred tools, certifications and domain keywords share one scoring bucket.
    pub fn tools_count(&self) -> usize {
        self.preferred_tools.len() + self.certifications.len() + self.domain_keywords.len()
    }
}

// Plain substring containment: "java" also matches "javascript".
fn found_in<'a>(text: &str, terms: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    terms
        .into_iter()
        .filter(|term| text.contains(term))
        .map(str::to_string)
        .collect()
}

fn missing_from(terms: &TermSet, found: &[String]) -> Vec<String> {
    terms
        .iter()
        .filter(|term| !found.iter().any(|f| f == term))
        .map(str::to_string)
        .collect()
}

/// Scan lowercased `text` for every configured category.
pub fn match_keywords(text: &str, profile: &RequirementsProfile) -> MatchResult {
    let must_have = found_in(text, profile.must_have.iter());
    let missing_must = missing_from(&profile.must_have, &must_have);

    MatchResult {
        good_to_have: found_in(text, profile.good_to_have.iter()),
        certifications: found_in(text, profile.certifications.iter()),
        domain_keywords: found_in(text, profile.domain_keywords.iter()),
        preferred_tools: found_in(text, profile.preferred_tools.iter()),
        other_traits: found_in(text, OTHER_TRAITS.iter().copied()),
        red_flags: found_in(text, profile.must_not_have.iter()),
        must_have,
        missing_must,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileSchema;

    fn profile() -> RequirementsProfile {
        RequirementsProfile::from_json_str(
            r#"{
                "must_have": ["selenium", "api testing", "java", "sql"],
                "good_to_have": ["cypress", "jmeter"],
                "must_not_have": ["terminated for cause"],
                "preferred_tools": ["jira", "postman"],
                "certifications": ["istqb"],
                "domain_keywords": ["fintech"]
            }"#,
            ProfileSchema::Lenient,
        )
        .unwrap()
    }

    #[test]
    fn finds_terms_per_category() {
        let text = "qa engineer: selenium, postman and jira. istqb certified. mentored juniors in fintech.";
        let m = match_keywords(text, &profile());
        assert_eq!(m.must_have, ["selenium"]);
        assert_eq!(m.preferred_tools, ["jira", "postman"]);
        assert_eq!(m.certifications, ["istqb"]);
        assert_eq!(m.domain_keywords, ["fintech"]);
        assert_eq!(m.other_traits, ["mentored"]);
        assert!(m.red_flags.is_empty());
        assert_eq!(m.tools_count(), 4);
    }

    #[test]
    fn substring_matching_has_no_word_boundaries() {
        let m = match_keywords("five years of javascript", &profile());
        assert_eq!(m.must_have, ["java"]);
    }

    #[test]
    fn missing_and_found_partition_the_must_have_set() {
        let p = profile();
        for text in [
            "",
            "selenium",
            "sql and api testing with java",
            "selenium api testing java sql",
        ] {
            let m = match_keywords(text, &p);
            let mut union: Vec<&str> = m
                .must_have
                .iter()
                .chain(m.missing_must.iter())
                .map(String::as_str)
                .collect();
            union.sort_unstable();
            let mut expected: Vec<&str> = p.must_have.iter().collect();
            expected.sort_unstable();
            assert_eq!(union, expected, "text: {text:?}");
            assert!(m.must_have.iter().all(|t| !m.missing_must.contains(t)));
        }
    }

    #[test]
    fn red_flags_mark_disqualification() {
        let m = match_keywords("left after being terminated for cause", &profile());
        assert_eq!(m.red_flags, ["terminated for cause"]);
        assert!(m.is_disqualified());
    }

    #[test]
    fn empty_text_matches_nothing() {
        let m = match_keywords("", &profile());
        assert!(m.must_have.is_empty());
        assert!(m.other_traits.is_empty());
        assert_eq!(m.missing_must.len(), 4);
    }
}
