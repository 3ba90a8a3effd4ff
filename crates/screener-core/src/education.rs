use crate::profile::TermSet;

/// Returned when no configured education keyword appears in the text.
pub const UNKNOWN_EDUCATION: &str = "unknown";

/// First keyword (in declared order) that occurs in `text`, or [`UNKNOWN_EDUCATION`].
pub fn extract_education<'a>(text: &str, keywords: &'a TermSet) -> &'a str {
    keywords
        .iter()
        .find(|keyword| text.contains(keyword))
        .unwrap_or(UNKNOWN_EDUCATION)
}
