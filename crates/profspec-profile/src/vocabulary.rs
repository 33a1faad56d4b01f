//! # Controlled Vocabularies
//!
//! Value/label pairs for the profile fields that only accept a fixed set of
//! values. Values are what is stored on the profile; labels are for display.

use serde::Serialize;

/// One accepted value and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Term {
    pub value: &'static str,
    pub label: &'static str,
}

const fn term(value: &'static str, label: &'static str) -> Term {
    Term { value, label }
}

/// Accepted `jobTitle` values.
pub const JOB_TITLES: &[Term] = &[
    term("CEO", "CEO"),
    term("CSO", "CSO"),
    term("Scientific Director", "Scientific Director"),
    term("Principal Investigator", "Principal Investigator"),
    term("Co-investigator", "Co-investigator"),
    term("Staff Scientist", "Staff Scientist"),
    term("Research Associate", "Research Associate"),
    term("Postdoctoral Scientist", "Postdoctoral Scientist"),
    term("Graduate Student", "Graduate Student"),
    term("Undergraduate Student", "Undergraduate Student"),
    term("Assistant Professor", "Assistant Professor"),
    term("Associate Professor", "Associate Professor"),
    term("Professor", "Professor"),
    term("Physician", "Physician"),
    term("Other", "Other"),
];

/// Accepted `researchInterests` values.
pub const RESEARCH_INTERESTS: &[Term] = &[
    term("annotation", "Genome Annotation"),
    term("assembly", "Genome Assembly"),
    term("communities", "Microbial Communities"),
    term("comparative_genomics", "Comparative Genomics"),
    term("expression", "Expression"),
    term("metabolic_modeling", "Metabolic Modeling"),
    term("reads", "Read Processing"),
    term("sequence", "Sequence Analysis"),
    term("util", "Utilities"),
];

/// Whether `value` is one of the vocabulary's values.
pub fn contains(vocabulary: &[Term], value: &str) -> bool {
    vocabulary.iter().any(|t| t.value == value)
}

/// Display label for a value.
pub fn label_for(vocabulary: &[Term], value: &str) -> Option<&'static str> {
    vocabulary.iter().find(|t| t.value == value).map(|t| t.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_titles_are_exact_matches() {
        assert!(contains(JOB_TITLES, "Principal Investigator"));
        assert!(!contains(JOB_TITLES, "principal investigator"));
        assert_eq!(JOB_TITLES.len(), 15);
    }

    #[test]
    fn research_interest_labels() {
        assert_eq!(label_for(RESEARCH_INTERESTS, "reads"), Some("Read Processing"));
        assert_eq!(label_for(RESEARCH_INTERESTS, "Read Processing"), None);
    }
}
