//! Classification — maps uncontrolled free-text categories to a fixed set of style buckets.
//!
//! Matching is a containment test on a normalized form of the input: lowercase
//! with everything but letters and digits removed, so "Full-Time", "FULL TIME"
//! and "full_time" all read as `fulltime`. Short tokens that would also match
//! inside unrelated words ("intern" in "international", "a1" in "java11") are
//! instead compared against whole words. Rules are tried in declared order and
//! the first hit wins; anything unmatched lands in `Bucket::Neutral`.

use serde::{Deserialize, Serialize};

/// Which rule table a value is classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFamily {
    EmploymentType,
    WorkMode,
    LanguageProficiency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Hybrid,
    Remote,
    OnSite,
    Native,
    Advanced,
    Intermediate,
    Basic,
    Neutral,
}

impl Bucket {
    /// Stable token a presentation layer can key its styling on.
    pub fn style_token(self) -> &'static str {
        match self {
            Bucket::FullTime => "full-time",
            Bucket::PartTime => "part-time",
            Bucket::Contract => "contract",
            Bucket::Internship => "internship",
            Bucket::Hybrid => "hybrid",
            Bucket::Remote => "remote",
            Bucket::OnSite => "on-site",
            Bucket::Native => "native",
            Bucket::Advanced => "advanced",
            Bucket::Intermediate => "intermediate",
            Bucket::Basic => "basic",
            Bucket::Neutral => "neutral",
        }
    }
}

struct Rule {
    bucket: Bucket,
    /// Substrings of the normalized text.
    needles: &'static [&'static str],
    /// Whole lowercase words of the original text.
    words: &'static [&'static str],
}

const EMPLOYMENT_TYPE_RULES: &[Rule] = &[
    Rule {
        bucket: Bucket::FullTime,
        needles: &["fulltime", "permanent"],
        words: &[],
    },
    Rule {
        bucket: Bucket::PartTime,
        needles: &["parttime"],
        words: &[],
    },
    Rule {
        bucket: Bucket::Contract,
        needles: &["contract", "freelance", "consult", "temporary"],
        words: &[],
    },
    Rule {
        bucket: Bucket::Internship,
        needles: &["internship", "apprentice"],
        words: &["intern", "interns"],
    },
];

// Hybrid first: "hybrid (remote 3 days)" is hybrid, not remote.
const WORK_MODE_RULES: &[Rule] = &[
    Rule {
        bucket: Bucket::Hybrid,
        needles: &["hybrid"],
        words: &[],
    },
    Rule {
        bucket: Bucket::Remote,
        needles: &["remote", "workfromhome", "wfh", "telecommut"],
        words: &[],
    },
    Rule {
        bucket: Bucket::OnSite,
        needles: &["onsite", "inoffice", "office", "inperson"],
        words: &[],
    },
];

const LANGUAGE_PROFICIENCY_RULES: &[Rule] = &[
    Rule {
        bucket: Bucket::Native,
        needles: &["native", "bilingual", "mothertongue"],
        words: &[],
    },
    Rule {
        bucket: Bucket::Advanced,
        needles: &["fluent", "advanced", "proficient", "professional"],
        words: &["c2", "c1"],
    },
    Rule {
        bucket: Bucket::Intermediate,
        needles: &["intermediate", "conversational", "limitedworking"],
        words: &["b2", "b1"],
    },
    Rule {
        bucket: Bucket::Basic,
        needles: &["basic", "beginner", "elementary"],
        words: &["a2", "a1"],
    },
];

impl CategoryFamily {
    fn rules(self) -> &'static [Rule] {
        match self {
            CategoryFamily::EmploymentType => EMPLOYMENT_TYPE_RULES,
            CategoryFamily::WorkMode => WORK_MODE_RULES,
            CategoryFamily::LanguageProficiency => LANGUAGE_PROFICIENCY_RULES,
        }
    }
}

/// Classifies `text` within `family`. Never fails; unknown input is `Bucket::Neutral`.
pub fn classify(text: &str, family: CategoryFamily) -> Bucket {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return Bucket::Neutral;
    }
    let tokens = words(text);
    family
        .rules()
        .iter()
        .find(|rule| {
            rule.needles.iter().any(|needle| normalized.contains(needle))
                || rule.words.iter().any(|w| tokens.iter().any(|t| t == *w))
        })
        .map(|rule| rule.bucket)
        .unwrap_or(Bucket::Neutral)
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use CategoryFamily::*;

    #[test]
    fn test_spelling_variants_share_bucket() {
        let a = classify("Full-Time", EmploymentType);
        let b = classify("FULL TIME", EmploymentType);
        let c = classify("full_time", EmploymentType);
        assert_eq!(a, Bucket::FullTime);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_employment_precedence() {
        assert_eq!(classify("Part-time", EmploymentType), Bucket::PartTime);
        assert_eq!(classify("Freelance", EmploymentType), Bucket::Contract);
        assert_eq!(classify("Independent Consultant", EmploymentType), Bucket::Contract);
        assert_eq!(classify("Summer Internship", EmploymentType), Bucket::Internship);
        // full-time is checked before contract
        assert_eq!(classify("Full-time contract", EmploymentType), Bucket::FullTime);
        // part-time is checked before internship
        assert_eq!(classify("Part-time intern", EmploymentType), Bucket::PartTime);
    }

    #[test]
    fn test_work_mode() {
        assert_eq!(classify("Remote", WorkMode), Bucket::Remote);
        assert_eq!(classify("Hybrid / Remote", WorkMode), Bucket::Hybrid);
        assert_eq!(classify("On-site", WorkMode), Bucket::OnSite);
        assert_eq!(classify("In office", WorkMode), Bucket::OnSite);
        assert_eq!(classify("work from home", WorkMode), Bucket::Remote);
    }

    #[test]
    fn test_language_proficiency() {
        assert_eq!(classify("Native or bilingual proficiency", LanguageProficiency), Bucket::Native);
        assert_eq!(classify("Full professional proficiency", LanguageProficiency), Bucket::Advanced);
        assert_eq!(classify("C1", LanguageProficiency), Bucket::Advanced);
        assert_eq!(classify("Limited working proficiency", LanguageProficiency), Bucket::Intermediate);
        assert_eq!(classify("B2", LanguageProficiency), Bucket::Intermediate);
        assert_eq!(classify("Elementary proficiency", LanguageProficiency), Bucket::Basic);
    }

    #[test]
    fn test_unrecognized_is_neutral() {
        assert_eq!(classify("Volunteer", EmploymentType), Bucket::Neutral);
        assert_eq!(classify("", WorkMode), Bucket::Neutral);
        assert_eq!(classify("---", LanguageProficiency), Bucket::Neutral);
        assert_eq!(classify("日本語", LanguageProficiency), Bucket::Neutral);
    }

    #[test]
    fn test_intern_needs_a_whole_word() {
        assert_eq!(classify("International assignment", EmploymentType), Bucket::Neutral);
        assert_eq!(classify("Internal transfer", EmploymentType), Bucket::Neutral);
        assert_eq!(classify("Summer Intern", EmploymentType), Bucket::Internship);
        assert_eq!(classify("Engineering interns program", EmploymentType), Bucket::Internship);
        assert_eq!(classify("INTERNSHIP", EmploymentType), Bucket::Internship);
    }

    #[test]
    fn test_cefr_grade_needs_a_whole_word() {
        assert_eq!(classify("CEFR C1", LanguageProficiency), Bucket::Advanced);
        assert_eq!(classify("b1-level", LanguageProficiency), Bucket::Intermediate);
        assert_eq!(classify("Java11 certified", LanguageProficiency), Bucket::Neutral);
    }

    #[test]
    fn test_deterministic() {
        for _ in 0..3 {
            assert_eq!(classify("Contract", EmploymentType), Bucket::Contract);
        }
    }

    #[test]
    fn test_style_tokens_are_distinct() {
        use std::collections::HashSet;
        let all = [
            Bucket::FullTime,
            Bucket::PartTime,
            Bucket::Contract,
            Bucket::Internship,
            Bucket::Hybrid,
            Bucket::Remote,
            Bucket::OnSite,
            Bucket::Native,
            Bucket::Advanced,
            Bucket::Intermediate,
            Bucket::Basic,
            Bucket::Neutral,
        ];
        let tokens: HashSet<_> = all.iter().map(|b| b.style_token()).collect();
        assert_eq!(tokens.len(), all.len());
    }
}
