//! Keyword heuristic: substring matching against the category table.
//!
//! Used whenever no trained model is loaded, and as the fallback when the
//! model path fails. Skill extraction lives here too since both modes display
//! skills from the same table scan.

use crate::classifier::categories::{JobCategory, CATEGORIES, FALLBACK_CATEGORY};

const BASE_CONFIDENCE: f64 = 0.5;
const MAX_CONFIDENCE: f64 = 0.95;
const MAX_SKILLS: usize = 10;
const DEFAULT_SKILLS: [&str; 2] = ["Communication", "Teamwork"];

/// Outcome of keyword scoring against the category table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatch {
    pub category: String,
    pub confidence: f64,
    /// Keywords of the winning category found in the text, in table order.
    pub matched: Vec<&'static str>,
}

/// Scores every category by how many of its keywords occur in `text`.
///
/// The first category to reach the highest count wins, so ties go to the
/// earlier table entry. No match at all yields `General` at 0.5.
pub fn classify_by_keywords(text: &str) -> KeywordMatch {
    classify_with_table(text, CATEGORIES)
}

fn classify_with_table(text: &str, table: &[JobCategory]) -> KeywordMatch {
    let text_lower = text.to_lowercase();

    let mut best_category = FALLBACK_CATEGORY;
    let mut best_matched: Vec<&'static str> = Vec::new();

    for &(category, keywords) in table {
        let matched: Vec<&'static str> = keywords
            .iter()
            .copied()
            .filter(|kw| text_lower.contains(kw))
            .collect();
        if matched.len() > best_matched.len() {
            best_category = category;
            best_matched = matched;
        }
    }

    let confidence = if best_matched.is_empty() {
        BASE_CONFIDENCE
    } else {
        round2(MAX_CONFIDENCE.min(BASE_CONFIDENCE + best_matched.len() as f64 / 10.0))
    };

    KeywordMatch {
        category: best_category.to_string(),
        confidence,
        matched: best_matched,
    }
}

/// Collects every table keyword present in `text`, in table order, without
/// duplicates, title-cased and capped at ten. Falls back to a fixed pair of
/// soft skills when nothing matches.
pub fn extract_skills(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();

    let mut matched: Vec<&str> = Vec::new();
    for &(_, keywords) in CATEGORIES {
        for &kw in keywords {
            if text_lower.contains(kw) && !matched.contains(&kw) {
                matched.push(kw);
            }
        }
    }

    if matched.is_empty() {
        return DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect();
    }

    matched
        .into_iter()
        .take(MAX_SKILLS)
        .map(title_case)
        .collect()
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest: `"ci/cd"` becomes `"Ci/Cd"`, `"c++"` becomes `"C++"`.
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev_alpha = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
