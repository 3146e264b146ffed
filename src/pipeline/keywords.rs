//! Academic-keyword heuristics behind both upload gates.
//!
//! Pure functions over a fixed vocabulary; case-insensitive substring
//! matching (not whole-word). The thresholds live in [`crate::config`].

use crate::config::{DENSITY_FLOOR, DENSITY_MIN_DISTINCT};

/// Terms indicating syllabus/exam content. Order-independent set.
pub const ACADEMIC_KEYWORDS: &[&str] = &[
    "syllabus",
    "curriculum",
    "course",
    "semester",
    "lecture",
    "module",
    "unit",
    "chapter",
    "topic",
    "exam",
    "question",
    "marks",
    "grade",
    "assignment",
    "assessment",
    "tutorial",
    "faculty",
    "department",
    "university",
    "college",
    "student",
    "instructor",
    "professor",
    "academic",
    "textbook",
    "reference",
];

/// Distinct vocabulary terms found in a text.
#[derive(Debug, Clone)]
pub struct KeywordMatches {
    pub count: usize,
    pub matched: Vec<&'static str>,
}

/// Full assessment used by the hard (non-overridable) gate.
#[derive(Debug, Clone)]
pub struct KeywordAssessment {
    pub distinct_count: usize,
    /// All occurrences, repeats included.
    pub total_occurrences: usize,
    /// Occurrences per 100 whitespace-delimited words, capped at 100.
    pub density_score: f64,
    pub passed: bool,
}

/// Count distinct vocabulary terms appearing anywhere in `text`.
pub fn count_distinct_keywords(text: &str) -> KeywordMatches {
    let folded = text.to_lowercase();
    let matched: Vec<&'static str> = ACADEMIC_KEYWORDS
        .iter()
        .copied()
        .filter(|term| folded.contains(term))
        .collect();
    KeywordMatches {
        count: matched.len(),
        matched,
    }
}

/// Soft-gate check: inspects only the first `prefix_chars` characters.
pub fn quick_check(text: &str, prefix_chars: usize, min_distinct: usize) -> bool {
    let prefix: String = text.chars().take(prefix_chars).collect();
    count_distinct_keywords(&prefix).count >= min_distinct
}

/// Hard-gate check over the full text.
///
/// Density is total keyword occurrences per 100 words; a text with no words
/// scores 0. Passes iff distinct count and density both clear their floors.
pub fn density_check(text: &str) -> KeywordAssessment {
    let folded = text.to_lowercase();
    let word_count = folded.split_whitespace().count();

    let distinct_count = count_distinct_keywords(text).count;
    let total_occurrences: usize = ACADEMIC_KEYWORDS
        .iter()
        .map(|term| folded.matches(term).count())
        .sum();

    let density_score = if word_count == 0 {
        0.0
    } else {
        (100.0 * total_occurrences as f64 / word_count as f64).min(100.0)
    };

    let passed = distinct_count >= DENSITY_MIN_DISTINCT && density_score >= DENSITY_FLOOR;

    KeywordAssessment {
        distinct_count,
        total_occurrences,
        density_score,
        passed,
    }
}
