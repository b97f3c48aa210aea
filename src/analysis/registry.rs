//! Canonical question registry.
//!
//! Data sources have reported the same semantic question under several
//! codes over time: legacy numeric ids (`q1`..`q6`), the canonical slug,
//! the full display label, and case variants of the slug. This module
//! resolves any of those to one canonical category so duplicates merge
//! instead of appearing as separate rows.

use crate::models::{CanonicalCategory, Category};

/// Legacy numeric code table, ordered by the historical question layout.
const LEGACY_CODES: [(&str, CanonicalCategory); 6] = [
    ("q1", CanonicalCategory::Comfort),
    ("q2", CanonicalCategory::Engagement),
    ("q3", CanonicalCategory::Conflicts),
    ("q4", CanonicalCategory::Stress),
    ("q5", CanonicalCategory::Support),
    ("q6", CanonicalCategory::OpenFeedback),
];

/// Resolve a raw question code to a category.
///
/// Resolution order, first match wins:
/// 1. legacy numeric table;
/// 2. exact canonical slug;
/// 3. exact display-label text;
/// 4. case-insensitive slug;
/// 5. pass-through: the raw code becomes its own category.
///
/// Pure and stateless; the same input always yields the same output.
pub fn resolve(code: &str) -> Category {
    if let Some(canonical) = resolve_canonical(code) {
        Category::Canonical(canonical)
    } else {
        Category::Other(code.to_string())
    }
}

/// Resolve to a canonical category, or `None` for unknown codes.
pub fn resolve_canonical(code: &str) -> Option<CanonicalCategory> {
    if let Some(&(_, canonical)) = LEGACY_CODES.iter().find(|(legacy, _)| *legacy == code) {
        return Some(canonical);
    }

    if let Some(&canonical) = CanonicalCategory::ALL.iter().find(|c| c.slug() == code) {
        return Some(canonical);
    }

    if let Some(&canonical) = CanonicalCategory::ALL.iter().find(|c| c.label() == code) {
        return Some(canonical);
    }

    // Accidental case differences in stored slugs
    let lower = code.to_lowercase();
    CanonicalCategory::ALL
        .iter()
        .find(|c| c.slug() == lower)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_numeric_codes() {
        assert_eq!(
            resolve("q1"),
            Category::Canonical(CanonicalCategory::Comfort)
        );
        assert_eq!(
            resolve("q4"),
            Category::Canonical(CanonicalCategory::Stress)
        );
        assert_eq!(
            resolve("q6"),
            Category::Canonical(CanonicalCategory::OpenFeedback)
        );
    }

    #[test]
    fn test_canonical_slug_is_idempotent() {
        for category in CanonicalCategory::ALL {
            assert_eq!(resolve(category.slug()), Category::Canonical(category));
        }
    }

    #[test]
    fn test_label_text_as_code() {
        assert_eq!(
            resolve("Комфорт"),
            Category::Canonical(CanonicalCategory::Comfort)
        );
        assert_eq!(
            resolve("Доп. отзывы"),
            Category::Canonical(CanonicalCategory::OpenFeedback)
        );
    }

    #[test]
    fn test_case_insensitive_slug() {
        assert_eq!(
            resolve("Comfort"),
            Category::Canonical(CanonicalCategory::Comfort)
        );
        assert_eq!(
            resolve("OPEN_FEEDBACK"),
            Category::Canonical(CanonicalCategory::OpenFeedback)
        );
    }

    #[test]
    fn test_unknown_code_passes_through() {
        let resolved = resolve("custom_question_17");
        assert_eq!(resolved, Category::Other("custom_question_17".to_string()));
        assert_eq!(resolved.label(), "custom_question_17");
    }

    #[test]
    fn test_same_input_same_output() {
        assert_eq!(resolve("q2"), resolve("q2"));
        assert_eq!(resolve("whatever"), resolve("whatever"));
    }
}
