//! Response aggregation and normalization.
//!
//! This module merges raw per-question statistics (which may contain
//! several entries that canonicalize to the same category) into one
//! weighted mean per category, and folds open text answers into the
//! open-feedback row.

use crate::analysis::registry;
use crate::models::{AggregatedStat, CanonicalCategory, Category, OpenAnswer, RawQuestionStat};
use std::collections::HashMap;
use tracing::debug;

/// Per-category accumulator. Addition of entries is associative and
/// commutative, so the merged result is independent of input order.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    weighted_sum: f64,
    total_count: u64,
}

impl Accumulator {
    fn add(&mut self, average: f64, count: i64) {
        // Malformed entries (negative count, non-finite average) must not
        // poison the merge; they contribute as count = 0.
        if count <= 0 || !average.is_finite() {
            return;
        }
        self.weighted_sum += average * count as f64;
        self.total_count += count as u64;
    }

    fn mean(&self) -> f64 {
        if self.total_count > 0 {
            self.weighted_sum / self.total_count as f64
        } else {
            0.0
        }
    }
}

/// Aggregate raw question statistics and open answers into an ordered
/// list of category-level statistics.
///
/// Canonical categories come first in their fixed order (only those
/// present in the input), followed by pass-through categories in
/// first-seen order. The open-feedback row reports value `0.0` and a
/// count of `max(accumulated count, open_answers.len())`; it is
/// synthesized when absent but open answers exist.
pub fn aggregate(stats: &[RawQuestionStat], open_answers: &[OpenAnswer]) -> Vec<AggregatedStat> {
    let mut accumulators: HashMap<Category, Accumulator> = HashMap::new();
    let mut passthrough_order: Vec<Category> = Vec::new();

    for stat in stats {
        let category = registry::resolve(&stat.question_code);

        if matches!(category, Category::Other(_)) && !accumulators.contains_key(&category) {
            passthrough_order.push(category.clone());
        }

        accumulators
            .entry(category)
            .or_default()
            .add(stat.average, stat.count);
    }

    debug!(
        categories = accumulators.len(),
        open_answers = open_answers.len(),
        "aggregated question statistics"
    );

    let mut result: Vec<AggregatedStat> = Vec::with_capacity(accumulators.len() + 1);

    for canonical in CanonicalCategory::ALL {
        let category = Category::Canonical(canonical);
        if let Some(acc) = accumulators.remove(&category) {
            result.push(AggregatedStat {
                label: category.label().to_string(),
                value: acc.mean(),
                count: acc.total_count,
                category,
            });
        }
    }

    for category in passthrough_order {
        if let Some(acc) = accumulators.remove(&category) {
            result.push(AggregatedStat {
                label: category.label().to_string(),
                value: acc.mean(),
                count: acc.total_count,
                category,
            });
        }
    }

    merge_open_answers(&mut result, open_answers.len());

    result
}

/// Fold the open-answer count into the open-feedback row.
///
/// Open answers carry no numeric value, so the row's value is always 0.
/// The count-merge rule (max of accumulated count and list length) is
/// preserved from the service's observed behavior.
fn merge_open_answers(result: &mut Vec<AggregatedStat>, open_count: usize) {
    let open_count = open_count as u64;

    if let Some(row) = result.iter_mut().find(|s| s.category.is_open_feedback()) {
        row.value = 0.0;
        row.count = row.count.max(open_count);
    } else if open_count > 0 {
        let category = Category::Canonical(CanonicalCategory::OpenFeedback);
        // Keep canonical ordering: open_feedback precedes any pass-through rows.
        let position = result
            .iter()
            .position(|s| matches!(s.category, Category::Other(_)))
            .unwrap_or(result.len());
        result.insert(
            position,
            AggregatedStat {
                label: category.label().to_string(),
                value: 0.0,
                count: open_count,
                category,
            },
        );
    }
}

/// Numeric-only view for charts: the full aggregation minus open feedback.
///
/// A pure filter over [`aggregate`]'s result, so both views share one
/// computation.
pub fn numeric_only(stats: &[AggregatedStat]) -> Vec<AggregatedStat> {
    stats
        .iter()
        .filter(|s| !s.category.is_open_feedback())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stat(code: &str, average: f64, count: i64) -> RawQuestionStat {
        RawQuestionStat {
            question_code: code.to_string(),
            average,
            count,
        }
    }

    fn open_answer(text: &str) -> OpenAnswer {
        OpenAnswer {
            question_code: "open_feedback".to_string(),
            question_text: None,
            text_value: text.to_string(),
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_weighted_mean_merge() {
        // q1 is a legacy alias of comfort: (4*10 + 5*5) / 15
        let stats = vec![stat("q1", 4.0, 10), stat("comfort", 5.0, 5)];
        let result = aggregate(&stats, &[]);

        assert_eq!(result.len(), 1);
        assert_eq!(
            result[0].category,
            Category::Canonical(CanonicalCategory::Comfort)
        );
        assert!((result[0].value - 13.0 / 3.0).abs() < 1e-9);
        assert_eq!(result[0].count, 15);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let stats = vec![
            stat("q1", 4.0, 10),
            stat("comfort", 5.0, 5),
            stat("Комфорт", 3.0, 2),
            stat("stress", 2.5, 8),
            stat("custom", 1.0, 1),
        ];

        let baseline = aggregate(&stats, &[]);

        // A handful of distinct permutations
        let permutations: Vec<Vec<usize>> = vec![
            vec![4, 3, 2, 1, 0],
            vec![2, 0, 4, 1, 3],
            vec![1, 4, 0, 3, 2],
        ];

        for order in permutations {
            let permuted: Vec<RawQuestionStat> =
                order.iter().map(|&i| stats[i].clone()).collect();
            let result = aggregate(&permuted, &[]);

            assert_eq!(result.len(), baseline.len());
            for (a, b) in baseline.iter().zip(result.iter()) {
                assert_eq!(a.category, b.category);
                assert!((a.value - b.value).abs() < 1e-9);
                assert_eq!(a.count, b.count);
            }
        }
    }

    #[test]
    fn test_zero_count_yields_zero_not_nan() {
        let stats = vec![stat("comfort", 4.0, 0)];
        let result = aggregate(&stats, &[]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].value, 0.0);
        assert_eq!(result[0].count, 0);
        assert!(result[0].value.is_finite());
    }

    #[test]
    fn test_malformed_input_is_neutralized() {
        let stats = vec![
            stat("comfort", f64::NAN, 10),
            stat("comfort", f64::INFINITY, 3),
            stat("comfort", 4.0, -5),
            stat("comfort", 3.0, 2),
        ];
        let result = aggregate(&stats, &[]);

        assert_eq!(result.len(), 1);
        assert!((result[0].value - 3.0).abs() < 1e-9);
        assert_eq!(result[0].count, 2);
    }

    #[test]
    fn test_canonical_order_then_first_seen() {
        let stats = vec![
            stat("zeta", 1.0, 1),
            stat("support", 4.0, 3),
            stat("alpha", 2.0, 2),
            stat("comfort", 5.0, 1),
        ];
        let result = aggregate(&stats, &[]);

        let order: Vec<String> = result.iter().map(|s| s.category.to_string()).collect();
        assert_eq!(order, vec!["comfort", "support", "zeta", "alpha"]);
    }

    #[test]
    fn test_passthrough_is_never_dropped() {
        let stats = vec![stat("mystery_code", 3.5, 4)];
        let result = aggregate(&stats, &[]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].label, "mystery_code");
        assert!((result[0].value - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_open_feedback_synthesized_from_open_answers() {
        let answers: Vec<OpenAnswer> = (0..7).map(|i| open_answer(&format!("ответ {}", i))).collect();
        let result = aggregate(&[], &answers);

        assert_eq!(result.len(), 1);
        assert_eq!(
            result[0].category,
            Category::Canonical(CanonicalCategory::OpenFeedback)
        );
        assert_eq!(result[0].value, 0.0);
        assert_eq!(result[0].count, 7);
    }

    #[test]
    fn test_open_feedback_count_is_max_of_both_sources() {
        // Raw stat reports 10 under open_feedback, but only 4 open answers
        let stats = vec![stat("q6", 3.0, 10)];
        let answers: Vec<OpenAnswer> = (0..4).map(|_| open_answer("x")).collect();
        let result = aggregate(&stats, &answers);

        let open = result
            .iter()
            .find(|s| s.category.is_open_feedback())
            .unwrap();
        assert_eq!(open.count, 10);
        assert_eq!(open.value, 0.0);

        // And the other direction
        let stats = vec![stat("q6", 3.0, 2)];
        let result = aggregate(&stats, &answers);
        let open = result
            .iter()
            .find(|s| s.category.is_open_feedback())
            .unwrap();
        assert_eq!(open.count, 4);
    }

    #[test]
    fn test_synthesized_open_feedback_precedes_passthrough() {
        let stats = vec![stat("custom", 2.0, 3)];
        let answers = vec![open_answer("a")];
        let result = aggregate(&stats, &answers);

        let order: Vec<String> = result.iter().map(|s| s.category.to_string()).collect();
        assert_eq!(order, vec!["open_feedback", "custom"]);
    }

    #[test]
    fn test_numeric_only_is_pure_filter() {
        let stats = vec![stat("comfort", 4.0, 5), stat("q6", 0.0, 3)];
        let full = aggregate(&stats, &[open_answer("x")]);
        let numeric = numeric_only(&full);

        assert_eq!(numeric.len(), full.len() - 1);
        assert!(numeric.iter().all(|s| !s.category.is_open_feedback()));
        // Entries are shared with the full view, not recomputed
        assert_eq!(numeric[0], full[0]);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(aggregate(&[], &[]).is_empty());
    }
}
