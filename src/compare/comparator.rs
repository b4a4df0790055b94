use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::frequency::FrequencyTable;

/// One ranked value with its count in each document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FrequencyRow {
    pub value: String,
    pub count_a: usize,
    pub count_b: usize,
}

impl FrequencyRow {
    pub fn combined(&self) -> usize {
        self.count_a + self.count_b
    }
}

/// Shared vocabulary ranked by combined count plus the full unique sets of each side.
///
/// Every distinct value of either document lands in exactly one of the three
/// partitions, before `shared` is truncated to the requested size.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ComparisonResult {
    pub shared: Vec<FrequencyRow>,
    pub unique_to_a: BTreeSet<String>,
    pub unique_to_b: BTreeSet<String>,
}

/// Compares two feature sequences. See [`compare_tables`].
pub fn compare<A, B>(features_a: A, features_b: B, top_n: usize) -> ComparisonResult
where
    A: IntoIterator,
    A::Item: AsRef<str>,
    B: IntoIterator,
    B::Item: AsRef<str>,
{
    compare_tables(
        &FrequencyTable::from_features(features_a),
        &FrequencyTable::from_features(features_b),
        top_n,
    )
}

/// Ranks values present in both tables by `count_a + count_b` descending, ties by
/// value ascending, and keeps the first `top_n`. Unique sets are never truncated.
pub fn compare_tables(a: &FrequencyTable, b: &FrequencyTable, top_n: usize) -> ComparisonResult {
    let mut shared = Vec::new();
    let mut unique_to_a = BTreeSet::new();
    for (value, count_a) in a.iter() {
        match b.count(value) {
            0 => {
                unique_to_a.insert(value.to_string());
            }
            count_b => shared.push(FrequencyRow {
                value: value.to_string(),
                count_a,
                count_b,
            }),
        }
    }
    let unique_to_b = b
        .keys()
        .filter(|value| !a.contains(value))
        .map(str::to_string)
        .collect();

    shared.sort_by(rank_order);
    shared.truncate(top_n);

    ComparisonResult {
        shared,
        unique_to_a,
        unique_to_b,
    }
}

/// Ranks the union of both tables by combined count, the same ordering as the
/// shared list, with zero counts for the side a value is missing from.
pub fn rank_combined(a: &FrequencyTable, b: &FrequencyTable, top_n: usize) -> Vec<FrequencyRow> {
    let values: BTreeSet<&str> = a.keys().chain(b.keys()).collect();
    let mut rows: Vec<FrequencyRow> = values
        .into_iter()
        .map(|value| FrequencyRow {
            value: value.to_string(),
            count_a: a.count(value),
            count_b: b.count(value),
        })
        .collect();
    rows.sort_by(rank_order);
    rows.truncate(top_n);
    rows
}

fn rank_order(x: &FrequencyRow, y: &FrequencyRow) -> Ordering {
    y.combined()
        .cmp(&x.combined())
        .then_with(|| x.value.cmp(&y.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn row(value: &str, count_a: usize, count_b: usize) -> FrequencyRow {
        FrequencyRow {
            value: value.to_string(),
            count_a,
            count_b,
        }
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn splits_shared_and_unique_values() {
        let result = compare(["a", "a", "b"], ["b", "b", "c"], 10);
        assert_eq!(result.shared, vec![row("b", 1, 2)]);
        assert_eq!(result.unique_to_a, set(&["a"]));
        assert_eq!(result.unique_to_b, set(&["c"]));
    }

    #[test]
    fn empty_side_leaves_everything_unique_to_the_other() {
        let result = compare(["θεός", "λόγος", "θεός"], Vec::<&str>::new(), 10);
        assert!(result.shared.is_empty());
        assert!(result.unique_to_b.is_empty());
        assert_eq!(result.unique_to_a, set(&["θεός", "λόγος"]));
    }

    #[test]
    fn shared_is_ranked_and_truncated() {
        let a = ["ὁ", "ὁ", "ὁ", "καί", "καί", "δέ", "θεός"];
        let b = ["ὁ", "καί", "καί", "δέ", "θεός", "θεός"];
        let result = compare(a, b, 3);
        assert_eq!(
            result.shared,
            vec![row("καί", 2, 2), row("ὁ", 3, 1), row("θεός", 1, 2)]
        );
    }

    #[test]
    fn top_n_beyond_shared_returns_all_without_padding() {
        let result = compare(["x", "y"], ["y", "x"], 50);
        assert_eq!(result.shared, vec![row("x", 1, 1), row("y", 1, 1)]);
    }

    #[test]
    fn combined_ranking_covers_the_union() {
        let a = FrequencyTable::from_features(["ὁ", "ὁ", "Ἰούδας"]);
        let b = FrequencyTable::from_features(["ὁ", "θεός", "θεός", "θεός"]);
        assert_eq!(
            rank_combined(&a, &b, 10),
            vec![row("θεός", 0, 3), row("ὁ", 2, 1), row("Ἰούδας", 1, 0)]
        );
        assert_eq!(rank_combined(&a, &b, 1).len(), 1);
    }

    fn features() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-f]{1,2}", 0..40)
    }

    proptest! {
        #[test]
        fn partitions_cover_all_keys_disjointly(a in features(), b in features()) {
            let result = compare(&a, &b, usize::MAX);
            let shared: BTreeSet<String> = result.shared.iter().map(|r| r.value.clone()).collect();
            let keys: BTreeSet<String> = a.iter().chain(b.iter()).cloned().collect();

            prop_assert!(shared.is_disjoint(&result.unique_to_a));
            prop_assert!(shared.is_disjoint(&result.unique_to_b));
            prop_assert!(result.unique_to_a.is_disjoint(&result.unique_to_b));

            let union: BTreeSet<String> = shared
                .union(&result.unique_to_a)
                .cloned()
                .collect::<BTreeSet<_>>()
                .union(&result.unique_to_b)
                .cloned()
                .collect();
            prop_assert_eq!(union, keys);
        }

        #[test]
        fn comparison_is_deterministic(a in features(), b in features(), top_n in 1usize..20) {
            let mut shuffled = a.clone();
            shuffled.reverse();
            let first = compare(&a, &b, top_n);
            prop_assert_eq!(&first, &compare(&a, &b, top_n));
            prop_assert_eq!(&first, &compare(&shuffled, &b, top_n));
        }

        #[test]
        fn uniqueness_is_symmetric(a in features(), b in features()) {
            let forward = compare(&a, &b, 10);
            let backward = compare(&b, &a, 10);
            prop_assert_eq!(forward.unique_to_b, backward.unique_to_a);
            prop_assert_eq!(forward.unique_to_a, backward.unique_to_b);
        }

        #[test]
        fn shared_rows_are_ranked(a in features(), b in features()) {
            let result = compare(&a, &b, usize::MAX);
            for pair in result.shared.windows(2) {
                prop_assert!(rank_order(&pair[0], &pair[1]) != Ordering::Greater);
            }
        }
    }
}
