//! Order-preserving grouping helpers shared by the statistics and chart
//! code.
//!
//! Dashboards list categories in the order records arrived, so a `HashMap`
//! would scramble the UI (and the exported documents). Keys are compared
//! linearly; group counts are small, a handful of noise categories or days.

/// Folds `items` into one accumulator per key, keeping keys in
/// first-encounter order.
pub fn fold_by<T, K, A, KeyFn, FoldFn>(
    items: impl IntoIterator<Item = T>,
    mut key: KeyFn,
    mut fold: FoldFn,
) -> Vec<(K, A)>
where
    K: PartialEq,
    A: Default,
    KeyFn: FnMut(&T) -> K,
    FoldFn: FnMut(&mut A, T),
{
    let mut groups: Vec<(K, A)> = Vec::new();
    for item in items {
        let key = key(&item);
        if let Some(entry) = groups.iter_mut().find(|entry| entry.0 == key) {
            fold(&mut entry.1, item);
        } else {
            let mut acc = A::default();
            fold(&mut acc, item);
            groups.push((key, acc));
        }
    }
    groups
}

/// Counts items per key, keeping keys in first-encounter order.
pub fn tally<T, K, KeyFn>(items: impl IntoIterator<Item = T>, key: KeyFn) -> Vec<(K, u32)>
where
    K: PartialEq,
    KeyFn: FnMut(&T) -> K,
{
    fold_by(items, key, |count, _item| *count += 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_keeps_first_encounter_order() {
        let labels = ["dog", "traffic", "dog", "ambulance", "traffic", "dog"];
        let counts = tally(labels, |label| *label);
        assert_eq!(
            counts,
            vec![("dog", 3), ("traffic", 2), ("ambulance", 1)]
        );
    }

    #[test]
    fn tally_of_nothing_is_empty() {
        let counts = tally(Vec::<&str>::new(), |label| *label);
        assert!(counts.is_empty());
    }

    #[test]
    fn fold_by_accumulates_per_key() {
        let samples = [("dog", 1.0), ("traffic", 3.0), ("dog", 2.0)];
        let sums = fold_by(
            samples,
            |(label, _)| *label,
            |acc: &mut (f64, u32), (_, value)| {
                acc.0 += value;
                acc.1 += 1;
            },
        );
        assert_eq!(sums, vec![("dog", (3.0, 2)), ("traffic", (3.0, 1))]);
    }
}
