//! Assignment of source images to workers.

/// Splits `items` into `workers` groups by `index mod workers`.
///
/// Order within each group follows the input order. Returns no groups when
/// `workers` is zero.
pub fn partition_round_robin<T>(items: Vec<T>, workers: usize) -> Vec<Vec<T>> {
    if workers == 0 {
        return Vec::new();
    }

    let mut groups: Vec<Vec<T>> = (0..workers).map(|_| Vec::new()).collect();
    for (index, item) in items.into_iter().enumerate() {
        groups[index % workers].push(item);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_seven_images_three_workers() {
        let groups = partition_round_robin((0..7).collect(), 3);
        assert_eq!(groups, vec![vec![0, 3, 6], vec![1, 4], vec![2, 5]]);
    }

    #[test]
    fn test_more_workers_than_items() {
        let groups = partition_round_robin(vec!['a', 'b'], 4);
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0], vec!['a']);
        assert_eq!(groups[1], vec!['b']);
        assert!(groups[2].is_empty());
        assert!(groups[3].is_empty());
    }

    #[test]
    fn test_zero_workers() {
        assert!(partition_round_robin(vec![1, 2, 3], 0).is_empty());
    }

    proptest! {
        #[test]
        fn prop_partition_preserves_every_item(len in 0usize..200, workers in 1usize..16) {
            let groups = partition_round_robin((0..len).collect::<Vec<_>>(), workers);
            prop_assert_eq!(groups.len(), workers);

            let mut seen: Vec<usize> = groups.iter().flatten().copied().collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..len).collect::<Vec<_>>());

            for (worker, group) in groups.iter().enumerate() {
                prop_assert!(group.iter().all(|i| i % workers == worker));
                prop_assert!(group.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
