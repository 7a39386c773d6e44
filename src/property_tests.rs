//! Property-based tests for partitioning and order preservation

#[cfg(test)]
mod tests {
    use crate::mapper::{partition, MapError, ParallelMapper};
    use proptest::prelude::*;

    // Property test: partitions tile the index range exactly once
    proptest! {
        #[test]
        fn test_partitions_cover_range_once(
            len in 0usize..5_000,
            workers in 0usize..64,
        ) {
            let partitions = partition(len, workers);

            let mut next = 0;
            for (i, part) in partitions.iter().enumerate() {
                prop_assert_eq!(part.worker, i);
                prop_assert_eq!(part.start, next);
                prop_assert!(!part.is_empty());
                next = part.end;
            }
            prop_assert_eq!(next, len);
            prop_assert_eq!(partitions.len(), workers.max(1).min(len));

            let sizes: Vec<usize> = partitions.iter().map(|p| p.len()).collect();
            if let (Some(max), Some(min)) = (sizes.iter().max(), sizes.iter().min()) {
                prop_assert!(max - min <= 1);
            }
        }
    }

    // Property test: output matches an element-wise sequential map for any worker count
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn test_map_matches_sequential(
            input in prop::collection::vec(any::<i32>(), 0..300),
            workers in 1usize..32,
        ) {
            let transform = |x: &i32| i64::from(*x) * 3 - 7;
            let expected: Vec<i64> = input.iter().map(transform).collect();

            let mapper = ParallelMapper::with_workers(workers);
            prop_assert_eq!(mapper.map(&input, transform), expected);
        }
    }

    // Property test: any single failing element fails the call at that index
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn test_single_failure_always_surfaces(
            len in 1usize..300,
            workers in 1usize..16,
            pick in any::<prop::sample::Index>(),
        ) {
            let input: Vec<usize> = (0..len).collect();
            let bad = pick.index(len);

            let mapper = ParallelMapper::with_workers(workers);
            let result = mapper.try_map(&input, |x| if *x == bad { Err(*x) } else { Ok(*x) });

            prop_assert_eq!(result, Err(MapError::Transform { index: bad, cause: bad }));
        }
    }
}
