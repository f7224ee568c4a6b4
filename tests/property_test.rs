/*!
 * Property Tests
 *
 * Whatever the discipline, strategy, mode or thread count, a run must agree
 * with a sequential fold over the same input.
 */

use prime_pipeline::{
    is_prime, AggregationStrategy, ExecutionMode, IterSource, Pipeline, PipelineConfig,
    QueueKind, Stats, WorkItem,
};
use proptest::prelude::*;

fn queue_kind() -> impl Strategy<Value = QueueKind> {
    prop::sample::select(QueueKind::ALL.to_vec())
}

fn aggregation() -> impl Strategy<Value = AggregationStrategy> {
    prop::sample::select(AggregationStrategy::ALL.to_vec())
}

fn mode() -> impl Strategy<Value = ExecutionMode> {
    prop_oneof![Just(ExecutionMode::Batch), Just(ExecutionMode::Pipelined)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_matches_sequential_fold(
        values in prop::collection::vec(-1_000_000i64..1_000_000, 0..400),
        threads in 1usize..12,
        queue in queue_kind(),
        aggregation in aggregation(),
        mode in mode(),
    ) {
        let config = PipelineConfig::default()
            .with_threads(threads)
            .with_queue(queue)
            .with_aggregation(aggregation)
            .with_mode(mode);
        let report = Pipeline::new(config)
            .unwrap()
            .run(IterSource::from(values.iter().copied()), is_prime)
            .unwrap();

        let expected: Stats = values.iter().map(|&v| (v, is_prime(v))).collect();
        prop_assert_eq!(report.totals, expected);
        prop_assert_eq!(report.produced, values.len() as u64);
        prop_assert!(report.consistency().is_ok());
        prop_assert!(report.totals.is_balanced());
        prop_assert_eq!(report.workers.len(), threads);
        prop_assert!(report.workers.iter().all(|w| w.is_balanced()));
    }

    #[test]
    fn prop_round_robin_balances_shards(
        len in 0usize..500,
        threads in 1usize..16,
    ) {
        let config = PipelineConfig::reference_mutex().with_threads(threads);
        let report = Pipeline::new(config)
            .unwrap()
            .run(IterSource::from(0..len as WorkItem), is_prime)
            .unwrap();

        let counts: Vec<u64> = report.workers.iter().map(|w| w.consumed).collect();
        let min = counts.iter().copied().min().unwrap_or(0);
        let max = counts.iter().copied().max().unwrap_or(0);
        prop_assert!(max - min <= 1);
        prop_assert_eq!(counts.iter().sum::<u64>(), len as u64);
    }

    #[test]
    fn prop_sum_is_exact_for_any_i64(
        values in prop::collection::vec(any::<i64>(), 0..200),
        threads in 1usize..8,
    ) {
        let config = PipelineConfig::reference_atomic().with_threads(threads);
        // Classification is irrelevant here; keep it cheap for huge values
        let report = Pipeline::new(config)
            .unwrap()
            .run(IterSource::from(values.iter().copied()), |v| v % 2 == 0)
            .unwrap();

        let expected: i128 = values.iter().map(|&v| i128::from(v)).sum();
        prop_assert_eq!(report.totals.sum, expected);
        prop_assert!(report.workers.iter().all(|w| w.is_balanced()));
    }
}
