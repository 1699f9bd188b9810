//! Property tests for the reducers: grouping and averaging must not depend
//! on the order in which measurements were recorded.

use proptest::prelude::*;
use shared::{reduce, BenchmarkRecord, Program};

fn program_strategy() -> impl Strategy<Value = Program> {
    prop::sample::select(Program::ALL.to_vec())
}

fn record_strategy() -> impl Strategy<Value = BenchmarkRecord> {
    (
        program_strategy(),
        prop::sample::select(vec![1_000u64, 10_000, 1_000_000]),
        1u32..=6,
        0.0f64..5.0,
    )
        .prop_map(|(program, iterations, threads, elapsed)| {
            BenchmarkRecord::new(program, iterations, threads, elapsed)
        })
}

fn records_and_shuffle() -> impl Strategy<Value = (Vec<BenchmarkRecord>, Vec<BenchmarkRecord>)> {
    prop::collection::vec(record_strategy(), 0..64)
        .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
}

proptest! {
    #[test]
    fn mean_time_is_order_independent((records, shuffled) in records_and_shuffle()) {
        for program in Program::ALL {
            prop_assert_eq!(
                reduce::mean_time_by_iterations(&records, program),
                reduce::mean_time_by_iterations(&shuffled, program)
            );
        }
    }

    #[test]
    fn one_entry_per_distinct_iteration_count((records, _) in records_and_shuffle()) {
        for program in Program::ALL {
            let series = reduce::mean_time_by_iterations(&records, program);
            let mut distinct: Vec<u64> = records
                .iter()
                .filter(|r| r.program == program)
                .map(|r| r.iterations)
                .collect();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(series.iter().map(|&(i, _)| i).collect::<Vec<_>>(), distinct);

            for (iterations, mean) in series {
                let matching: Vec<f64> = records
                    .iter()
                    .filter(|r| r.program == program && r.iterations == iterations)
                    .map(|r| r.elapsed_seconds)
                    .collect();
                let expected = matching.iter().sum::<f64>() / matching.len() as f64;
                prop_assert!((mean - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn speedup_is_finite_and_ascending(
        (records, shuffled) in records_and_shuffle(),
        baseline in 0.1f64..5.0,
    ) {
        for program in Program::ALL {
            let series = reduce::speedup_by_threads(&records, program, 1_000_000, baseline, 1..=6);
            prop_assert!(series.iter().all(|(_, s)| s.is_finite()));
            prop_assert!(series.windows(2).all(|w| w[0].0 < w[1].0));
            prop_assert_eq!(
                series,
                reduce::speedup_by_threads(&shuffled, program, 1_000_000, baseline, 1..=6)
            );
        }
    }
}
