//! Reductions from raw measurements to the series every chart is drawn from.
//!
//! All functions are pure: they borrow the record set and return freshly
//! computed, ascending series. Group means are summed in sorted order so the
//! result does not depend on the order of the input records.

use std::{
    collections::BTreeMap,
    ops::{RangeBounds, RangeInclusive},
};

use tracing::warn;

use crate::{BenchmarkRecord, MetricsError, Program, Result};

/// Ordered `(key, value)` pairs, ascending by key.
pub type Series<K> = Vec<(K, f64)>;

/// Mean elapsed time per iteration count, averaged over all thread counts.
pub fn mean_time_by_iterations(records: &[BenchmarkRecord], program: Program) -> Series<u64> {
    mean_time_by_iterations_and_threads_averaged(records, program, ..)
}

/// Mean elapsed time per iteration count for the iteration counts inside
/// `iterations_subset`. Every thread count present for an iteration count
/// contributes to the same mean.
pub fn mean_time_by_iterations_and_threads_averaged(
    records: &[BenchmarkRecord],
    program: Program,
    iterations_subset: impl RangeBounds<u64>,
) -> Series<u64> {
    group_mean(
        records
            .iter()
            .filter(|r| r.program == program && iterations_subset.contains(&r.iterations))
            .map(|r| (r.iterations, r.elapsed_seconds)),
    )
}

/// Mean elapsed time per thread count at a fixed workload size.
///
/// Thread counts without a measurement are left out.
pub fn mean_time_by_threads(
    records: &[BenchmarkRecord],
    program: Program,
    iterations: u64,
    thread_range: RangeInclusive<u32>,
) -> Series<u32> {
    group_mean(
        records
            .iter()
            .filter(|r| {
                r.program == program
                    && r.iterations == iterations
                    && thread_range.contains(&r.threads)
            })
            .map(|r| (r.threads, r.elapsed_seconds)),
    )
}

/// Elapsed time of the first `baseline_program` record at `iterations`.
pub fn baseline_time(
    records: &[BenchmarkRecord],
    baseline_program: Program,
    iterations: u64,
) -> Result<f64> {
    records
        .iter()
        .find(|r| r.program == baseline_program && r.iterations == iterations)
        .map(|r| r.elapsed_seconds)
        .ok_or(MetricsError::MissingBaseline {
            program: baseline_program,
            iterations,
        })
}

/// Speedup of `program` over `baseline_time` for every measured thread count
/// in `thread_range`.
///
/// Missing thread counts are omitted. Points with a non-positive elapsed time
/// are reported as [`MetricsError::MeasurementError`] in the log and skipped.
pub fn speedup_by_threads(
    records: &[BenchmarkRecord],
    program: Program,
    iterations: u64,
    baseline_time: f64,
    thread_range: RangeInclusive<u32>,
) -> Series<u32> {
    mean_time_by_threads(records, program, iterations, thread_range)
        .into_iter()
        .filter_map(|(threads, elapsed)| {
            match speedup(baseline_time, elapsed, program, iterations, threads) {
                Ok(speedup) => Some((threads, speedup)),
                Err(err) => {
                    warn!("skipping point: {err}");
                    None
                }
            }
        })
        .collect()
}

/// Parallel efficiency in percent, `speedup / threads * 100`. Not clamped.
pub fn efficiency_by_threads(
    records: &[BenchmarkRecord],
    program: Program,
    iterations: u64,
    baseline_time: f64,
    thread_range: RangeInclusive<u32>,
) -> Series<u32> {
    speedup_by_threads(records, program, iterations, baseline_time, thread_range)
        .into_iter()
        .map(|(threads, speedup)| (threads, speedup / threads as f64 * 100.0))
        .collect()
}

/// Distinct thread counts measured at `iterations`, ascending.
pub fn thread_counts(records: &[BenchmarkRecord], iterations: u64) -> Vec<u32> {
    let mut threads: Vec<u32> = records
        .iter()
        .filter(|r| r.iterations == iterations)
        .map(|r| r.threads)
        .collect();
    threads.sort_unstable();
    threads.dedup();
    threads
}

/// How much slower one program is than another at the same workload size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slowdown {
    pub slow: Program,
    pub fast: Program,
    pub iterations: u64,
    pub slow_seconds: f64,
    pub fast_seconds: f64,
    pub ratio: f64,
}

/// Compares the mean times of `slow` and `fast` at `iterations`.
///
/// Returns `None` when either program has no data there or the reference
/// time of `fast` is not positive.
pub fn slowdown(
    records: &[BenchmarkRecord],
    slow: Program,
    fast: Program,
    iterations: u64,
) -> Option<Slowdown> {
    let slow_seconds = mean_time_at(records, slow, iterations)?;
    let fast_seconds = mean_time_at(records, fast, iterations)?;
    if fast_seconds <= 0.0 {
        warn!(%fast, iterations, "reference time is zero, no slowdown");
        return None;
    }
    Some(Slowdown {
        slow,
        fast,
        iterations,
        slow_seconds,
        fast_seconds,
        ratio: slow_seconds / fast_seconds,
    })
}

/// Largest iteration count measured for both programs.
pub fn largest_shared_iterations(
    records: &[BenchmarkRecord],
    a: Program,
    b: Program,
) -> Option<u64> {
    let measured = |program: Program| {
        records
            .iter()
            .filter(move |r| r.program == program)
            .map(|r| r.iterations)
    };
    measured(a).filter(|i| measured(b).any(|j| j == *i)).max()
}

fn mean_time_at(records: &[BenchmarkRecord], program: Program, iterations: u64) -> Option<f64> {
    mean_time_by_iterations_and_threads_averaged(records, program, iterations..=iterations)
        .first()
        .map(|&(_, mean)| mean)
}

fn speedup(
    baseline_time: f64,
    elapsed: f64,
    program: Program,
    iterations: u64,
    threads: u32,
) -> Result<f64> {
    if elapsed > 0.0 {
        Ok(baseline_time / elapsed)
    } else {
        Err(MetricsError::MeasurementError {
            program,
            iterations,
            threads,
            elapsed,
        })
    }
}

fn group_mean<K: Ord>(items: impl Iterator<Item = (K, f64)>) -> Series<K> {
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for (key, value) in items {
        groups.entry(key).or_default().push(value);
    }
    groups
        .into_iter()
        .map(|(key, mut values)| {
            values.sort_by(f64::total_cmp);
            let sum: f64 = values.iter().sum();
            (key, sum / values.len() as f64)
        })
        .collect()
}
