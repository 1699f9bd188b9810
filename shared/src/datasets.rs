//! The six result sets the charts are drawn from.

use std::ops::RangeInclusive;

use tracing::{debug, warn};

use crate::{
    reduce::{self, Series, Slowdown},
    BenchmarkRecord, MetricsError, Program, Result,
};

/// Parallel strategies compared at a fixed workload size. The inefficient
/// busy-wait is left out, it would flatten every other line.
pub const PARALLEL_PROGRAMS: [Program; 3] = [Program::Race, Program::BusyWaitCs, Program::Mutex];

pub const OVERHEAD_PROGRAMS: [Program; 4] = [
    Program::Serial,
    Program::Race,
    Program::BusyWaitCs,
    Program::Mutex,
];

pub const BUSY_WAIT_PROGRAMS: [Program; 3] = [Program::Serial, Program::Mutex, Program::BusyWait];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetParams {
    /// Workload size for the thread scaling sets
    pub iterations: u64,
    pub threads: RangeInclusive<u32>,
    /// Largest iteration count in the overhead set
    pub overhead_max_iterations: u64,
}

impl Default for DatasetParams {
    fn default() -> Self {
        Self {
            iterations: 10_000_000,
            threads: 1..=6,
            overhead_max_iterations: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSeries<K> {
    pub program: Program,
    pub points: Series<K>,
}

/// Mean time per thread count next to the serial reference time.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadBars {
    pub threads: Vec<u32>,
    pub series: Vec<ProgramSeries<u32>>,
    pub serial_seconds: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusyWaitComparison {
    pub series: Vec<ProgramSeries<u64>>,
    pub slowdown: Option<Slowdown>,
}

/// Sets measured against the serial baseline at a fixed workload size.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadScaling {
    pub speedup_vs_threads: Vec<ProgramSeries<u32>>,
    pub time_by_threads: ThreadBars,
    pub efficiency_vs_threads: Vec<ProgramSeries<u32>>,
}

impl ThreadScaling {
    fn build(records: &[BenchmarkRecord], params: &DatasetParams, baseline: f64) -> Self {
        let iterations = params.iterations;
        let threads = || params.threads.clone();

        let speedup_vs_threads = collect(&PARALLEL_PROGRAMS, |p| {
            reduce::speedup_by_threads(records, p, iterations, baseline, threads())
        });

        let time_by_threads = ThreadBars {
            threads: reduce::thread_counts(records, iterations)
                .into_iter()
                .filter(|t| params.threads.contains(t))
                .collect(),
            series: collect(&PARALLEL_PROGRAMS, |p| {
                reduce::mean_time_by_threads(records, p, iterations, threads())
            }),
            serial_seconds: baseline,
        };

        let efficiency_vs_threads = collect(&PARALLEL_PROGRAMS, |p| {
            reduce::efficiency_by_threads(records, p, iterations, baseline, threads())
        });

        Self {
            speedup_vs_threads,
            time_by_threads,
            efficiency_vs_threads,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    pub params: DatasetParams,
    pub time_vs_iterations: Vec<ProgramSeries<u64>>,
    /// `None` when there is no serial run at `params.iterations`
    pub scaling: Option<ThreadScaling>,
    pub overhead: Vec<ProgramSeries<u64>>,
    pub busy_wait: BusyWaitComparison,
}

impl Datasets {
    /// Builds every set the records allow. A missing serial baseline only
    /// leaves out the thread scaling sets, see [`Datasets::scaling`].
    pub fn build(records: &[BenchmarkRecord], params: &DatasetParams) -> Self {
        let scaling = match reduce::baseline_time(records, Program::BASELINE, params.iterations) {
            Ok(baseline) => {
                debug!(baseline, iterations = params.iterations, "serial baseline");
                Some(ThreadScaling::build(records, params, baseline))
            }
            Err(err) => {
                warn!("{err}, skipping speedup and efficiency sets");
                None
            }
        };

        let time_vs_iterations = collect(&Program::ALL, |p| {
            reduce::mean_time_by_iterations(records, p)
        });

        let overhead = collect(&OVERHEAD_PROGRAMS, |p| {
            reduce::mean_time_by_iterations_and_threads_averaged(
                records,
                p,
                ..=params.overhead_max_iterations,
            )
        });

        let busy_wait = BusyWaitComparison {
            series: collect(&BUSY_WAIT_PROGRAMS, |p| {
                reduce::mean_time_by_iterations(records, p)
            }),
            slowdown: reduce::largest_shared_iterations(records, Program::BusyWait, Program::Mutex)
                .and_then(|i| reduce::slowdown(records, Program::BusyWait, Program::Mutex, i)),
        };

        Self {
            params: params.clone(),
            time_vs_iterations,
            scaling,
            overhead,
            busy_wait,
        }
    }

    /// The thread scaling sets, or [`MetricsError::MissingBaseline`] when the
    /// serial run they are measured against does not exist.
    pub fn scaling(&self) -> Result<&ThreadScaling> {
        self.scaling.as_ref().ok_or(MetricsError::MissingBaseline {
            program: Program::BASELINE,
            iterations: self.params.iterations,
        })
    }
}

/// Programs without any point are dropped.
fn collect<K>(
    programs: &[Program],
    series: impl Fn(Program) -> Series<K>,
) -> Vec<ProgramSeries<K>> {
    programs
        .iter()
        .map(|&program| ProgramSeries {
            program,
            points: series(program),
        })
        .filter(|s| !s.points.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<BenchmarkRecord> {
        let mut records = Vec::new();
        for iterations in [1000, 10_000, 10_000_000] {
            let scale = iterations as f64 / 10_000_000.0;
            let rec = |program, threads, elapsed| {
                BenchmarkRecord::new(program, iterations, threads, elapsed)
            };
            records.push(rec(Program::Serial, 1, 0.2 * scale + 1e-6));
            for threads in 1..=4 {
                let t = threads as f64;
                records.push(rec(Program::Race, threads, 0.2 * scale / t + 2e-5));
                records.push(rec(Program::Mutex, threads, 0.2 * scale / t + 5e-5));
                records.push(rec(Program::BusyWait, threads, 10.0 * scale + 1e-4));
            }
        }
        records
    }

    #[test]
    fn builds_all_sets() {
        let params = DatasetParams::default();
        let data = Datasets::build(&sample(), &params);
        let scaling = data.scaling().unwrap();

        let programs =
            |s: &[ProgramSeries<u64>]| s.iter().map(|s| s.program).collect::<Vec<_>>();
        assert_eq!(
            programs(&data.time_vs_iterations),
            vec![Program::Serial, Program::Race, Program::BusyWait, Program::Mutex]
        );
        assert_eq!(
            programs(&data.overhead),
            vec![Program::Serial, Program::Race, Program::Mutex]
        );
        assert!(data
            .overhead
            .iter()
            .all(|s| s.points.iter().all(|&(i, _)| i <= 10_000)));

        // BusyWaitCs has no data and is dropped rather than drawn empty
        assert_eq!(scaling.speedup_vs_threads.len(), 2);
        assert_eq!(scaling.efficiency_vs_threads.len(), 2);
        assert_eq!(scaling.time_by_threads.threads, vec![1, 2, 3, 4]);
        assert_eq!(scaling.time_by_threads.serial_seconds, 0.2 + 1e-6);

        let slowdown = data.busy_wait.slowdown.unwrap();
        assert_eq!(slowdown.iterations, 10_000_000);
        assert!(slowdown.ratio > 1.0);
        assert_eq!(data.busy_wait.series.len(), 3);
    }

    #[test]
    fn missing_baseline_only_drops_thread_scaling() {
        let records: Vec<_> = sample()
            .into_iter()
            .filter(|r| !(r.program == Program::Serial && r.iterations == 10_000_000))
            .collect();
        let data = Datasets::build(&records, &DatasetParams::default());

        assert!(data.scaling.is_none());
        assert!(matches!(
            data.scaling(),
            Err(MetricsError::MissingBaseline {
                program: Program::Serial,
                iterations: 10_000_000
            })
        ));
        assert_eq!(data.time_vs_iterations.len(), 4);
        assert_eq!(data.overhead.len(), 3);
        assert!(data.busy_wait.slowdown.is_some());
    }
}
