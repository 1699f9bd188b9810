use std::path::PathBuf;

use clap::Parser;
use shared::DatasetParams;

/// Renders the Pi benchmark charts
#[derive(Debug, Clone, Parser)]
pub struct Args {
    /// Benchmark results table
    #[arg(default_value = "resultados_benchmark.csv")]
    pub input: PathBuf,

    /// Directory the PNG files are written to
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Workload size used for the speedup and efficiency charts
    #[arg(short, long, default_value_t = 10_000_000)]
    pub iterations: u64,

    /// Largest thread count shown on the thread axis
    #[arg(short = 't', long, default_value_t = 6)]
    pub max_threads: u32,

    /// Largest iteration count in the overhead chart
    #[arg(long, default_value_t = 10_000)]
    pub overhead_max: u64,

    /// Image width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}

impl Args {
    pub fn dataset_params(&self) -> DatasetParams {
        DatasetParams {
            iterations: self.iterations,
            threads: 1..=self.max_threads.max(1),
            overhead_max_iterations: self.overhead_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_run() {
        let args = Args::parse_from(["charts"]);
        assert_eq!(args.input, PathBuf::from("resultados_benchmark.csv"));
        assert_eq!(args.dataset_params(), DatasetParams::default());
    }

    #[test]
    fn zero_threads_still_covers_the_serial_run() {
        let args = Args::parse_from(["charts", "data.csv", "-t", "0", "-i", "5000000"]);
        let params = args.dataset_params();
        assert_eq!(params.threads, 1..=1);
        assert_eq!(params.iterations, 5_000_000);
    }
}
