use thiserror::Error;

use crate::Program;

#[derive(Debug, Error)]
pub enum MetricsError {
    /// No record of the reference program at the requested workload size.
    #[error("no baseline measurement for {program} at {iterations} iterations")]
    MissingBaseline { program: Program, iterations: u64 },

    /// A duration that cannot be used as a ratio denominator.
    #[error("unusable elapsed time {elapsed}s for {program} ({iterations} iterations, {threads} threads)")]
    MeasurementError {
        program: Program,
        iterations: u64,
        threads: u32,
        elapsed: f64,
    },

    #[error("invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MetricsError>;
