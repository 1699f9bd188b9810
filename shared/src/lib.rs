//! Benchmark records of the Pi programs and the metrics derived from them.

pub mod datasets;
pub mod error;
pub mod program;
pub mod record;
pub mod reduce;

pub use datasets::{DatasetParams, Datasets, ProgramSeries, ThreadScaling};
pub use error::{MetricsError, Result};
pub use program::Program;
pub use record::{load_records, read_records, BenchmarkRecord};
pub use reduce::{Series, Slowdown};
