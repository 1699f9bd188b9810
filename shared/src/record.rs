use std::{fs::File, io::Read, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{MetricsError, Program, Result};

/// One measured run of a Pi program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    #[serde(rename = "programa")]
    pub program: Program,
    #[serde(rename = "iteraciones")]
    pub iterations: u64,
    #[serde(rename = "hilos")]
    pub threads: u32,
    #[serde(rename = "tiempo_segundos")]
    pub elapsed_seconds: f64,
}

impl BenchmarkRecord {
    pub fn new(program: Program, iterations: u64, threads: u32, elapsed_seconds: f64) -> Self {
        Self {
            program,
            iterations,
            threads,
            elapsed_seconds,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.iterations == 0 {
            return Err("iteration count must be at least 1".into());
        }
        if self.threads == 0 {
            return Err("thread count must be at least 1".into());
        }
        if !self.elapsed_seconds.is_finite() || self.elapsed_seconds < 0.0 {
            return Err(format!(
                "elapsed time must be a finite non-negative number, got {}",
                self.elapsed_seconds
            ));
        }
        Ok(())
    }
}

/// Reads the results table from any CSV source.
///
/// Columns are matched by header name, so their order is free and extra
/// columns are ignored.
pub fn read_records(source: impl Read) -> Result<Vec<BenchmarkRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map_or(0, |p| p.line());
        let record: BenchmarkRecord = row.deserialize(Some(&headers))?;
        record
            .validate()
            .map_err(|reason| MetricsError::InvalidRecord { line, reason })?;
        records.push(record);
    }
    Ok(records)
}

pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<BenchmarkRecord>> {
    let path = path.as_ref();
    let records = read_records(File::open(path)?)?;
    debug!(path = %path.display(), count = records.len(), "loaded benchmark records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_table_in_any_column_order() {
        let csv = "\
hilos,programa,tiempo_segundos,iteraciones,notas
1,01_pi_serial,2.0,10000000,x
4, 05_pi_parallel_mutex ,0.55,10000000,
";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![
                BenchmarkRecord::new(Program::Serial, 10_000_000, 1, 2.0),
                BenchmarkRecord::new(Program::Mutex, 10_000_000, 4, 0.55),
            ]
        );
    }

    #[test]
    fn rejects_zero_threads_with_line_number() {
        let csv = "\
programa,iteraciones,hilos,tiempo_segundos
01_pi_serial,1000,1,0.001
02_pi_parallel_race,1000,0,0.002
";
        match read_records(csv.as_bytes()) {
            Err(MetricsError::InvalidRecord { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected invalid record, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_time() {
        let record = BenchmarkRecord::new(Program::Race, 1000, 2, -0.5);
        assert!(record.validate().is_err());
        let record = BenchmarkRecord::new(Program::Race, 1000, 2, 0.0);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn unknown_program_is_an_error() {
        let csv = "programa,iteraciones,hilos,tiempo_segundos\n06_pi_openmp,1000,2,0.1\n";
        assert!(matches!(
            read_records(csv.as_bytes()),
            Err(MetricsError::Csv(_))
        ));
    }
}
