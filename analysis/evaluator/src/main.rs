use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use shared::{load_records, reduce, BenchmarkRecord, Program, Series};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints speedup and efficiency of the Pi programs
#[derive(Debug, Parser)]
struct Args {
    /// Benchmark results table
    #[arg(default_value = "resultados_benchmark.csv")]
    input: PathBuf,

    /// Workload size to compare at
    #[arg(short, long, default_value_t = 10_000_000)]
    iterations: u64,

    /// Largest thread count to report
    #[arg(short = 't', long, default_value_t = 6)]
    max_threads: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evaluator=info,shared=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let records = load_records(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let iterations = args.iterations;
    let threads = 1..=args.max_threads.max(1);
    let serial = reduce::baseline_time(&records, Program::BASELINE, iterations)?;

    println!("--- Summary ({iterations} iterations, serial {serial:.4}s) ---");

    let parallel = || Program::ALL.into_iter().filter(|&p| p != Program::BASELINE);

    for program in parallel() {
        let speedups =
            reduce::speedup_by_threads(&records, program, iterations, serial, threads.clone());
        if speedups.is_empty() {
            continue;
        }
        println!();
        for (t, speedup) in speedups {
            println!(
                "{} at {t} threads {} serial: {speedup:.02}x",
                program.short_name(),
                text(speedup),
            );
        }
    }

    println!();
    println!("--- Efficiency ---");
    println!();
    let table: Vec<(Program, Series<u32>)> = parallel()
        .map(|p| {
            let efficiency =
                reduce::efficiency_by_threads(&records, p, iterations, serial, threads.clone());
            (p, efficiency)
        })
        .filter(|(_, e)| !e.is_empty())
        .collect();
    print!("{}", efficiency_table(&table, threads.clone()));

    if let Some(line) = busy_wait_line(&records) {
        println!();
        println!("{line}");
    }

    Ok(())
}

fn text(ratio: f64) -> &'static str {
    if ratio > 1. {
        "is faster than"
    } else if ratio < 1. {
        "is slower than"
    } else {
        "is equal to"
    }
}

fn efficiency_table(
    table: &[(Program, Series<u32>)],
    threads: std::ops::RangeInclusive<u32>,
) -> String {
    let mut out = format!("{:>8}", "threads");
    for (program, _) in table {
        out.push_str(&format!("{:>14}", program.short_name()));
    }
    out.push('\n');

    for t in threads {
        out.push_str(&format!("{t:>8}"));
        for (_, series) in table {
            let cell = series
                .iter()
                .find(|&&(k, _)| k == t)
                .map_or_else(|| "-".to_owned(), |&(_, e)| format!("{e:.1}%"));
            out.push_str(&format!("{cell:>14}"));
        }
        out.push('\n');
    }
    out
}

fn busy_wait_line(records: &[BenchmarkRecord]) -> Option<String> {
    let (slow, fast) = (Program::BusyWait, Program::Mutex);
    let iterations = reduce::largest_shared_iterations(records, slow, fast)?;
    let slowdown = reduce::slowdown(records, slow, fast, iterations)?;
    Some(format!(
        "{} at {iterations} iterations {} {}: {:.02}x ({:.4}s vs {:.4}s)",
        slow.short_name(),
        text(1.0 / slowdown.ratio),
        fast.short_name(),
        slowdown.ratio,
        slowdown.slow_seconds,
        slowdown.fast_seconds,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_wording() {
        assert_eq!(text(1.8), "is faster than");
        assert_eq!(text(0.95), "is slower than");
        assert_eq!(text(1.0), "is equal to");
    }

    #[test]
    fn table_marks_missing_thread_counts() {
        let table = vec![(Program::Mutex, vec![(1, 95.24), (3, 80.0)])];
        let rendered = efficiency_table(&table, 1..=3);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("mutex"));
        assert!(lines[1].ends_with("95.2%"));
        assert!(lines[2].ends_with('-'));
        assert!(lines[3].ends_with("80.0%"));
    }

    #[test]
    fn busy_wait_comparison() {
        let records = [
            BenchmarkRecord::new(Program::BusyWait, 10_000_000, 4, 2.68),
            BenchmarkRecord::new(Program::Mutex, 10_000_000, 4, 0.049),
        ];
        let line = busy_wait_line(&records).unwrap();
        assert!(line.starts_with("busy-wait at 10000000 iterations is slower than mutex: 54.69x"));
        assert!(busy_wait_line(&records[..1]).is_none());
    }
}
