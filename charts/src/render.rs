use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use plotters::{coord::Shift, prelude::*};
use shared::{Datasets, Program, ProgramSeries, Slowdown};
use tracing::{debug, info, warn};

use crate::{
    format::{format_count, format_thousands, format_time},
    style::ChartStyle,
};

type Chart = fn(&Datasets, &ChartStyle, &Path) -> Result<()>;

/// File name, renderer and whether the chart is drawn against the serial
/// baseline.
const CHARTS: [(&str, Chart, bool); 6] = [
    ("chart_1_time_vs_iterations.png", time_vs_iterations, false),
    ("chart_2_speedup_vs_threads.png", speedup_vs_threads, true),
    ("chart_3_time_by_threads.png", time_by_threads, true),
    ("chart_4_efficiency.png", efficiency_vs_threads, true),
    ("chart_5_overhead.png", overhead, false),
    ("chart_6_busy_wait.png", busy_wait, false),
];

/// Tick positions on iteration axes
const ITERATION_TICKS: [u64; 13] = [
    1_000, 2_000, 5_000, 10_000, 20_000, 50_000, 100_000, 200_000, 500_000, 1_000_000,
    2_000_000, 5_000_000, 10_000_000,
];

/// Renders the charts into `out_dir` and returns the written files.
///
/// Charts drawn against the serial baseline are skipped when the datasets
/// have none; the caller decides whether that is fatal.
pub fn render_all(data: &Datasets, style: &ChartStyle, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(CHARTS.len());
    for (name, chart, needs_baseline) in CHARTS {
        if needs_baseline && data.scaling.is_none() {
            warn!(name, "no serial baseline, chart skipped");
            continue;
        }
        let path = out_dir.join(name);
        chart(data, style, &path).with_context(|| format!("failed to render {name}"))?;
        info!(path = %path.display(), "chart written");
        written.push(path);
    }
    Ok(written)
}

fn time_vs_iterations(data: &Datasets, style: &ChartStyle, path: &Path) -> Result<()> {
    log_time_chart(
        path,
        "Elapsed time vs iterations (mean over thread counts)",
        &data.time_vs_iterations,
        style,
        None,
        None,
    )
}

fn speedup_vs_threads(data: &Datasets, style: &ChartStyle, path: &Path) -> Result<()> {
    let scaling = data.scaling()?;
    let (first, last) = thread_bounds(data);
    let ideal = [(first, first), (last, last)];
    let y_max = max_value(&scaling.speedup_vs_threads).max(last) * 1.1;
    thread_line_chart(
        path,
        &format!(
            "Speedup vs threads ({} iterations)",
            format_count(data.params.iterations as f64)
        ),
        "Speedup",
        &scaling.speedup_vs_threads,
        (&ideal[..], "Ideal speedup"),
        0.0..y_max,
        data,
        style,
    )
}

fn efficiency_vs_threads(data: &Datasets, style: &ChartStyle, path: &Path) -> Result<()> {
    let scaling = data.scaling()?;
    let (first, last) = thread_bounds(data);
    let ideal = [(first, 100.0), (last, 100.0)];
    let y_max = max_value(&scaling.efficiency_vs_threads).max(120.0);
    let y_min = min_value(&scaling.efficiency_vs_threads).min(0.0);
    thread_line_chart(
        path,
        &format!(
            "Parallel efficiency vs threads ({} iterations)",
            format_count(data.params.iterations as f64)
        ),
        "Efficiency (%)",
        &scaling.efficiency_vs_threads,
        (&ideal[..], "Ideal efficiency (100%)"),
        y_min..y_max * 1.05,
        data,
        style,
    )
}

fn time_by_threads(data: &Datasets, style: &ChartStyle, path: &Path) -> Result<()> {
    let bars = &data.scaling()?.time_by_threads;
    let categories: Vec<String> = bars.threads.iter().map(u32::to_string).collect();
    let groups: Vec<(Program, Vec<Option<f64>>)> = bars
        .series
        .iter()
        .map(|s| {
            let values = bars.threads.iter().map(|t| lookup(&s.points, t)).collect();
            (s.program, values)
        })
        .collect();

    grouped_bars(
        path,
        &format!(
            "Elapsed time per strategy ({} iterations)",
            format_count(data.params.iterations as f64)
        ),
        ("Threads", "Elapsed time"),
        &categories,
        &groups,
        Some((Program::Serial, bars.serial_seconds)),
        &|y| format_time(*y),
        style,
    )
}

fn overhead(data: &Datasets, style: &ChartStyle, path: &Path) -> Result<()> {
    let mut iterations: Vec<u64> = data
        .overhead
        .iter()
        .flat_map(|s| s.points.iter().map(|&(i, _)| i))
        .collect();
    iterations.sort_unstable();
    iterations.dedup();

    let categories: Vec<String> = iterations.iter().map(|&i| format_thousands(i)).collect();
    let groups: Vec<(Program, Vec<Option<f64>>)> = data
        .overhead
        .iter()
        .map(|s| {
            let micros = iterations
                .iter()
                .map(|i| lookup(&s.points, i).map(|t| t * 1e6))
                .collect();
            (s.program, micros)
        })
        .collect();

    grouped_bars(
        path,
        "Parallelization overhead at low iteration counts (mean over threads)",
        ("Iterations", "Mean elapsed time (µs)"),
        &categories,
        &groups,
        None,
        &|y| format!("{y:.0}"),
        style,
    )
}

fn busy_wait(data: &Datasets, style: &ChartStyle, path: &Path) -> Result<()> {
    log_time_chart(
        path,
        "Busy-waiting inside the loop",
        &data.busy_wait.series,
        style,
        Some(Program::BusyWait),
        data.busy_wait.slowdown.as_ref(),
    )
}

fn canvas<'a>(
    path: &'a Path,
    style: &ChartStyle,
) -> Result<DrawingArea<BitMapBackend<'a>, Shift>> {
    let root = BitMapBackend::new(path, style.size).into_drawing_area();
    root.fill(&WHITE)?;
    Ok(root)
}

/// Log/log time chart. `highlight` is drawn dashed and thicker with cross
/// markers; `slowdown` adds an annotation at the slow point.
fn log_time_chart(
    path: &Path,
    caption: &str,
    series: &[ProgramSeries<u64>],
    style: &ChartStyle,
    highlight: Option<Program>,
    slowdown: Option<&Slowdown>,
) -> Result<()> {
    let root = canvas(path, style)?;
    let font = style.font.as_str();

    let all_points = || series.iter().flat_map(|s| s.points.iter());
    let (x0, x1) = log_bounds(all_points().map(|p| p.0 as f64), 1.3);
    let (y0, y1) = log_bounds(all_points().map(|p| p.1), 2.0);
    let mut ticks: Vec<f64> = ITERATION_TICKS
        .iter()
        .map(|&t| t as f64)
        .filter(|t| (x0..=x1).contains(t))
        .collect();
    if ticks.is_empty() {
        ticks = vec![x0, x1];
    }

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font, style.caption_size))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(
            (x0..x1).log_scale().with_key_points(ticks),
            (y0..y1).log_scale(),
        )?;

    chart
        .configure_mesh()
        .x_desc("Iterations")
        .y_desc("Elapsed time")
        .x_label_formatter(&|x| format_count(*x))
        .y_label_formatter(&|y| format_time(*y))
        .axis_desc_style((font, style.label_size + 2))
        .label_style((font, style.label_size))
        .draw()?;

    for s in series {
        let color = style.color(s.program);
        let points: Vec<(f64, f64)> = s
            .points
            .iter()
            .filter(|p| p.1 > 0.0)
            .map(|&(i, t)| (i as f64, t))
            .collect();

        if highlight == Some(s.program) {
            let line = color.stroke_width(4);
            chart
                .draw_series(DashedLineSeries::new(points.clone(), 14, 6, line))?
                .label(style.label(s.program))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));
            chart.draw_series(
                points
                    .iter()
                    .map(|&p| Cross::new(p, 7, color.stroke_width(3))),
            )?;
        } else {
            let line = color.stroke_width(2);
            chart
                .draw_series(LineSeries::new(points.clone(), line))?
                .label(style.label(s.program))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));
            chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;
        }
    }

    if let Some(slowdown) = slowdown.filter(|s| s.slow_seconds > 0.0) {
        let text = format!(
            "{} vs {} ({:.0}x slower)",
            format_time(slowdown.slow_seconds),
            format_time(slowdown.fast_seconds),
            slowdown.ratio
        );
        let anchor = (slowdown.iterations as f64, slowdown.slow_seconds);
        let text_size = style.label_size + 4;
        // glyphs average about 0.6 of the font size
        let text_width = (text.chars().count() as f64 * f64::from(text_size) * 0.6) as i32;
        let offset = annotation_offset(anchor.0, (x0, x1), text_width);
        chart.draw_series(std::iter::once(
            EmptyElement::at(anchor)
                + Circle::new((0, 0), 9, RED.stroke_width(3))
                + Text::new(text, offset, (font, text_size).into_font().color(&RED)),
        ))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((font, style.label_size))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn thread_line_chart(
    path: &Path,
    caption: &str,
    y_desc: &str,
    series: &[ProgramSeries<u32>],
    (ideal, ideal_label): (&[(f64, f64)], &str),
    y_range: std::ops::Range<f64>,
    data: &Datasets,
    style: &ChartStyle,
) -> Result<()> {
    let root = canvas(path, style)?;
    let font = style.font.as_str();
    let (first, last) = thread_bounds(data);

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font, style.caption_size))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d((first - 0.25)..(last + 0.25), y_range)?;

    chart
        .configure_mesh()
        .x_desc("Threads")
        .y_desc(y_desc)
        .x_labels((last - first) as usize + 2)
        .x_label_formatter(&integer_label)
        .y_label_formatter(&|y| format!("{y:.1}"))
        .axis_desc_style((font, style.label_size + 2))
        .label_style((font, style.label_size))
        .draw()?;

    let ideal_style = BLACK.mix(0.5).stroke_width(2);
    chart
        .draw_series(DashedLineSeries::new(ideal.to_vec(), 12, 6, ideal_style))?
        .label(ideal_label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ideal_style));

    for s in series {
        let color = style.color(s.program);
        let line = color.stroke_width(2);
        let points: Vec<(f64, f64)> = s.points.iter().map(|&(t, v)| (f64::from(t), v)).collect();
        chart
            .draw_series(LineSeries::new(points.clone(), line))?
            .label(style.label(s.program))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 5, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font((font, style.label_size))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Bars grouped per category, one bar per program. `None` values leave a gap.
#[allow(clippy::too_many_arguments)]
fn grouped_bars(
    path: &Path,
    caption: &str,
    (x_desc, y_desc): (&str, &str),
    categories: &[String],
    groups: &[(Program, Vec<Option<f64>>)],
    reference: Option<(Program, f64)>,
    y_format: &dyn Fn(&f64) -> String,
    style: &ChartStyle,
) -> Result<()> {
    let root = canvas(path, style)?;
    let font = style.font.as_str();

    let y_max = groups
        .iter()
        .flat_map(|(_, values)| values.iter().flatten().copied())
        .chain(reference.map(|r| r.1))
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.15 } else { 1.0 };
    let n = categories.len().max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font, style.caption_size))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(-0.5..n - 0.5, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(categories.len() + 1)
        .x_label_formatter(&|x| category_label(categories, *x))
        .y_label_formatter(y_format)
        .axis_desc_style((font, style.label_size + 2))
        .label_style((font, style.label_size))
        .draw()?;

    let width = 0.8 / groups.len().max(1) as f64;
    for (index, (program, values)) in groups.iter().enumerate() {
        let color = style.color(*program);
        let offset = (index as f64 - groups.len() as f64 / 2.0 + 0.5) * width;
        chart
            .draw_series(values.iter().enumerate().filter_map(|(c, value)| {
                let x = c as f64 + offset;
                value.map(|v| {
                    Rectangle::new([(x - width / 2.0, 0.0), (x + width / 2.0, v)], color.filled())
                })
            }))?
            .label(style.label(*program))
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], color.filled()));
    }

    if let Some((program, value)) = reference {
        let line = style.color(program).mix(0.8).stroke_width(2);
        chart
            .draw_series(DashedLineSeries::new(
                vec![(-0.5, value), (n - 0.5, value)],
                12,
                6,
                line,
            ))?
            .label(format!("{} (reference)", style.label(program)))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font((font, style.label_size))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    debug!(categories = categories.len(), groups = groups.len(), "bars drawn");
    Ok(())
}

fn thread_bounds(data: &Datasets) -> (f64, f64) {
    let threads = &data.params.threads;
    (f64::from(*threads.start()), f64::from(*threads.end()))
}

fn lookup<K: PartialEq>(points: &[(K, f64)], key: &K) -> Option<f64> {
    points.iter().find(|(k, _)| k == key).map(|&(_, v)| v)
}

fn max_value(series: &[ProgramSeries<u32>]) -> f64 {
    series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.1))
        .fold(0.0, f64::max)
}

fn min_value(series: &[ProgramSeries<u32>]) -> f64 {
    series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.1))
        .fold(0.0, f64::min)
}

/// Padded bounds of the positive values, for a log axis.
fn log_bounds(values: impl Iterator<Item = f64>, pad: f64) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| *v > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo.is_finite() {
        (lo / pad, hi * pad)
    } else {
        (1.0, 10.0)
    }
}

/// Label of the category at integer position `x`, empty in between.
fn category_label(categories: &[String], x: f64) -> String {
    match integer_position(x) {
        Some(index) if index >= 0 => categories
            .get(index as usize)
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Axis label for whole numbers only, so a fractional tick stays blank.
fn integer_label(x: &f64) -> String {
    integer_position(*x).map_or_else(String::new, |i| i.to_string())
}

fn integer_position(x: f64) -> Option<i64> {
    let rounded = x.round();
    ((x - rounded).abs() <= 1e-6).then_some(rounded as i64)
}

/// Pixel offset of the annotation text from its anchor: to the left of
/// anchors in the right half of the log x range, to the right otherwise.
fn annotation_offset(anchor: f64, (x0, x1): (f64, f64), text_width: i32) -> (i32, i32) {
    let span = (x1 / x0).ln();
    let position = if span > 0.0 { (anchor / x0).ln() / span } else { 0.0 };
    if position > 0.5 {
        (-text_width - 16, 14)
    } else {
        (16, 14)
    }
}
