use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod cli;
pub mod format;
pub mod render;
pub mod style;

use cli::Args;
use shared::{load_records, Datasets};
use style::ChartStyle;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charts=info,shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let records = load_records(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    info!(count = records.len(), input = %args.input.display(), "records loaded");

    let data = Datasets::build(&records, &args.dataset_params());
    let style = ChartStyle::default().with_size(args.width, args.height);

    let written = render::render_all(&data, &style, &args.out_dir)?;

    println!("Generated {} charts:", written.len());
    for path in written {
        println!("  {}", path.display());
    }

    data.scaling()
        .context("speedup, time by threads and efficiency charts were not generated")?;
    Ok(())
}
