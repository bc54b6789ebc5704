use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lap_report::{Order, RaceReport, ReportConfig};

/// Formula 1 qualification report from start/end timing logs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Folder containing start.log, end.log and abbreviations.txt
    #[arg(long)]
    files: PathBuf,

    /// Lap time order
    #[arg(long, value_enum, default_value_t = Order::Asc)]
    order: Order,

    /// Print lap info for a single driver (exact full name)
    #[arg(long)]
    driver: Option<String>,

    /// JSON file overriding file names, cutoff rank and status texts
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report rows as JSON, the hand-over format for whatever
    /// stores drivers and report history
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };

    let mut report = RaceReport::from_folder(&args.files, config)
        .with_context(|| format!("failed to build report from {}", args.files.display()))?;

    if let Some(driver) = &args.driver {
        println!("{}", report.driver_info(driver));
    } else {
        let rows = report.build_report(args.order);
        if args.json {
            let out = serde_json::to_string_pretty(&rows).context("failed to serialize report")?;
            println!("{}", out);
        } else {
            for row in &rows {
                println!("{}", report.render_row(row));
            }
        }
    }

    for (code, msg) in report.validation_errors() {
        tracing::warn!("{}: {}", code, msg);
    }
    Ok(())
}
