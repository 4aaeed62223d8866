//! ganttplot CLI - Gantt chart engine
//!
//! Command-line interface for loading, validating, and rendering schedules.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ganttplot_core::{Backend, ChartConfig, TaskRecord};
use ganttplot_layout::Figure;
use ganttplot_render::SvgBackend;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ganttplot")]
#[command(author, version, about = "Gantt chart engine", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a schedule file
    Check {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Render a schedule to a chart
    Render {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (svg, json)
        #[arg(short, long, default_value = "svg")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Date mapped to the chart's left edge (defaults to the earliest
        /// date in the schedule)
        #[arg(long, value_name = "YYYY-MM-DD")]
        project_start: Option<NaiveDate>,

        /// Horizontal scale in pixels per day
        #[arg(long, default_value_t = 20.0)]
        pixels_per_day: f64,

        /// Height of one task row in pixels
        #[arg(long, default_value_t = 28.0)]
        row_height: f64,

        /// Chart title
        #[arg(short, long)]
        title: Option<String>,

        /// Order rows so predecessors appear above successors
        #[arg(long)]
        topological: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check { file }) => check(&file),
        Some(Commands::Render {
            file,
            format,
            output,
            project_start,
            pixels_per_day,
            row_height,
            title,
            topological,
        }) => render(
            &file,
            &format,
            output.as_deref(),
            project_start,
            pixels_per_day,
            row_height,
            title,
            topological,
        ),
        None => {
            println!("ganttplot - Gantt chart engine");
            println!("Run with --help for usage information");
            Ok(())
        }
    }
}

fn check(file: &std::path::Path) -> Result<()> {
    let records = ganttplot_loader::load_path(file)
        .with_context(|| format!("failed to load {}", file.display()))?;

    let edges: usize = records.iter().map(|r| r.predecessors.len()).sum();
    let span = date_span(&records);

    println!("{}: OK", file.display());
    println!("  tasks:        {}", records.len());
    println!("  dependencies: {edges}");
    match span {
        Some((first, last)) => println!("  date span:    {first} .. {last}"),
        None => println!("  date span:    (no dates)"),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn render(
    file: &std::path::Path,
    format: &str,
    output: Option<&std::path::Path>,
    project_start: Option<NaiveDate>,
    pixels_per_day: f64,
    row_height: f64,
    title: Option<String>,
    topological: bool,
) -> Result<()> {
    let records = ganttplot_loader::load_path(file)
        .with_context(|| format!("failed to load {}", file.display()))?;

    let start = project_start
        .or_else(|| date_span(&records).map(|(first, _)| first))
        .context("schedule has no dates; pass --project-start")?;

    let mut config = ChartConfig::new(start)
        .pixels_per_day(pixels_per_day)
        .row_height(row_height);
    if let Some(title) = title {
        config = config.title(title);
    }
    if topological {
        config = config.topological_rows();
    }

    let figure = Figure::new(config)?;
    let primitives = figure.draw(&records)?;
    info!(
        tasks = records.len(),
        primitives = primitives.len(),
        "layout pass complete"
    );

    let rendered = match format {
        "svg" => SvgBackend::new().paint(&primitives)?,
        "json" => serde_json::to_string_pretty(&primitives)?,
        other => bail!("unknown format '{other}' (expected svg or json)"),
    };

    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Earliest and latest dates appearing anywhere in the schedule
fn date_span(records: &[TaskRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let dates: Vec<NaiveDate> = records
        .iter()
        .flat_map(|r| [r.planned_start, r.planned_end, r.actual_start, r.actual_end])
        .flatten()
        .collect();
    match (dates.iter().min(), dates.iter().max()) {
        (Some(&first), Some(&last)) => Some((first, last)),
        _ => None,
    }
}
