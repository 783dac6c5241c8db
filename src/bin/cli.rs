//! Weekpulse CLI
//!
//! Command-line interface for Weekpulse operations:
//! - Fetch a date range and print the metric table or chart series
//! - Generate a default config file

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weekpulse::api::dto::TableResponse;
use weekpulse::config::{generate_default_config, Config};
use weekpulse::fetch::{EngagementClient, FetchWorkflow};
use weekpulse::metrics::{ChartPoint, Series};
use weekpulse::store::{MetricsStore, StoreHandle};

#[derive(Parser)]
#[command(name = "weekpulse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Weekly user-engagement metrics from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Engagement API base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch metrics for a date range
    Fetch {
        /// Start date (YYYY-MM-DD, default: configured range)
        #[arg(short, long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        end: Option<String>,
        /// What to print
        #[arg(long, value_enum, default_value = "table")]
        view: View,
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum View {
    /// Metric rows by week
    Table,
    /// Chart series by week
    Chart,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Format {
    Table,
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weekpulse=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Fetch {
            start,
            end,
            view,
            format,
        } => {
            let mut config = match &cli.config {
                Some(path) => Config::load_with_env(path)?,
                None => Config::load_default(),
            };
            if let Some(url) = cli.api_url {
                config.api.base_url = url;
            }

            let mut store = MetricsStore::with_default_range(config.dashboard.default_range_days);
            if let Some(start) = start {
                store.set_start_date(start);
            }
            if let Some(end) = end {
                store.set_end_date(end);
            }

            let client = EngagementClient::new(config.api.client_config())?;
            let store = StoreHandle::new(store);
            let workflow = FetchWorkflow::new(Arc::new(client), store.clone());

            let outcome = workflow.fetch_metrics().await;
            if !outcome.is_loaded() {
                let message = store.read(|s| s.error_message().to_string());
                eprintln!("Fetch failed: {}", message);
                std::process::exit(1);
            }

            let mut out = std::io::stdout().lock();
            match view {
                View::Table => {
                    let table = store.read(TableResponse::from_store);
                    print_table(&mut out, &table, format)?;
                }
                View::Chart => {
                    let points = store.read(MetricsStore::derive_chart_points);
                    print_chart(&mut out, &points, format)?;
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn print_table(out: &mut impl Write, table: &TableResponse, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(table)?)?;
        }
        Format::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            let mut header = vec!["metric".to_string()];
            header.extend(table.week_labels.iter().map(|w| w.to_string()));
            writer.write_record(&header)?;
            for row in &table.rows {
                let mut record = vec![row.metric.clone()];
                record.extend(row.cells.iter().cloned());
                writer.write_record(&record)?;
            }
            writer.flush()?;
        }
        Format::Table => {
            if table.week_labels.is_empty() {
                writeln!(out, "No data for the selected date range")?;
                return Ok(());
            }

            let name_width = table
                .rows
                .iter()
                .map(|r| r.metric.len())
                .max()
                .unwrap_or(0)
                .max("Metric".len());
            let widths: Vec<usize> = table
                .week_labels
                .iter()
                .enumerate()
                .map(|(i, week)| {
                    table
                        .rows
                        .iter()
                        .filter_map(|r| r.cells.get(i))
                        .map(String::len)
                        .max()
                        .unwrap_or(0)
                        .max(week.as_str().len())
                })
                .collect();

            write!(out, "{:<width$}", "Metric", width = name_width)?;
            for (week, width) in table.week_labels.iter().zip(&widths) {
                write!(out, " | {:>width$}", week.as_str(), width = width)?;
            }
            writeln!(out)?;
            writeln!(
                out,
                "{}",
                "-".repeat(name_width + widths.iter().map(|w| w + 3).sum::<usize>())
            )?;

            for row in &table.rows {
                write!(out, "{:<width$}", row.metric, width = name_width)?;
                for (cell, width) in row.cells.iter().zip(&widths) {
                    write!(out, " | {:>width$}", cell, width = width)?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn print_chart(out: &mut impl Write, points: &[ChartPoint], format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(points)?)?;
        }
        Format::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            let mut header = vec!["week_label".to_string()];
            header.extend(Series::ALL.iter().map(|s| s.key().to_string()));
            writer.write_record(&header)?;
            for point in points {
                let mut record = vec![point.week_label.to_string()];
                record.extend(Series::ALL.iter().map(|s| format!("{:.2}", point.get(*s))));
                writer.write_record(&record)?;
            }
            writer.flush()?;
        }
        Format::Table => {
            if points.is_empty() {
                writeln!(out, "No data for the selected date range")?;
                return Ok(());
            }

            write!(out, "{:<12}", "Week")?;
            for series in Series::ALL {
                write!(out, " | {:>13}", series.key())?;
            }
            writeln!(out)?;
            writeln!(out, "{}", "-".repeat(12 + Series::ALL.len() * 16))?;

            for point in points {
                write!(out, "{:<12}", point.week_label.as_str())?;
                for series in Series::ALL {
                    write!(out, " | {:>13.2}", point.get(series))?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
