use crate::config::{Config, LoggingConfig};
use crate::demo;
use crate::driver::{DriveReport, Driver};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "latent")]
#[command(about = "Latent - resumable functions stepped by an external loop", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter (overrides config file and env vars, not RUST_LOG)
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive the non-blocking sample to completion
    Run {
        /// Comma-separated items to sum
        #[arg(long, value_delimiter = ',', default_value = "1,2,3")]
        items: Vec<i64>,

        /// Milliseconds between steps (0 = as fast as possible)
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Fail if not done after this many steps
        #[arg(long)]
        max_steps: Option<u64>,

        /// Print the result and drive report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the blocking counterpart of the sample, sleeping in real time
    Blocking {
        /// Comma-separated items to sum
        #[arg(long, value_delimiter = ',', default_value = "1,2,3")]
        items: Vec<i64>,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Serialize)]
struct RunOutput {
    result: i64,
    #[serde(flatten)]
    report: DriveReport,
}

pub async fn run_cli() -> Result<()> {
    run_with(Cli::parse()).await
}

pub async fn run_with(cli: Cli) -> Result<()> {
    let (tick_ms, max_steps) = match &cli.command {
        Commands::Run {
            tick_ms, max_steps, ..
        } => (*tick_ms, *max_steps),
        _ => (None, None),
    };

    let config = Config::builder()
        .config_path(cli.config)
        .log_filter(cli.log)
        .tick_ms(tick_ms)
        .max_steps(max_steps)
        .build()?;

    init_tracing(&config.logging);

    match cli.command {
        Commands::Run { items, json, .. } => run_sample(&config, items, json).await,
        Commands::Blocking { items } => run_blocking(items).await,
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    // Already installed when driven more than once in-process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_sample(config: &Config, items: Vec<i64>, json: bool) -> Result<()> {
    let mut call = demo::prepare_call(items)?;
    call.start(demo::sum_items_squared)?;

    let report = Driver::new(&config.driver).run(&mut call).await?;
    let result = *call.result::<i64>()?;

    if json {
        let output = RunOutput { result, report };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Result: {}", result);
        println!("Steps:  {}", report.steps);
        println!(
            "Took:   {}ms",
            (report.finished_at - report.started_at).num_milliseconds()
        );
    }

    Ok(())
}

async fn run_blocking(items: Vec<i64>) -> Result<()> {
    let result = tokio::task::spawn_blocking(move || {
        demo::sum_items_squared_blocking(&items, std::thread::sleep)
    })
    .await?
    .context("Sum of items squared overflows i64")?;

    println!("Result: {}", result);
    Ok(())
}
