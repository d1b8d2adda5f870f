mod config;
mod processor;
mod render;
mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use splitcheck_core::{ItemId, LineItems, PaymentMethod, SplitId, SplitSession};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::CliConfig;
use crate::processor::SimulatedProcessor;
use crate::render::SummaryTable;
use crate::script::{load_script, replay};

#[derive(Parser)]
#[command(name = "splitcheck")]
#[command(about = "Split a restaurant check across payers and settle each share", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./splitcheck.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split the built-in sample order between two payers and settle it
    Demo,

    /// Replay a script of interactions against an order
    Run {
        /// Order items as a JSON array
        #[arg(long)]
        order: Option<PathBuf>,

        /// Actions as a JSON array
        #[arg(long)]
        script: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the built-in sample order as JSON
    SampleOrder,
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn load_order(path: Option<&PathBuf>) -> Result<LineItems> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read order {}", path.display()))?;
            LineItems::from_json(&raw).with_context(|| format!("invalid order {}", path.display()))
        }
        None => Ok(LineItems::sample()),
    }
}

fn new_session(items: LineItems, config: &CliConfig) -> SplitSession {
    SplitSession::new(items, config.session.clone()).with_observer(|| {
        info!("Every share is paid, table can be closed");
    })
}

async fn demo(config: &CliConfig) -> Result<()> {
    let processor = SimulatedProcessor::new(&config.processor);
    let mut session = new_session(LineItems::sample(), config);
    let (first, second) = (SplitId(1), SplitId(2));

    session.transfer_item(&ItemId::from("1"), first, second);
    session.transfer_item(&ItemId::from("3"), first, second);

    for (split, method) in [(first, PaymentMethod::Card), (second, PaymentMethod::Cash)] {
        if let Err(e) = session.settle(split, method, &processor).await {
            error!("{}", e);
        }
    }

    let summary = session.summary();
    print!("{}", SummaryTable::new(&summary, session.config()));
    Ok(())
}

async fn run(config: &CliConfig, order: Option<&PathBuf>, script: &PathBuf, json: bool) -> Result<()> {
    let items = load_order(order)?;
    let actions = load_script(script)?;
    let processor = SimulatedProcessor::new(&config.processor);
    let mut session = new_session(items, config);

    let report = replay(&mut session, &actions, &processor).await;
    for failure in &report.failed_payments {
        eprintln!("payment failed: {}", failure);
    }

    let summary = session.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", SummaryTable::new(&summary, session.config()));
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    init_logging(&config.log_level);

    match &cli.command {
        Commands::Demo => demo(&config).await?,
        Commands::Run { order, script, json } => run(&config, order.as_ref(), script, *json).await?,
        Commands::SampleOrder => println!("{}", serde_json::to_string_pretty(&LineItems::sample())?),
    }

    Ok(())
}
