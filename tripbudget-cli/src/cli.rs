use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tripbudget_core::{Config, CostTable, ReportBuilder, ServiceId, source, validate};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tripbudget", version, about = "Trip budget planner CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific service.
    Configure {
        /// Service short name, e.g. "weatherstack" or "exchangerate".
        service: String,
    },

    /// Plan a trip budget for a destination.
    Plan {
        /// Destination city (letters and spaces only).
        destination: String,

        /// Total budget in USD.
        #[arg(long)]
        budget: String,

        /// Trip duration in days.
        #[arg(long)]
        duration: String,

        /// Cost-of-living CSV to use instead of the configured one.
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { service } => configure(&service),
            Command::Plan { destination, budget, duration, dataset } => {
                plan(&destination, &budget, &duration, dataset).await
            }
        }
    }
}

fn configure(service: &str) -> anyhow::Result<()> {
    let id = ServiceId::try_from(service)?;

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()?;

    let mut config = Config::load()?;
    config.upsert_service_api_key(id, api_key);
    config.save()?;

    println!("Saved API key for {id}.");
    Ok(())
}

async fn plan(
    destination: &str,
    budget_raw: &str,
    duration_raw: &str,
    dataset: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Validate before touching config or credentials so a rejected request
    // always answers with its validation message and nothing else runs.
    let request = match validate(destination, budget_raw, duration_raw) {
        Ok(request) => request,
        Err(err) => {
            println!("{err}");
            std::process::exit(1);
        }
    };

    let config = Config::load()?;
    let sources = source::sources_from_config(&config)?;

    let dataset_path = dataset.unwrap_or_else(|| config.dataset_path());
    let costs = match CostTable::load(&dataset_path) {
        Ok(table) => {
            tracing::debug!("Loaded {} cost-of-living rows from {}", table.len(), dataset_path.display());
            table
        }
        Err(err) => {
            tracing::warn!("Cost-of-living table unavailable, continuing without it: {err:#}");
            CostTable::default()
        }
    };

    let builder = ReportBuilder::new(sources, costs);
    let report = builder.build(&request).await;

    print!("{}", report.render());
    Ok(())
}
