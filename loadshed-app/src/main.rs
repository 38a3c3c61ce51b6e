use anyhow::Result;
use clap::{Parser, Subcommand};
use loadshed_client::{OmitEmpty, Province, Stage};
use loadshed_common::observability::init_logging;
use serde::Serialize;
use std::path::PathBuf;
mod setup;

/// Query the Eskom loadshedding API.
#[derive(Debug, Parser)]
#[command(name = "loadshed", version)]
struct Cli {
    /// YAML config file (defaults to the user config dir and ./loadshed.yaml).
    #[arg(long, short, env = "LOADSHED_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Current loadshedding stage.
    Status,
    /// Municipalities in a province (name or id 1-9).
    Municipalities { province: Province },
    /// One page of suburbs within a municipality.
    Suburbs {
        municipality_id: String,
        term: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Suburbs across all municipalities.
    Search {
        term: String,
        #[arg(long)]
        max: Option<u32>,
        /// Leave out suburbs without schedule entries.
        #[arg(long)]
        omit_empty: bool,
    },
    /// Outage windows for a suburb at one or more stages.
    Schedule {
        suburb_id: String,
        #[arg(required = true, allow_negative_numbers = true)]
        stages: Vec<Stage>,
    },
}

#[derive(Serialize)]
struct StatusOut {
    stage: Stage,
    name: String,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = setup::load_config(cli.config.as_deref())?;
    let log_path = init_logging(cfg.logging.to_log_config("loadshed"))?;
    tracing::debug!(path = %log_path.display(), "loadshed.logging.ready");

    let client = setup::build_client(&cfg.client)?;

    match cli.command {
        Command::Status => {
            let stage = client.status().await?;
            print_json(&StatusOut {
                stage,
                name: stage.name(),
            })
        }
        Command::Municipalities { province } => {
            print_json(&client.municipalities(province).await?)
        }
        Command::Suburbs {
            municipality_id,
            term,
            page,
        } => print_json(&client.suburbs(&municipality_id, &term, page).await?),
        Command::Search {
            term,
            max,
            omit_empty,
        } => {
            let mut found = client.search_suburbs(&term, max).await?;
            if omit_empty {
                found = found.omit_empty();
            }
            print_json(&found)
        }
        Command::Schedule { suburb_id, stages } => {
            let partial = client.schedule(&suburb_id, &stages).await;
            if let Some(err) = partial.combined() {
                tracing::warn!(%suburb_id, failures = err.count(), "loadshed.schedule.partial");
                eprintln!("{err}");
            }
            if partial.value.is_empty() && !partial.errors.is_empty() {
                anyhow::bail!("no schedule could be retrieved for suburb {suburb_id}");
            }
            print_json(&partial.value.into_values().collect::<Vec<_>>())
        }
    }
}
