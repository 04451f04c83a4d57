//! Prints the three PokeAPI summary answers.
//!
//! Configuration comes from the `POKEAPI_*` environment variables, overridden
//! by command-line flags. Diagnostics go to stderr via `RUST_LOG`; request
//! failures are appended to the error log and reported as unavailable.

use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pokeapi_core::answers::{
    count_matching_names, interbreed_count, weight_extremes, INTERBREED_SUBJECT, WEIGHT_TYPE,
};
use pokeapi_core::{ClientConfig, ConfigOverrides, PokeApiClient, Transport, DEFAULT_MAX_ID};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pokeapi", about = "Summaries computed from the public PokeAPI")]
struct Cli {
    /// API root, e.g. https://pokeapi.co/api/v2
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Where request failures are appended
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Command {
    /// Count names containing "at" with exactly two a's
    Names,
    /// Count the species a pokemon can interbreed with
    Interbreed {
        #[arg(long, default_value = INTERBREED_SUBJECT)]
        name: String,
    },
    /// Heaviest and lightest pokemon of a type, as [max, min]
    Weights {
        #[arg(long = "type", default_value = WEIGHT_TYPE)]
        type_name: String,
        #[arg(long, default_value_t = DEFAULT_MAX_ID)]
        max_id: u32,
    },
    /// All three answers
    All,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
            log_path: self.log_path.clone(),
        }
    }

    fn config(&self) -> Result<ClientConfig> {
        Ok(ClientConfig::resolve(&self.overrides())?)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    tracing::debug!(?config, "starting");
    let client = PokeApiClient::from_config(&config).context("failed to set up the client")?;

    let notice = format!("unavailable: check the logs ({})", client.log().path().display());
    for line in run(&client, cli.command.unwrap_or(Command::All), &notice) {
        println!("{line}");
    }
    Ok(())
}

fn run<T: Transport>(client: &PokeApiClient<T>, command: Command, notice: &str) -> Vec<String> {
    match command {
        Command::Names => vec![names(client, notice)],
        Command::Interbreed { name } => vec![interbreed(client, &name, notice)],
        Command::Weights { type_name, max_id } => vec![weights(client, &type_name, max_id, notice)],
        Command::All => vec![
            names(client, notice),
            interbreed(client, INTERBREED_SUBJECT, notice),
            weights(client, WEIGHT_TYPE, DEFAULT_MAX_ID, notice),
        ],
    }
}

fn names<T: Transport>(client: &PokeApiClient<T>, notice: &str) -> String {
    let answer = client
        .list_all_resource_names()
        .ok()
        .and_then(|names| count_matching_names(&names));
    render("names", answer, notice)
}

fn interbreed<T: Transport>(client: &PokeApiClient<T>, name: &str, notice: &str) -> String {
    let answer = client
        .interbreedable_species(name)
        .ok()
        .and_then(|species| interbreed_count(&species));
    render(&format!("interbreed ({name})"), answer, notice)
}

fn weights<T: Transport>(client: &PokeApiClient<T>, type_name: &str, max_id: u32, notice: &str) -> String {
    let answer = client
        .weights_for_type(type_name, max_id)
        .ok()
        .and_then(|weights| weight_extremes(&weights))
        .map(|[max, min]| format!("[{max}, {min}]"));
    render(&format!("weights ({type_name})"), answer, notice)
}

fn render<V: Display>(label: &str, answer: Option<V>, notice: &str) -> String {
    match answer {
        Some(value) => format!("{label}: {value}"),
        None => format!("{label}: {notice}"),
    }
}
