use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use frontkit::config::{load as config_load, validate as config_validate};
use frontkit::{HttpClient, RequestOptions, extract_query_parameters, format_timestamp};
use std::collections::BTreeMap;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "frontkit", version, about = "Fetch JSON, inspect query strings and format timestamps")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// GET a URL and pretty-print the JSON body
    Fetch {
        url: String,

        /// Extra request header, `Name: value` (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Send `Authorization: Bearer <TOKEN>`
        #[arg(long)]
        bearer: Option<String>,
    },
    /// Print the query parameters of a URL as JSON
    Query { url: String },
    /// Format an ISO 8601 timestamp as M/D/YYYY H:MM AM|PM
    Timestamp { iso: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!(error = ?err, "frontkit failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Fetch { url, headers, bearer } => fetch(&url, &headers, bearer),
        Command::Query { url } => {
            let params: BTreeMap<_, _> = extract_query_parameters(Some(&url)).into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&params)?);
            Ok(())
        }
        Command::Timestamp { iso } => {
            println!("{}", format_timestamp(&iso)?);
            Ok(())
        }
    }
}

fn fetch(url: &str, headers: &[String], bearer: Option<String>) -> Result<()> {
    let config = config_load().context("Failed to load configuration")?;
    config_validate(&config).map_err(|err| anyhow!("Configuration error: {err}"))?;

    debug!(http_config = ?config.http, "Effective configuration loaded");

    let mut options = RequestOptions::new();
    for header in headers {
        let (name, value) = parse_header(header)?;
        options = options.header(name, value);
    }
    if let Some(token) = bearer {
        options = options.bearer_token(token);
    }

    let client = HttpClient::new(&config.http).context("Failed to build HTTP client")?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let body: serde_json::Value = rt.block_on(client.fetch_json(url, options))?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn parse_header(raw: &str) -> Result<(&str, &str)> {
    let (name, value) = raw
        .split_once(':')
        .with_context(|| format!("Header must look like 'Name: value', got '{raw}'"))?;
    Ok((name.trim(), value.trim()))
}
