mod animation;
mod api;
mod render;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use invx_core::ProcessingResult;
use tracing_subscriber::EnvFilter;

use crate::animation::Pacing;
use crate::api::ServerClient;
use crate::render::Style;

const DEFAULT_RESULTS_FILE: &str = "invoice-processing-results.json";

#[derive(Debug, Parser)]
#[command(name = "invx-cli")]
#[command(about = "Invoice extraction demo: list, preview and process sample invoices")]
struct Cli {
    /// Base URL of a running invx-server
    #[arg(
        long,
        global = true,
        env = "INVX_SERVER_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    server_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the invoice PDFs available for processing
    List,
    /// Show the viewer configuration and URL for one invoice
    Preview {
        /// File name as shown by `list`
        filename: String,
    },
    /// Process the invoice collection and print the results report
    Process {
        /// Collection identifier sent to the server
        #[arg(long, default_value = "dynamic-invoices")]
        collection_id: String,
        /// Save the raw results as JSON (defaults to invoice-processing-results.json)
        #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_RESULTS_FILE)]
        output: Option<PathBuf>,
        /// Print the raw results JSON instead of the report
        #[arg(long)]
        json: bool,
        /// Skip the processing log animation
        #[arg(long)]
        no_animation: bool,
        /// Animation speed multiplier
        #[arg(long, default_value = "1.0")]
        speed: f64,
    },
    /// Render the report for a previously saved results file
    Report {
        /// Path to a saved results JSON file
        file: PathBuf,
    },
}

impl Commands {
    fn retry_hint(&self) -> &'static str {
        match self {
            Commands::List => "invx-cli list",
            Commands::Preview { .. } => "invx-cli preview <filename>",
            Commands::Process { .. } => "invx-cli process",
            Commands::Report { .. } => "invx-cli report <file>",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let default_level = std::env::var("INVX_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("invx-cli ready; run `invx-cli --help` for commands");
        return Ok(());
    };

    if let Err(e) = run(&command, &cli.server_url).await {
        eprintln!("error: {e:#}");
        eprintln!("try again with `{}`", command.retry_hint());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: &Commands, server_url: &str) -> anyhow::Result<()> {
    match command {
        Commands::List => {
            let client = ServerClient::new(server_url)?;
            let invoices = client.list_invoices().await?;
            print!("{}", render::render_invoice_list(&invoices));
        }
        Commands::Preview { filename } => {
            let client = ServerClient::new(server_url)?;
            let invoices = client.list_invoices().await?;
            let invoice = invoices
                .iter()
                .find(|i| &i.filename == filename)
                .ok_or_else(|| {
                    anyhow::anyhow!("invoice '{filename}' not found; run `invx-cli list` to see available files")
                })?;
            let config = client.viewer_config(&invoice.filename).await?;
            println!("{} ({})", invoice.filename, render::format_size(invoice.size));
            print!("{}", render::render_viewer_config(&config, client.base_url()));
        }
        Commands::Process {
            collection_id,
            output,
            json,
            no_animation,
            speed,
        } => {
            let client = ServerClient::new(server_url)?;
            let pacing = (!no_animation).then(|| Pacing::new(*speed));
            let result = process(&client, collection_id, pacing).await?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render::render_report(&result, Style::detect()));
            }
            if let Some(path) = output {
                save_results(path, &result)?;
                println!("results saved to {}", path.display());
            }
        }
        Commands::Report { file } => {
            let result = load_results(file)?;
            print!("{}", render::render_report(&result, Style::detect()));
        }
    }
    Ok(())
}

/// Lists the invoices, plays the setup log, then runs the real request
/// alongside the per-document log. Results are returned once both finish.
async fn process(
    client: &ServerClient,
    collection_id: &str,
    pacing: Option<Pacing>,
) -> anyhow::Result<ProcessingResult> {
    let Some(pacing) = pacing else {
        return client.process_collection(collection_id).await;
    };

    println!("📂 Discovering invoice files...");
    let invoices = client
        .list_invoices()
        .await
        .context("Failed to load invoice files")?;
    let documents: Vec<String> = invoices.into_iter().map(|i| i.filename).collect();

    animation::play(&animation::discovery_script(&documents), pacing).await;
    animation::play(&animation::setup_script(documents.len()), pacing).await;

    println!("🚀 Starting parallel API processing of loaded invoices...");
    let script = animation::processing_script(&documents);
    let (result, ()) = tokio::join!(
        client.process_collection(collection_id),
        animation::play(&script, pacing)
    );
    let result = result?;

    println!("🎉 Parallel processing completed");
    println!(
        "🏁 Invoice collection processed: {}/{} invoices processed",
        result.summary.successful_invoices, result.summary.total_invoices
    );
    println!();
    Ok(result)
}

/// Writes the results object verbatim as pretty JSON.
fn save_results(path: &Path, result: &ProcessingResult) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(result)?;
    std::fs::write(path, body)
        .with_context(|| format!("failed to write results to {}", path.display()))?;
    tracing::debug!(path = %path.display(), "results saved");
    Ok(())
}

fn load_results(path: &Path) -> anyhow::Result<ProcessingResult> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a processing results file", path.display()))
}

#[cfg(test)]
mod tests;
