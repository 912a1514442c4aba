// MTG Catalog MCP - Main Entry Point
//
// Serves the catalog tools over stdio, lists their definitions, or runs a
// single tool call from the command line. Logs go to stderr; stdout carries
// the protocol stream.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mtg_catalog_mcp::api::CatalogClient;
use mtg_catalog_mcp::config::Config;
use mtg_catalog_mcp::mcp::McpServer;
use mtg_catalog_mcp::tools::{tool_definitions, ToolHandler};
use serde_json::Value;
use tracing::{info, warn, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Magic: The Gathering catalog tools for MCP clients
#[derive(Parser, Debug)]
#[command(name = "mtg-catalog-mcp")]
#[command(author = "MTG Catalog MCP Contributors")]
#[command(version)]
#[command(about = "Magic: The Gathering catalog API exposed as MCP tools", long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the tools over stdio (default)
    Serve,
    /// Print the tool definitions as JSON
    Tools,
    /// Run a single tool call and print its output
    Call {
        /// Tool name, e.g. search_cards
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, warnings) = Config::from_env().context("Invalid configuration")?;

    init_tracing(&config, args.verbose)?;
    for warning in &warnings {
        warn!("{}", warning);
    }

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!(
                "mtg-catalog-mcp v{} starting (api: {})",
                env!("CARGO_PKG_VERSION"),
                config.api.base_url
            );
            let server = McpServer::new(handler(&config)?);
            server.serve_stdio().await?;
            info!("mtg-catalog-mcp stopped");
        }
        Commands::Tools => {
            let json = serde_json::to_string_pretty(&tool_definitions())
                .context("Failed to serialize tool definitions")?;
            println!("{}", json);
        }
        Commands::Call { tool, args } => {
            let arguments: Value =
                serde_json::from_str(&args).context("--args must be a JSON object")?;
            let output = handler(&config)?.call(&tool, arguments).await;
            println!("{}", output.text);
            if output.is_error {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn handler(config: &Config) -> Result<ToolHandler> {
    let client = CatalogClient::from_config(config).context("Failed to create catalog client")?;
    Ok(ToolHandler::new(client))
}

/// Initialize tracing on stderr
///
/// `RUST_LOG` overrides the configured level; `--verbose` raises it to debug.
fn init_tracing(config: &Config, verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { config.log_level()? };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.logging.format.to_lowercase().as_str() {
        "json" => builder.json().init(),
        "pretty" => builder.pretty().init(),
        _ => builder.compact().init(),
    }
    Ok(())
}
