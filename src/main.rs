//! elastic-mcp: MCP server for Elasticsearch.
//!
//! Usage:
//!   elastic-mcp --mcp --url <url> --api-key <key>   # Start MCP server
//!   elastic-mcp indices                             # List indices
//!   elastic-mcp mappings <index>                    # Show mappings
//!   elastic-mcp search <index> '<query json>'       # Run a search
//!
//! Connection flags fall back to ES_URL, ES_API_KEY, ES_USERNAME,
//! ES_PASSWORD and ES_CA_CERT.

use clap::{Parser, Subcommand};
use elastic_mcp::backend::HttpBackend;
use elastic_mcp::cache::IndexCache;
use elastic_mcp::config::{Config, ConnectionArgs};
use elastic_mcp::server::ElasticMcpServer;
use elastic_mcp::{fmt, tools};
use rmcp::ServiceExt;
use std::io::{IsTerminal, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "elastic-mcp")]
#[command(about = "MCP server exposing Elasticsearch indices, mappings and search")]
#[command(version)]
struct Cli {
    /// Run as MCP server (stdin/stdout JSON-RPC)
    #[arg(long)]
    mcp: bool,

    /// Print raw JSON instead of formatted output (CLI mode)
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List indices with health, status and document count
    Indices,

    /// Show field mappings for an index
    Mappings {
        /// Index name
        index: String,
    },

    /// Run a Query DSL search
    Search {
        /// Index name
        index: String,

        /// Query DSL body as JSON
        #[arg(default_value = "{\"query\":{\"match_all\":{}}}")]
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // CRITICAL: Log to stderr only (stdout is JSON-RPC for MCP)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("elastic_mcp=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    if !cli.mcp && cli.command.is_none() {
        eprintln!("Use --mcp to start MCP server, or a subcommand for CLI mode.");
        eprintln!("Run with --help for more information.");
        std::process::exit(1);
    }

    let config = Config::from_args(cli.connection)?;

    if cli.mcp {
        run_mcp_server(config).await
    } else if let Some(cmd) = cli.command {
        run_cli(config, cmd, cli.json).await
    } else {
        Ok(())
    }
}

async fn run_mcp_server(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting MCP server for {}", config.url);

    let server = ElasticMcpServer::from_config(&config)?;

    // Run the MCP server on stdin/stdout
    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}

async fn run_cli(config: Config, cmd: Commands, json: bool) -> anyhow::Result<()> {
    let backend = HttpBackend::new(&config)?;
    let color = !json && std::io::stdout().is_terminal();
    let mut stdout = std::io::stdout().lock();

    match cmd {
        Commands::Indices => {
            let cache = IndexCache::new();
            let listing = cache.get_indices(&backend).await?;
            if json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(listing.indices.as_slice())?)?;
            } else {
                fmt::fmt_indices(&mut stdout, &listing.indices, listing.was_cached, color)?;
            }
        }

        Commands::Mappings { index } => {
            let input = tools::GetMappingsInput { index };
            let output = tools::execute_get_mappings(&backend, input).await?;
            print_output(&mut stdout, &output, json, color)?;
        }

        Commands::Search { index, query } => {
            let input = tools::SearchInput {
                index,
                query_body: serde_json::Value::String(query),
            };
            let output = tools::execute_search(&backend, input).await?;
            print_output(&mut stdout, &output, json, color)?;
        }
    }

    Ok(())
}

fn print_output(
    w: &mut impl std::io::Write,
    output: &elastic_mcp::types::ToolOutput,
    json: bool,
    color: bool,
) -> anyhow::Result<()> {
    if json {
        writeln!(w, "{}", serde_json::to_string_pretty(output)?)?;
    } else {
        fmt::fmt_output(w, output, color)?;
    }
    Ok(())
}
