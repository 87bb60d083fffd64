//! Discord Reader CLI - main entry point

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use clap::{CommandFactory, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use discord_reader::{commands, metrics};

#[derive(Parser)]
#[command(name = "discord_reader")]
#[command(about = "Discord Chat History Exporter & Dataset Builder", long_about = None)]
#[command(version)]
struct Cli {
    /// Address to expose Prometheus metrics (e.g., 0.0.0.0:9898)
    #[arg(long, env = "METRICS_ADDR")]
    metrics_addr: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all text channels' history into JSON snapshots
    Fetch {
        /// Channel ids to skip (comma separated or repeated)
        #[arg(short, long, value_delimiter = ',')]
        skip: Vec<String>,

        /// Output directory for snapshots (default from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Filter a stored snapshot down to one author's messages
    Filter {
        /// Author id to keep
        user_id: String,

        /// Snapshot file (channel map or flat message array)
        input: PathBuf,

        /// Output file (default: user-<id>-messages.json next to input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile a stored snapshot into a JSONL training dataset
    Jsonl {
        /// Snapshot file (channel map or flat message array)
        input: PathBuf,

        /// Output file (default: input with .jsonl extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Fetch { .. } => "fetch",
            Commands::Filter { .. } => "filter",
            Commands::Jsonl { .. } => "jsonl",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("discord_reader=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    if let Some(addr) = cli.metrics_addr.as_deref() {
        match addr.parse::<SocketAddr>() {
            Ok(socket) => metrics::spawn_metrics_server(socket),
            Err(err) => warn!(%addr, "Invalid metrics address: {}", err),
        }
    }

    let Some(command) = cli.command else {
        // No arguments: print usage and exit cleanly.
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let command_name = command.name();
    let start = Instant::now();

    let result = execute_command(command).await;

    metrics::record_command_result(command_name, start.elapsed(), result.is_ok());

    result
}

async fn execute_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Fetch { skip, output } => {
            commands::fetch::run(&skip, output.as_deref()).await?;
        }
        Commands::Filter {
            user_id,
            input,
            output,
        } => {
            commands::filter::run(&user_id, &input, output.as_deref())?;
        }
        Commands::Jsonl { input, output } => {
            commands::jsonl::run(&input, output.as_deref())?;
        }
    }

    Ok(())
}
