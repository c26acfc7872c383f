mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::orders::OrdersSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "monta",
    about = "Monta fulfilment bridge: mirror order status and tracking into the local store",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the bridge database
    #[arg(long, global = true, env = "MONTA_DB", default_value = "monta-bridge.db")]
    db: PathBuf,

    /// Path to the YAML settings file (monta.username, monta.password, ...)
    #[arg(
        long,
        global = true,
        env = "MONTA_SETTINGS",
        default_value = "monta-settings.yaml"
    )]
    settings: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch orders from Monta and reconcile them into the local store
    Sync {
        /// Free-text search passed to the orders endpoint
        #[arg(long)]
        search: Option<String>,
    },

    /// Re-resolve unsettled stored orders through the status ladder
    Refresh {
        /// Maximum number of orders to refresh in one run
        #[arg(long, default_value = "200")]
        limit: usize,
    },

    /// Resolve one reference and print the freshest status
    Resolve { reference: String },

    /// Inspect mirrored order records
    Orders {
        #[command(subcommand)]
        subcommand: OrdersSubcommand,
    },

    /// Show recent sync log entries
    Log {
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show the effective configuration (password masked)
    Config,

    /// Run the webhook listener
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8787")]
        port: u16,

        /// Shared secret required in webhook bodies
        #[arg(long, env = "MONTA_WEBHOOK_SECRET")]
        webhook_secret: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Sync { search } => {
            cmd::sync::run(&cli.db, &cli.settings, search.as_deref(), cli.json)
        }
        Commands::Refresh { limit } => cmd::refresh::run(&cli.db, &cli.settings, limit, cli.json),
        Commands::Resolve { reference } => cmd::resolve::run(&cli.settings, &reference, cli.json),
        Commands::Orders { subcommand } => cmd::orders::run(&cli.db, subcommand, cli.json),
        Commands::Log { limit } => cmd::log::run(&cli.db, limit, cli.json),
        Commands::Config => cmd::config::run(&cli.settings, cli.json),
        Commands::Serve {
            port,
            webhook_secret,
        } => cmd::serve::run(&cli.db, port, webhook_secret),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
