//! CLI for the Smart Hat telemetry aggregation engine.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "smarthat")]
#[command(about = "smarthat — telemetry aggregation for the Smart Hat wearable")]
#[command(version = smarthat_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble one snapshot from the backing store and print it
    Snapshot {
        /// Directory holding the store's <collection>.json files
        #[arg(long, default_value = "./data")]
        store: String,

        /// Print the full snapshot as JSON instead of a summary table
        #[arg(long)]
        json: bool,
    },

    /// Re-assemble and print a snapshot on a fixed interval
    Watch {
        /// Directory holding the store's <collection>.json files
        #[arg(long, default_value = "./data")]
        store: String,

        /// Refresh interval in seconds
        #[arg(long, default_value_t = 10)]
        interval: u64,

        /// Print the full snapshot as JSON instead of a summary table
        #[arg(long)]
        json: bool,
    },

    /// List the telemetry sources and their store collections
    Sources,

    /// Serve snapshots over HTTP
    Serve {
        /// Directory holding the store's <collection>.json files
        #[arg(long, default_value = "./data")]
        store: String,

        /// Host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind
        #[arg(long, default_value_t = 8050)]
        port: u16,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Snapshot { store, json } => commands::snapshot::run(&store, json),
        Commands::Watch {
            store,
            interval,
            json,
        } => commands::watch::run(&store, interval, json),
        Commands::Sources => commands::sources::run(),
        Commands::Serve { store, host, port } => commands::serve::run(&store, &host, port),
    }
}
