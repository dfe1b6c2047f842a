//! confgridd — the ConfGrid daemon.
//!
//! Serves configuration saves and polls over HTTP, backed by a redb record
//! store.
//!
//! # Usage
//!
//! ```text
//! confgridd serve --port 8963 --data-dir /var/lib/confgrid --config confgrid.toml
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use confgrid_core::ServerConfig;
use tracing::info;

#[derive(Parser)]
#[command(name = "confgridd", about = "ConfGrid config distribution daemon")]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Run the config server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "8963")]
        port: u16,

        /// Data directory for the record store.
        #[arg(long, default_value = "/var/lib/confgrid")]
        data_dir: PathBuf,

        /// Server configuration file (TOML). Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the effective server configuration and exit.
    ShowConfig {
        /// Server configuration file (TOML).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Command::Serve {
            port,
            data_dir,
            config,
        } => {
            let config = load_config(config)?;
            run_server(port, data_dir, config).await
        }
        Command::ShowConfig { config } => {
            let config = load_config(config)?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,confgridd=debug,confgrid=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => {
            let config = ServerConfig::from_file(&path)
                .map_err(|e| anyhow::anyhow!("load config {}: {e}", path.display()))?;
            info!(path = ?path, "server config loaded");
            Ok(config)
        }
        None => {
            info!("no config file given, using defaults");
            Ok(ServerConfig::default())
        }
    }
}

async fn run_server(port: u16, data_dir: PathBuf, config: ServerConfig) -> anyhow::Result<()> {
    info!("ConfGrid daemon starting");
    info!(
        gateways = ?config.gateway_names,
        additions = config.additions.len(),
        log_properties = config.log_properties,
        "server config"
    );

    // Ensure data directory exists.
    std::fs::create_dir_all(&data_dir)?;
    let db_path = data_dir.join("confgrid.redb");

    let store = confgrid_state::StateStore::open(&db_path)?;
    info!(path = ?db_path, "record store opened");

    let router = confgrid_api::build_router(store, Arc::new(config));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    info!("ConfGrid daemon stopped");
    Ok(())
}
