use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use waypost::cli::{
    OutputArgs, ReportArgs, ServerArgs, run_devices, run_history, run_latest, run_report,
};
use waypost::config::ServerConfig;
use waypost::server::{AppState, create_router};
use waypost::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "waypost")]
#[command(about = "Device location store and query service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// TOML config file; flags and environment override its values
        #[arg(long, short, env = "WAYPOST_CONFIG")]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long, env = "WAYPOST_HOST")]
        host: Option<String>,

        /// Port to bind to [default: 5370]
        #[arg(long, short, env = "PORT")]
        port: Option<u16>,

        /// Data directory for the database
        #[arg(long, env = "WAYPOST_DATA_DIR")]
        data_dir: Option<PathBuf>,

        /// Database file, overriding <data-dir>/waypost.db
        #[arg(long, env = "WAYPOST_DB_PATH")]
        db_path: Option<PathBuf>,

        /// Disable cross-origin request headers
        #[arg(long)]
        no_cors: bool,
    },

    /// Send a location report to a running server
    Report {
        #[command(flatten)]
        server: ServerArgs,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Show the most recent position of a device
    Latest {
        #[command(flatten)]
        server: ServerArgs,

        /// Device to look up
        device_id: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show a device's trail for one day, newest first
    History {
        #[command(flatten)]
        server: ServerArgs,

        /// Device to look up
        device_id: String,

        /// Day to show (YYYY-MM-DD, UTC). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List every device that has reported
    Devices {
        #[command(flatten)]
        server: ServerArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

struct ServeOverrides {
    config: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<PathBuf>,
    db_path: Option<PathBuf>,
    no_cors: bool,
}

fn resolve_config(overrides: ServeOverrides) -> anyhow::Result<ServerConfig> {
    let mut config = match &overrides.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };

    if let Some(host) = overrides.host {
        config.host = host;
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if let Some(data_dir) = overrides.data_dir {
        config.data_dir = data_dir;
    }
    if overrides.db_path.is_some() {
        config.db_path = overrides.db_path;
    }
    if overrides.no_cors {
        config.cors = false;
    }

    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutting down");
}

async fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    let db_path = config.db_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;
    info!("Using database at {}", db_path.display());

    let state = Arc::new(AppState::new(Arc::new(store)));
    let app = create_router(state, config.cors);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("waypost=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            data_dir,
            db_path,
            no_cors,
        } => {
            let config = resolve_config(ServeOverrides {
                config,
                host,
                port,
                data_dir,
                db_path,
                no_cors,
            })?;

            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(run_serve(config))?;
        }
        Commands::Report { server, report } => {
            run_report(&server.server, report)?;
        }
        Commands::Latest {
            server,
            device_id,
            output,
        } => {
            run_latest(&server.server, &device_id, output.json)?;
        }
        Commands::History {
            server,
            device_id,
            date,
            output,
        } => {
            run_history(&server.server, &device_id, date.as_deref(), output.json)?;
        }
        Commands::Devices { server, output } => {
            run_devices(&server.server, output.json)?;
        }
    }

    Ok(())
}
