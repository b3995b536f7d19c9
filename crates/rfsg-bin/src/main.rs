//! CLI entry point for the NI-RFSG gRPC daemon.
//!
//! # Usage
//!
//! Serve with the simulated driver:
//! ```bash
//! rfsg-daemon daemon --mock --port 31763
//! ```
//!
//! Serve with the NI-RFSG runtime, sessions taken from the config file:
//! ```bash
//! rfsg-daemon daemon --config config/rfsg.toml --library /usr/lib/x86_64-linux-gnu/libnirfsg.so
//! ```
//!
//! Check that the driver library loads:
//! ```bash
//! rfsg-daemon check-library
//! ```

// Global allocator (Microsoft Rust Guidelines: M-MIMALLOC-APPS)
#[cfg(not(test))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rfsg_core::{CallAdapter, RfsgLibrary};
use rfsg_driver_mock::MockRfsgLibrary;
use rfsg_driver_ni::NiRfsgLibrary;
use rfsg_server::config::{DriverKind, DriverSettings};
use rfsg_server::{RfsgServer, ServerSettings};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rfsg-daemon")]
#[command(about = "gRPC server for the NI-RFSG arbitrary waveform API", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gRPC server
    Daemon {
        /// Configuration file (TOML). Defaults to config/rfsg.toml if present.
        #[arg(long)]
        config: Option<PathBuf>,

        /// gRPC port (overrides grpc.port)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (overrides grpc.bind_address)
        #[arg(long)]
        bind: Option<IpAddr>,

        /// Use the simulated driver
        #[arg(long, conflicts_with = "library")]
        mock: bool,

        /// Path to the NI-RFSG shared library (implies the NI driver)
        #[arg(long)]
        library: Option<PathBuf>,
    },

    /// Load the NI-RFSG shared library and report the result
    CheckLibrary {
        /// Path to the library; defaults to the platform library name
        #[arg(long)]
        library: Option<PathBuf>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn load_ni_library(path: Option<&Path>) -> Result<NiRfsgLibrary> {
    let library = match path {
        Some(path) => NiRfsgLibrary::load(path)?,
        None => NiRfsgLibrary::load_default()?,
    };
    Ok(library)
}

fn build_library(driver: &DriverSettings) -> Result<Arc<dyn RfsgLibrary>> {
    match driver.kind {
        DriverKind::Mock => {
            tracing::info!("Using simulated NI-RFSG driver");
            Ok(Arc::new(MockRfsgLibrary::new()))
        }
        DriverKind::Ni => {
            let library = load_ni_library(driver.library_path.as_deref())
                .context("Failed to load the NI-RFSG driver")?;
            Ok(Arc::new(library))
        }
    }
}

async fn run_daemon(settings: ServerSettings) -> Result<()> {
    let library = build_library(&settings.driver)?;

    let sessions = settings.session_repository();
    if sessions.is_empty() {
        tracing::warn!("No sessions configured; every call will fail with NOT_FOUND");
    }
    for entry in &settings.sessions {
        tracing::info!(session = %entry.name, handle = entry.handle, "Registered session");
    }

    let adapter = CallAdapter::new(library, Arc::new(sessions));
    let server = RfsgServer::new(settings.grpc, adapter);

    let shutdown = server.shutdown_signal();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(err) => tracing::error!(error = %err, "Failed to listen for Ctrl+C; shutting down"),
        }
        shutdown.trigger();
    });

    server
        .serve()
        .await
        .map_err(|err| anyhow::anyhow!(err))
        .context("gRPC server failed")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Daemon {
            config,
            port,
            bind,
            mock,
            library,
        } => {
            let mut settings = ServerSettings::load(config.as_deref())
                .context("Failed to load configuration")?;
            if let Some(port) = port {
                settings.grpc.port = port;
            }
            if let Some(bind) = bind {
                settings.grpc.bind_address = bind;
            }
            if mock {
                settings.driver.kind = DriverKind::Mock;
            }
            if let Some(library) = library {
                settings.driver.kind = DriverKind::Ni;
                settings.driver.library_path = Some(library);
            }

            run_daemon(settings).await
        }
        Commands::CheckLibrary { library } => {
            let loaded = load_ni_library(library.as_deref())?;
            println!("Loaded NI-RFSG library from {}", loaded.path().display());
            Ok(())
        }
    }
}
