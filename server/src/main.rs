use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use todo_core::{ItemService, MemoryStore, TodoStore};
use todo_server::config::{Config, ConfigError, StoreKind};
use todo_server::postgres::PgStore;

#[derive(Debug, Parser)]
#[command(name = "todo-server")]
#[command(about = "HTTP service for todo items")]
struct Args {
    /// YAML config file. A missing file falls back to defaults.
    #[arg(short = 'c', long = "config", default_value = "config.yml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut config, file_error) = match Config::from_file(&args.config) {
        Ok(config) => (config, None),
        Err(err @ ConfigError::Read { .. }) => (Config::default(), Some(err)),
        Err(err) => return Err(err.into()),
    };
    config.apply_env_overrides()?;
    todo_server::logging::init(&config.log)?;

    if let Some(err) = file_error {
        tracing::warn!(file = %args.config.display(), error = %err, "cannot load config file, using defaults");
    }
    tracing::debug!(?config, "config loaded");

    let store: Arc<dyn TodoStore> = match config.store {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Postgres => {
            let store = PgStore::connect(&config.db)?;
            store
                .ensure_schema()
                .await
                .context("unable to prepare database")?;
            Arc::new(store)
        }
    };
    let service = ItemService::new(store).with_operation_timeout(config.operation_timeout());

    let addr = config.listen.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "starting up server");

    todo_server::serve(listener, service, shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
