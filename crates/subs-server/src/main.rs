//! Subscription records server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the JSON API over HTTP until Ctrl-C or SIGTERM.

mod settings;
mod logging;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use subs_core::service::Subscriptions;
use subs_store_sqlite::SqliteStore;
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::trace::TraceLayer;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Subscription records HTTP server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config)?;
  logging::init(&cfg.logger);

  // Open SQLite store.
  let store_path = cfg.database.resolved_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?
    .with_query_timeout(cfg.database.query_timeout());

  let app = subs_api::api_router(Arc::new(Subscriptions::new(store)))
    .layer(TraceLayer::new_for_http());

  let address = &cfg.server_http.address;
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(address.as_str())
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  let (stop_tx, stop_rx) = oneshot::channel::<()>();
  let mut server = tokio::spawn(async move {
    axum::serve(listener, app)
      .with_graceful_shutdown(async move {
        let _ = stop_rx.await;
      })
      .await
  });

  tokio::select! {
    joined = &mut server => {
      joined.context("server task failed")?.context("server error")?;
      return Ok(());
    }
    () = shutdown_signal() => {}
  }

  let grace = cfg.server_http.idle_timeout();
  tracing::info!(?grace, "Shutting down");
  let _ = stop_tx.send(());

  match tokio::time::timeout(grace, server).await {
    Ok(joined) => joined.context("server task failed")?.context("server error")?,
    Err(_) => tracing::warn!("in-flight requests did not finish within {grace:?}"),
  }

  tracing::info!("Server stopped");
  Ok(())
}

/// Resolve on Ctrl-C, or on SIGTERM where available.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "cannot listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "cannot listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {}
    () = terminate => {}
  }
}
