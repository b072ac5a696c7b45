use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use repository::{MemoryPostStore, PostRepository, Repository};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use util::{Config, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().context("failed to load config")?;

    let repository = match &config.storage {
        Storage::MongoDb {
            url,
            database,
            collection,
        } => Repository::new(PostRepository::new(url, database, collection)),
        Storage::Memory => Repository::new(MemoryPostStore::new()),
    };

    let router = api::router(repository, &config)?;

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("RESTful API server started on: {}", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("failed to serve")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(task = "listen for shutdown", error = e.to_string());
        std::future::pending::<()>().await;
    }
    info!(task = "shutdown");
}
