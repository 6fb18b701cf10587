use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use log::{error, info};
use thoughtbook::{
    MemoryStore, RedisStore, SocialGraph,
    api::build_router,
    config::{AppConfig, DEFAULT_CONFIG_PATH, Overrides, ServeSettings, StoreBackend},
    store::DocumentStore,
};

use crate::theme::{ARROW, BULLET, PALETTE};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Configuration file; defaults apply when it does not exist
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Address to listen on
    #[arg(long, env = "THOUGHTBOOK_BIND")]
    pub bind: Option<String>,

    /// Document store backend
    #[arg(long, value_enum, env = "THOUGHTBOOK_STORE")]
    pub store: Option<StoreBackend>,

    /// Redis connection URL
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// Key prefix for everything written to Redis
    #[arg(long, env = "THOUGHTBOOK_PREFIX")]
    pub prefix: Option<String>,
}

impl ServeArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            bind: self.bind.clone(),
            backend: self.store,
            redis_url: self.redis_url.clone(),
            prefix: self.prefix.clone(),
        }
    }
}

pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    let config = AppConfig::load(&args.config)?.apply(args.overrides());
    let settings = config.resolve()?;
    print_banner(&settings);

    match settings.backend {
        StoreBackend::Memory => serve(SocialGraph::new(MemoryStore::new()), settings.bind).await,
        StoreBackend::Redis => {
            let store = RedisStore::connect(&settings.redis_url, settings.prefix.clone())
                .await
                .with_context(|| format!("Failed to connect to {}", settings.redis_url))?;
            store.ping().await.context("Redis did not answer PING")?;
            info!("connected to redis (prefix '{}')", store.prefix());
            serve(SocialGraph::new(store), settings.bind).await
        }
    }
}

async fn serve<S: DocumentStore>(graph: SocialGraph<S>, bind: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(graph))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated unexpectedly")?;

    info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {err}");
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
                error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("ctrl-c received; draining connections"),
        _ = terminate => info!("SIGTERM received; draining connections"),
    }
}

fn print_banner(settings: &ServeSettings) {
    let store = match settings.backend {
        StoreBackend::Memory => "memory (not persisted)".to_string(),
        StoreBackend::Redis => format!("redis {} (prefix '{}')", settings.redis_url, settings.prefix),
    };
    println!(
        "{} {}",
        "thoughtbook".color(PALETTE.title).bold(),
        env!("CARGO_PKG_VERSION").color(PALETTE.dim)
    );
    for (key, value) in [("api", format!("http://{}/api", settings.bind)), ("store", store)] {
        println!(
            "  {} {:<6} {}",
            BULLET.color(PALETTE.marker),
            key.color(PALETTE.label).bold(),
            value.color(PALETTE.text)
        );
    }
    if settings.backend == StoreBackend::Memory {
        println!(
            "  {} {}",
            ARROW.color(PALETTE.caution),
            "data is discarded on exit".color(PALETTE.caution)
        );
    }
    println!();
}
