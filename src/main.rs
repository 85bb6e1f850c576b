//! Game server (default binary).
//!
//! Serves the line-delimited JSON protocol on `TETRIS_HOST:TETRIS_PORT` with
//! scores kept in memory for the lifetime of the process.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use web_tetris::service::{run_server, GameService, InMemoryGateway, ServiceConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web_tetris=info,web_tetris_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        leaderboard_limit = config.leaderboard_limit,
        sprint_target = config.sprint_target,
        "starting game server"
    );

    let service = Arc::new(GameService::new(config, Arc::new(InMemoryGateway::new())));

    tokio::select! {
        result = run_server(service, None) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            Ok(())
        }
    }
}
