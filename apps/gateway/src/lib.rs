//! Tasks Gateway
//!
//! WebSocket edge of the change-propagation pipeline:
//!
//! ```text
//! tasks_topic stream (Redis)
//!   ↓ (relay worker, started lazily on first client connect)
//! Broadcaster
//!   ↓
//! GET /tasks (WebSocket): `task_event` frames to every client
//! ```
//!
//! The relay consumes through the `task-consumer-group` consumer group,
//! so however many gateway replicas run, each event is relayed by exactly
//! one of them.

use axum::{routing::get, Json, Router};
use core_config::{redis::RedisConfig, server::ServerConfig, Environment, FromEnv};
use database::redis::{connect_from_config_with_retry, ConnectionManager};
use domain_tasks::TaskEventTopic;
use eyre::{Result, WrapErr};
use realtime::{Broadcaster, RelayLifecycleManager, RelayWorker, StreamSource};
use serde_json::json;
use std::sync::Arc;
use stream_bus::{ConsumerConfig, StreamConsumer};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

mod state;
mod ws;

use state::AppState;

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tasks", get(ws::ws_handler))
        .route("/health", get(health))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Spawner handed to the lifecycle manager: each call builds a fresh
/// consumer (new consumer id) and runs one relay worker task.
fn relay_spawner(
    redis: ConnectionManager,
    broadcaster: Arc<Broadcaster>,
) -> impl Fn() -> tokio::task::JoinHandle<()> + Send + Sync + 'static {
    move || {
        let redis = redis.clone();
        let broadcaster = broadcaster.clone();
        tokio::spawn(async move {
            let config = ConsumerConfig::from_topic::<TaskEventTopic>();
            let consumer = StreamConsumer::new(redis, config);
            let worker = RelayWorker::new(StreamSource::new(consumer), broadcaster);
            if let Err(e) = worker.run().await {
                error!(error = %e, "Relay worker faulted");
            }
        })
    }
}

/// Run the gateway.
///
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Connects to Redis with retry
/// 3. Serves `/tasks` (WebSocket) and `/health` until SIGINT/SIGTERM
///
/// The relay worker is not started here: the lifecycle manager spawns it
/// on the first client connection.
pub async fn run() -> Result<()> {
    core_config::tracing::install_color_eyre();

    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    info!("Starting tasks gateway. Environment: {:?}", environment);

    let redis_config = RedisConfig::from_env().wrap_err("Failed to load Redis configuration")?;
    let server_config = ServerConfig::from_env().wrap_err("Failed to load server configuration")?;

    let redis = connect_from_config_with_retry(&redis_config, None)
        .await
        .wrap_err("Failed to connect to Redis")?;

    let broadcaster = Arc::new(Broadcaster::new());
    let relay = Arc::new(RelayLifecycleManager::new(relay_spawner(
        redis,
        broadcaster.clone(),
    )));

    let app = router(AppState { broadcaster, relay });

    let addr = server_config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {}", addr))?;

    info!(addr = %addr, "Tasks gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server failed")?;

    info!("Tasks gateway stopped");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => {
                error!("Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        },
    }
}
