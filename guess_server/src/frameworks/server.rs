// Framework bootstrap for the game server runtime.

use crate::domain::Game;
use crate::domain::rules::{MAX_NUM, MIN_NUM};
use crate::frameworks::config;
use crate::interface_adapters::net::{health_handler, join_handler, subscribe_handler};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::UniformGenerator;
use crate::use_cases::{Broadcaster, Engine, EngineConfig, EngineError};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::{io::Result, sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let (state, engine_task) = build_state();
    let broadcaster = state.broadcaster.clone();

    let app = Router::new()
        .route("/", get(health_handler))
        .route("/join", post(join_handler))
        .route("/subscribe", get(subscribe_handler))
        .layer(cors_layer(&config::cors_allowed_origins()))
        .with_state(state);

    tracing::info!(%address, "listening");

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    // The engine only returns early on a fatal error, which takes the process down with it.
    let result = tokio::select! {
        served = server => served.inspect_err(|e| {
            tracing::error!(error = %e, "server error");
        }),
        outcome = engine_task => engine_exit(outcome),
    };

    broadcaster.shutdown();
    result
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> (Arc<AppState>, JoinHandle<std::result::Result<(), EngineError>>) {
    let engine_config = EngineConfig {
        tick_interval: config::tick_interval(),
        waiting_count: config::waiting_count(),
        manual_run: config::manual_run(),
        action_capacity: config::ACTION_CHANNEL_CAPACITY,
        event_capacity: config::EVENT_CHANNEL_CAPACITY,
    };
    tracing::debug!(?engine_config, "engine configured");

    let game = Game::new(UniformGenerator::new(MIN_NUM, MAX_NUM));
    let (engine, engine_handle, events) = Engine::new(game, engine_config);

    let write_timeout = config::subscriber_write_timeout();
    let (broadcaster, broadcaster_handle) = Broadcaster::new(events, write_timeout);

    // Broadcaster first so the engine's first event already has a reader.
    broadcaster.start();
    let engine_task = engine.start();

    let state = Arc::new(AppState {
        engine: engine_handle,
        broadcaster: broadcaster_handle,
    });
    (state, engine_task)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "ignoring invalid cors origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(300))
}

fn engine_exit(
    outcome: std::result::Result<std::result::Result<(), EngineError>, tokio::task::JoinError>,
) -> Result<()> {
    let reason = match outcome {
        Ok(Ok(())) => "engine stopped".to_string(),
        Ok(Err(e)) => format!("engine failed: {e}"),
        Err(e) => format!("engine task aborted: {e}"),
    };
    tracing::error!(%reason, "shutting down");
    Err(std::io::Error::other(reason))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
