use axum::{
    extract::{ConnectInfo, State, WebSocketUpgrade},
    http::{HeaderMap, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

mod app;
mod game;
mod protocol;
mod room_runtime;
mod shared;
mod transport;
mod visits;

use app::config::ServerConfig;
use app::state::AppState;
use visits::VisitStore;

#[derive(Debug, Serialize)]
struct OkResponse {
    ok: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env();
    let visits = match VisitStore::connect(&config).await {
        Ok(store) => store,
        Err(error) => {
            tracing::warn!(?error, "visit store unavailable, tracking in memory");
            VisitStore::memory()
        }
    };

    let state = Arc::new(AppState::new(&config, visits));
    let app = router(state, &config.static_dir);

    let address = format!("0.0.0.0:{}", config.port);
    tracing::info!(
        grid_size = config.game.grid_size,
        room_capacity = config.game.room_capacity,
        tick_ms = config.game.tick_interval.as_millis() as u64,
        "listening on {address}"
    );

    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/admin/stats", post(app::admin::admin_stats))
        .route("/ws", get(ws_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(OkResponse { ok: true })
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let client_ip = transport::ws_session::client_ip(&headers, peer);
    let registry = Arc::clone(&state.registry);
    let visits = state.visits.clone();
    ws.on_upgrade(move |socket| {
        transport::ws_session::handle_socket(socket, registry, visits, client_ip)
    })
}
