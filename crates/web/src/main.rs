use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chess_online_core::Database;

mod config;
mod routes;

use config::Config;

/// Shared server state. Every handler that touches a game holds the
/// database lock for the whole read-move-write cycle, so at most one move
/// per game is ever in flight.
pub struct AppState {
    pub db: Mutex<Database>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    pub fn db(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/games",
            get(routes::list_games)
                .post(routes::create_game)
                .delete(routes::clear_games),
        )
        .route("/games/:id", get(routes::play::show_game))
        .route("/games/:id/join", post(routes::join_game))
        .route("/games/:id/leave", post(routes::leave_game))
        .route(
            "/games/:id/moves",
            get(routes::play::valid_moves).post(routes::play::make_move),
        )
        .route("/games/:id/resign", post(routes::play::resign))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    let db = Database::open(&config.db_path)
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
    let state = Arc::new(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "server running");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
