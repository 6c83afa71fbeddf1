use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use chess_online_core::storage::StoredGame;
use chess_online_core::{Color, Error};

use crate::AppState;

pub mod play;

/// Core error rendered as `{"message": "Error: ..."}` with a matching status
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidMove(_)
            | Error::Notation(_)
            | Error::Fen(_)
            | Error::BadRequest(_)
            | Error::GameOver(_) => StatusCode::BAD_REQUEST,
            Error::GameNotFound(_) => StatusCode::NOT_FOUND,
            Error::AlreadyTaken { .. } | Error::NotAPlayer(_) => StatusCode::FORBIDDEN,
            Error::Json(_) | Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
        }
        let body = ErrorBody {
            message: format!("Error: {}", self.0),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Serialize)]
pub struct GameRow {
    pub game_id: i64,
    pub name: String,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub created: String,
}

impl From<&StoredGame> for GameRow {
    fn from(g: &StoredGame) -> Self {
        let created = chrono::DateTime::from_timestamp(g.created_at, 0)
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        Self {
            game_id: g.id,
            name: g.name.clone(),
            white_username: g.white_username.clone(),
            black_username: g.black_username.clone(),
            created,
        }
    }
}

#[derive(Serialize)]
pub struct GameList {
    pub games: Vec<GameRow>,
}

#[derive(Deserialize)]
pub struct CreateForm {
    pub name: String,
}

#[derive(Serialize)]
pub struct Created {
    pub game_id: i64,
}

#[derive(Deserialize)]
pub struct JoinForm {
    pub username: String,
    pub color: Color,
}

#[derive(Deserialize)]
pub struct PlayerForm {
    pub username: String,
}

#[derive(Serialize)]
pub struct Seat {
    pub game_id: i64,
    pub username: String,
    pub color: Color,
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn list_games(State(state): State<Arc<AppState>>) -> ApiResult<Json<GameList>> {
    let games = state.db().list_games()?;
    Ok(Json(GameList {
        games: games.iter().map(GameRow::from).collect(),
    }))
}

pub async fn create_game(
    State(state): State<Arc<AppState>>,
    Json(form): Json<CreateForm>,
) -> ApiResult<(StatusCode, Json<Created>)> {
    let game_id = state.db().create_game(&form.name)?;
    Ok((StatusCode::CREATED, Json(Created { game_id })))
}

pub async fn clear_games(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.db().clear()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn join_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(form): Json<JoinForm>,
) -> ApiResult<Json<Seat>> {
    state.db().join_game(id, form.color, &form.username)?;
    Ok(Json(Seat {
        game_id: id,
        username: form.username,
        color: form.color,
    }))
}

pub async fn leave_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(form): Json<PlayerForm>,
) -> ApiResult<Json<Seat>> {
    let color = state.db().leave_game(id, &form.username)?;
    Ok(Json(Seat {
        game_id: id,
        username: form.username,
        color,
    }))
}
