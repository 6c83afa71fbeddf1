//! Gameplay endpoints: viewing a game, querying moves, moving and resigning

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use chess_online_core::storage::StoredGame;
use chess_online_core::{analyze_game, Color, Error, GameStatus, Move, Square};

use super::ApiResult;
use crate::AppState;

#[derive(Serialize)]
pub struct GameView {
    pub game_id: i64,
    pub name: String,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub turn: Color,
    pub status: GameStatus,
    pub game_over: bool,
    pub in_check: bool,
    pub legal_move_count: u32,
    pub fen: String,
    pub board: String,
}

impl From<&StoredGame> for GameView {
    fn from(g: &StoredGame) -> Self {
        let info = analyze_game(&g.game);
        Self {
            game_id: g.id,
            name: g.name.clone(),
            white_username: g.white_username.clone(),
            black_username: g.black_username.clone(),
            turn: g.game.turn(),
            status: g.game.status(),
            game_over: g.game.is_game_over(),
            in_check: info.is_check,
            legal_move_count: info.legal_move_count,
            fen: g.game.to_fen(),
            board: g.game.board().to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct SquareQuery {
    pub square: String,
}

#[derive(Serialize)]
pub struct MovesView {
    pub square: String,
    /// `None` when the square is empty
    pub moves: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct MoveForm {
    pub username: String,
    pub mv: String,
}

#[derive(Serialize)]
pub struct MoveOutcome {
    pub game: GameView,
    pub notification: String,
}

fn load(state: &AppState, id: i64) -> ApiResult<StoredGame> {
    Ok(state.db().get_game(id)?.ok_or(Error::GameNotFound(id))?)
}

fn display_name(stored: &StoredGame, color: Color) -> String {
    stored
        .username(color)
        .map(str::to_string)
        .unwrap_or_else(|| color.to_string())
}

pub async fn show_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<GameView>> {
    let stored = load(&state, id)?;
    Ok(Json(GameView::from(&stored)))
}

pub async fn valid_moves(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<SquareQuery>,
) -> ApiResult<Json<MovesView>> {
    let square: Square = query.square.parse()?;
    let stored = load(&state, id)?;
    let moves = stored
        .game
        .valid_moves(square)
        .map(|moves| moves.iter().map(Move::to_string).collect());
    Ok(Json(MovesView {
        square: square.to_string(),
        moves,
    }))
}

pub async fn make_move(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(form): Json<MoveForm>,
) -> ApiResult<Json<MoveOutcome>> {
    let mv: Move = form.mv.parse()?;

    // One lock over load, move and store keeps moves on a game serialized.
    let db = state.db();
    let mut stored = db.get_game(id)?.ok_or(Error::GameNotFound(id))?;
    let color = stored
        .player_color(&form.username)
        .ok_or_else(|| Error::NotAPlayer(form.username.clone()))?;

    if stored.game.turn() != color {
        warn!(game_id = id, username = %form.username, %mv, "move out of turn");
        return Err(Error::InvalidMove(mv).into());
    }
    stored.game.make_move(mv)?;

    let mover = form.username.as_str();
    let opponent_color = color.opposite();
    let opponent = display_name(&stored, opponent_color);
    let game = &mut stored.game;

    // The opponent is now the side to move.
    let info = analyze_game(game);
    let notification = if info.is_checkmate {
        game.end_game();
        format!("{} has checkmated {}! Game over.", mover, opponent)
    } else if info.is_stalemate {
        game.end_game();
        format!("{} and {} are in stalemate! Game over.", mover, opponent)
    } else if info.is_check {
        format!("{} has put {} in check!", mover, opponent)
    } else {
        format!("{} has made move {}", mover, mv)
    };

    db.update_state(id, &stored.game)?;
    info!(game_id = id, username = mover, %mv, "{}", notification);

    Ok(Json(MoveOutcome {
        game: GameView::from(&stored),
        notification,
    }))
}

pub async fn resign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(form): Json<super::PlayerForm>,
) -> ApiResult<Json<MoveOutcome>> {
    let db = state.db();
    let mut stored = db.get_game(id)?.ok_or(Error::GameNotFound(id))?;
    let color = stored
        .player_color(&form.username)
        .ok_or_else(|| Error::NotAPlayer(form.username.clone()))?;
    if stored.game.is_game_over() {
        return Err(Error::GameOver(id).into());
    }

    stored.game.end_game();
    db.update_state(id, &stored.game)?;

    let notification = format!(
        "{} has resigned to {}! Game over.",
        form.username,
        display_name(&stored, color.opposite())
    );
    info!(game_id = id, username = %form.username, "player resigned");

    Ok(Json(MoveOutcome {
        game: GameView::from(&stored),
        notification,
    }))
}
