//! Error types for chess-online-core

use thiserror::Error;

use crate::chess::{Color, Move};

#[derive(Error, Debug)]
pub enum Error {
    /// Any illegal move attempt: wrong turn, empty start square, not a
    /// destination of the piece, or leaving the mover's king in check.
    #[error("Invalid move: {0}")]
    InvalidMove(Move),

    #[error("Invalid notation: {0}")]
    Notation(String),

    #[error("FEN parsing error: {0}")]
    Fen(String),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Game {0} not found")]
    GameNotFound(i64),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{color} is already taken in game {game_id}")]
    AlreadyTaken { game_id: i64, color: Color },

    #[error("{0} is not one of the game players")]
    NotAPlayer(String),

    #[error("Game {0} has already ended")]
    GameOver(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
