//! Chess rules engine
//!
//! [`Board`] holds the position, [`movegen`] produces pseudo-legal moves and
//! [`Game`] turns them into legal moves, detects check, checkmate and
//! stalemate, and applies moves.

mod board;
mod fen;
mod game;
pub mod movegen;
mod perft;
mod types;

pub use board::{Board, CastlingRights};
pub use fen::STARTING_FEN;
pub use game::{Game, GameStatus};
pub use perft::perft;
pub use types::*;
