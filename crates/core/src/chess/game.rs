//! Game orchestration: legality filtering, check detection and move
//! application

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::board::Board;
use super::movegen::{apply_unchecked, is_castle, pseudo_legal_moves};
use super::types::{CastleSide, Color, Move, PieceKind, Square};
use crate::error::{Error, Result};

/// Summary of the position from the side to move's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    /// Ended by resignation or by the caller
    Over,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Over => "over",
        }
    }
}

/// A chess game: the board, the side to move and whether play has ended.
///
/// The game exclusively owns its board. Nothing here locks; callers sharing
/// a game across threads must serialize calls to [`Game::make_move`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Color,
    game_over: bool,
}

impl Game {
    /// Standard starting position, White to move
    pub fn new() -> Self {
        Self::from_board(Board::standard(), Color::White)
    }

    pub fn from_board(board: Board, turn: Color) -> Self {
        Self {
            board,
            turn,
            game_over: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn set_turn(&mut self, color: Color) {
        self.turn = color;
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Marks the game finished; later moves are rejected.
    pub fn end_game(&mut self) {
        self.game_over = true;
    }

    /// Legal moves for the piece on `square`, whichever side it belongs to.
    ///
    /// Returns `None` if the square is empty.
    pub fn valid_moves(&self, square: Square) -> Option<Vec<Move>> {
        let piece = self.board.get(square)?;
        let moves = pseudo_legal_moves(&self.board, square)
            .into_iter()
            .filter(|mv| leaves_king_safe(&self.board, mv, piece.color))
            .collect();
        Some(moves)
    }

    /// Every legal move for the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        self.board
            .pieces(self.turn)
            .flat_map(|(sq, _)| self.valid_moves(sq).unwrap_or_default())
            .collect()
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        in_check(&self.board, color)
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.turn == color && self.is_in_check(color) && !self.has_valid_move(color)
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        self.turn == color && !self.is_in_check(color) && !self.has_valid_move(color)
    }

    fn has_valid_move(&self, color: Color) -> bool {
        self.board
            .pieces(color)
            .any(|(sq, _)| self.valid_moves(sq).is_some_and(|moves| !moves.is_empty()))
    }

    pub fn status(&self) -> GameStatus {
        if self.is_in_checkmate(self.turn) {
            GameStatus::Checkmate
        } else if self.is_in_stalemate(self.turn) {
            GameStatus::Stalemate
        } else if self.game_over {
            GameStatus::Over
        } else if self.is_in_check(self.turn) {
            GameStatus::Check
        } else {
            GameStatus::Ongoing
        }
    }

    /// Validates and plays `mv` for the side to move.
    ///
    /// Fails with [`Error::InvalidMove`] without touching the game when the
    /// game is over, the start square holds no piece of the side to move, or
    /// the move is not among that piece's valid moves.
    pub fn make_move(&mut self, mv: Move) -> Result<()> {
        let owned = self.board.get(mv.start).is_some_and(|p| p.color == self.turn);
        let listed = owned
            && self
                .valid_moves(mv.start)
                .is_some_and(|moves| moves.contains(&mv));

        if self.game_over || !listed {
            warn!(%mv, turn = %self.turn, "rejected move");
            return Err(Error::InvalidMove(mv));
        }

        self.apply_legal(&mv);
        debug!(%mv, turn = %self.turn, "applied move");
        Ok(())
    }

    /// Plays an already validated move and updates all auxiliary state.
    pub(crate) fn apply_legal(&mut self, mv: &Move) {
        let Some(piece) = self.board.get(mv.start) else {
            return;
        };
        let color = piece.color;

        apply_unchecked(&mut self.board, mv);

        match piece.kind {
            PieceKind::King => {
                for side in CastleSide::ALL {
                    self.board.revoke_castling(color, side);
                }
            }
            PieceKind::Rook if mv.start.row() == color.home_row() => {
                if let Some(side) = CastleSide::from_rook_col(mv.start.col()) {
                    self.board.revoke_castling(color, side);
                }
            }
            _ => {}
        }

        // Landing on an enemy corner takes the rook that castles from it.
        let enemy = color.opposite();
        if mv.end.row() == enemy.home_row() {
            if let Some(side) = CastleSide::from_rook_col(mv.end.col()) {
                self.board.revoke_castling(enemy, side);
            }
        }

        let double_push = piece.kind == PieceKind::Pawn && mv.start.row().abs_diff(mv.end.row()) == 2;
        let target = if double_push {
            Square::new((mv.start.row() + mv.end.row()) / 2, mv.start.col())
        } else {
            None
        };
        self.board.set_en_passant_target(target);

        self.turn = self.turn.opposite();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether any enemy piece has a pseudo-legal move onto `color`'s king.
/// A missing king is never in check.
fn in_check(board: &Board, color: Color) -> bool {
    let Some(king) = board.find_king(color) else {
        return false;
    };
    board
        .pieces(color.opposite())
        .any(|(sq, _)| pseudo_legal_moves(board, sq).iter().any(|mv| mv.end == king))
}

/// Simulates `mv` on a copy of `board` and reports whether `color` is safe.
/// Castling must also be safe on the start and pass-through squares.
fn leaves_king_safe(board: &Board, mv: &Move, color: Color) -> bool {
    if is_castle(board, mv) {
        if in_check(board, color) {
            return false;
        }
        let step = if mv.end.col() > mv.start.col() { 1 } else { -1 };
        let Some(through) = mv.start.offset(0, step) else {
            return false;
        };
        let mut passing = board.clone();
        let king = passing.get(mv.start);
        passing.set(mv.start, None);
        passing.set(through, king);
        if in_check(&passing, color) {
            return false;
        }
    }

    let mut after = board.clone();
    apply_unchecked(&mut after, mv);
    !in_check(&after, color)
}
