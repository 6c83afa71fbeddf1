//! Chess Online Core Library

pub mod chess;
pub mod error;
pub mod storage;

pub use chess::{Board, Color, Game, GameStatus, Move, Piece, PieceKind, Square};
pub use error::{Error, Result};
pub use storage::Database;

/// Basic position information
#[derive(Debug)]
pub struct PositionInfo {
    pub piece_count: u32,
    pub legal_move_count: u32,
    pub side_to_move: Color,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
}

/// Analyzes the position of a game from the side to move
pub fn analyze_game(game: &Game) -> PositionInfo {
    let piece_count = game.board().piece_count() as u32;
    let legal_move_count = game.legal_moves().len() as u32;
    let side_to_move = game.turn();
    let is_check = game.is_in_check(side_to_move);
    let is_checkmate = game.is_in_checkmate(side_to_move);
    let is_stalemate = game.is_in_stalemate(side_to_move);

    PositionInfo {
        piece_count,
        legal_move_count,
        side_to_move,
        is_check,
        is_checkmate,
        is_stalemate,
    }
}

/// Creates a game in the standard starting position
pub fn starting_game() -> Game {
    Game::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position() {
        let info = analyze_game(&starting_game());

        assert_eq!(info.piece_count, 32);
        assert_eq!(info.side_to_move, Color::White);
        // 16 pawn moves + 4 knight moves
        assert_eq!(info.legal_move_count, 20);
        assert!(!info.is_check);
        assert!(!info.is_checkmate);
        assert!(!info.is_stalemate);
    }

    #[test]
    fn test_checkmated_position() {
        let game = Game::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        let info = analyze_game(&game);
        assert!(info.is_check);
        assert!(info.is_checkmate);
        assert_eq!(info.legal_move_count, 0);
    }
}
