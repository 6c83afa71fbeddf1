//! Board and auxiliary position state

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::{CastleSide, Color, Piece, PieceKind, Square};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Four castling latches. A right can only ever go from eligible to revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRights {
    white_king_side: bool,
    white_queen_side: bool,
    black_king_side: bool,
    black_queen_side: bool,
}

impl CastlingRights {
    pub fn all() -> Self {
        Self {
            white_king_side: true,
            white_queen_side: true,
            black_king_side: true,
            black_queen_side: true,
        }
    }

    pub fn none() -> Self {
        Self {
            white_king_side: false,
            white_queen_side: false,
            black_king_side: false,
            black_queen_side: false,
        }
    }

    pub(crate) fn from_flags(
        white_king_side: bool,
        white_queen_side: bool,
        black_king_side: bool,
        black_queen_side: bool,
    ) -> Self {
        Self {
            white_king_side,
            white_queen_side,
            black_king_side,
            black_queen_side,
        }
    }

    pub fn get(&self, color: Color, side: CastleSide) -> bool {
        *self.slot(color, side)
    }

    fn slot(&self, color: Color, side: CastleSide) -> &bool {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => &self.white_king_side,
            (Color::White, CastleSide::QueenSide) => &self.white_queen_side,
            (Color::Black, CastleSide::KingSide) => &self.black_king_side,
            (Color::Black, CastleSide::QueenSide) => &self.black_queen_side,
        }
    }

    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        let slot = match (color, side) {
            (Color::White, CastleSide::KingSide) => &mut self.white_king_side,
            (Color::White, CastleSide::QueenSide) => &mut self.white_queen_side,
            (Color::Black, CastleSide::KingSide) => &mut self.black_king_side,
            (Color::Black, CastleSide::QueenSide) => &mut self.black_queen_side,
        };
        *slot = false;
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

/// 8x8 grid of optional pieces plus castling rights and the en-passant
/// target. A plain value: `clone()` yields a fully independent copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
    castling: CastlingRights,
    en_passant: Option<Square>,
}

impl Board {
    /// A board with no pieces, no castling rights and no en-passant target
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
            castling: CastlingRights::none(),
            en_passant: None,
        }
    }

    pub fn standard() -> Self {
        let mut board = Self::empty();
        board.reset_to_standard_start();
        board
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        let (r, c) = square.index();
        self.squares[r][c]
    }

    /// Overwrites the square; no legality checking is done.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        let (r, c) = square.index();
        self.squares[r][c] = piece;
    }

    pub fn reset_to_standard_start(&mut self) {
        self.squares = [[None; 8]; 8];
        for color in Color::ALL {
            let home = color.home_row() as usize - 1;
            let pawns = color.pawn_start_row() as usize - 1;
            for (col, kind) in BACK_RANK.iter().enumerate() {
                self.squares[home][col] = Some(Piece::new(color, *kind));
                self.squares[pawns][col] = Some(Piece::new(color, PieceKind::Pawn));
            }
        }
        self.castling = CastlingRights::all();
        self.en_passant = None;
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub(crate) fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.castling = rights;
    }

    pub fn castling_eligible(&self, color: Color, side: CastleSide) -> bool {
        self.castling.get(color, side)
    }

    pub fn revoke_castling(&mut self, color: Color, side: CastleSide) {
        self.castling.revoke(color, side);
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn set_en_passant_target(&mut self, target: Option<Square>) {
        self.en_passant = target;
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        Square::all().find(|sq| self.get(*sq) == Some(king))
    }

    /// Occupied squares holding pieces of `color`
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.get(sq) {
            Some(piece) if piece.color == color => Some((sq, piece)),
            _ => None,
        })
    }

    pub fn piece_count(&self) -> usize {
        Square::all().filter(|sq| self.get(*sq).is_some()).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    /// One line per row, row 1 first: `|R|N|B|Q|K|B|N|R|`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.squares {
            for cell in row {
                let c = cell.map(|p| p.as_char()).unwrap_or(' ');
                write!(f, "|{}", c)?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_standard_layout() {
        let board = Board::standard();
        assert_eq!(board.piece_count(), 32);
        assert_eq!(board.get(sq("d1")), Some(Piece::new(Color::White, PieceKind::Queen)));
        assert_eq!(board.get(sq("e1")), Some(Piece::new(Color::White, PieceKind::King)));
        assert_eq!(board.get(sq("d8")), Some(Piece::new(Color::Black, PieceKind::Queen)));
        assert_eq!(board.get(sq("e8")), Some(Piece::new(Color::Black, PieceKind::King)));
        assert_eq!(board.get(sq("h7")), Some(Piece::new(Color::Black, PieceKind::Pawn)));
        assert_eq!(board.get(sq("e4")), None);
        for color in Color::ALL {
            for side in CastleSide::ALL {
                assert!(board.castling_eligible(color, side));
            }
        }
        assert_eq!(board.en_passant_target(), None);
    }

    #[test]
    fn test_reset_wipes_existing_pieces() {
        let mut board = Board::empty();
        board.set(sq("e4"), Some(Piece::new(Color::Black, PieceKind::Queen)));
        board.set_en_passant_target(Some(sq("e3")));
        board.reset_to_standard_start();
        assert_eq!(board, Board::standard());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Board::standard();
        let mut copy = original.clone();
        copy.set(sq("e2"), None);
        copy.revoke_castling(Color::White, CastleSide::KingSide);
        assert!(original.get(sq("e2")).is_some());
        assert!(original.castling_eligible(Color::White, CastleSide::KingSide));
        assert_ne!(original, copy);
    }

    #[test]
    fn test_revoke_is_one_way_and_idempotent() {
        let mut board = Board::standard();
        board.revoke_castling(Color::Black, CastleSide::QueenSide);
        board.revoke_castling(Color::Black, CastleSide::QueenSide);
        assert!(!board.castling_eligible(Color::Black, CastleSide::QueenSide));
        assert!(board.castling_eligible(Color::Black, CastleSide::KingSide));
        assert!(board.castling_eligible(Color::White, CastleSide::QueenSide));
    }

    #[test]
    fn test_equality_covers_auxiliary_state() {
        let a = Board::standard();
        let mut b = Board::standard();
        b.set_en_passant_target(Some(sq("e3")));
        assert_ne!(a, b);
    }

    #[test]
    fn test_json_keeps_castling_and_en_passant() {
        let mut board = Board::standard();
        board.revoke_castling(Color::White, CastleSide::QueenSide);
        board.set_en_passant_target(Some(sq("c6")));
        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_display_rows() {
        let text = Board::standard().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "|R|N|B|Q|K|B|N|R|");
        assert_eq!(lines[3], "| | | | | | | | |");
        assert_eq!(lines[7], "|r|n|b|q|k|b|n|r|");
    }

    #[test]
    fn test_find_king() {
        let mut board = Board::standard();
        assert_eq!(board.find_king(Color::Black), Some(sq("e8")));
        board.set(sq("e8"), None);
        assert_eq!(board.find_king(Color::Black), None);
        assert_eq!(board.pieces(Color::White).count(), 16);
    }
}
