//! Pseudo-legal move generation
//!
//! Moves produced here ignore whose turn it is and whether the mover's king
//! is left attacked. Filtering for check happens in [`super::game`].

use super::board::Board;
use super::types::{CastleSide, Color, Move, Piece, PieceKind, Square};

const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const QUEEN_DIRS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// King columns never change, so the home square is fixed per color.
const KING_HOME_COL: u8 = 5;

/// All moves the piece on `square` could make, ignoring check.
///
/// Returns an empty list when the square is empty.
pub fn pseudo_legal_moves(board: &Board, square: Square) -> Vec<Move> {
    let Some(piece) = board.get(square) else {
        return Vec::new();
    };

    let mut moves = Vec::new();
    match piece.kind {
        PieceKind::Rook => slide(board, square, piece.color, &ROOK_DIRS, &mut moves),
        PieceKind::Bishop => slide(board, square, piece.color, &BISHOP_DIRS, &mut moves),
        PieceKind::Queen => slide(board, square, piece.color, &QUEEN_DIRS, &mut moves),
        PieceKind::Knight => step(board, square, piece.color, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::King => {
            step(board, square, piece.color, &QUEEN_DIRS, &mut moves);
            castles(board, square, piece.color, &mut moves);
        }
        PieceKind::Pawn => pawn(board, square, piece.color, &mut moves),
    }
    moves
}

fn slide(board: &Board, from: Square, color: Color, dirs: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(dr, dc) in dirs {
        let mut current = from.offset(dr, dc);
        while let Some(to) = current {
            match board.get(to) {
                None => moves.push(Move::new(from, to, None)),
                Some(other) => {
                    if other.color != color {
                        moves.push(Move::new(from, to, None));
                    }
                    break;
                }
            }
            current = to.offset(dr, dc);
        }
    }
}

fn step(board: &Board, from: Square, color: Color, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(dr, dc) in offsets {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };
        if board.get(to).map_or(true, |other| other.color != color) {
            moves.push(Move::new(from, to, None));
        }
    }
}

fn castles(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    let home = color.home_row();
    if from.row() != home || from.col() != KING_HOME_COL {
        return;
    }
    let rook = Piece::new(color, PieceKind::Rook);

    for side in CastleSide::ALL {
        if !board.castling_eligible(color, side) {
            continue;
        }
        let rook_col = side.rook_col();
        let Some(corner) = Square::new(home, rook_col) else {
            continue;
        };
        if board.get(corner) != Some(rook) {
            continue;
        }

        let (lo, hi) = if rook_col < KING_HOME_COL {
            (rook_col + 1, KING_HOME_COL)
        } else {
            (KING_HOME_COL + 1, rook_col)
        };
        let path_clear = (lo..hi)
            .filter_map(|col| Square::new(home, col))
            .all(|sq| board.get(sq).is_none());
        if !path_clear {
            continue;
        }

        if let Some(to) = Square::new(home, side.king_target_col()) {
            moves.push(Move::new(from, to, None));
        }
    }
}

fn pawn(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    let dir = color.pawn_direction();

    if let Some(one) = from.offset(dir, 0) {
        if board.get(one).is_none() {
            push_pawn_move(from, one, color, moves);

            if from.row() == color.pawn_start_row() {
                if let Some(two) = one.offset(dir, 0) {
                    if board.get(two).is_none() {
                        moves.push(Move::new(from, two, None));
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        let Some(to) = from.offset(dir, dc) else {
            continue;
        };
        match board.get(to) {
            Some(other) if other.color != color => push_pawn_move(from, to, color, moves),
            Some(_) => {}
            None => {
                if board.en_passant_target() == Some(to) && captures_en_passant(board, from, to, color) {
                    moves.push(Move::new(from, to, None));
                }
            }
        }
    }
}

/// Whether an enemy pawn sits beside `from` on the destination's column.
fn captures_en_passant(board: &Board, from: Square, to: Square, color: Color) -> bool {
    let victim = Square::new(from.row(), to.col()).and_then(|sq| board.get(sq));
    victim == Some(Piece::new(color.opposite(), PieceKind::Pawn))
}

fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut Vec<Move>) {
    if to.row() == color.promotion_row() {
        moves.extend(
            PieceKind::PROMOTIONS
                .iter()
                .map(|kind| Move::new(from, to, Some(*kind))),
        );
    } else {
        moves.push(Move::new(from, to, None));
    }
}

/// A king move of two columns. Only castling produces one.
pub fn is_castle(board: &Board, mv: &Move) -> bool {
    matches!(board.get(mv.start), Some(p) if p.kind == PieceKind::King)
        && mv.start.row() == mv.end.row()
        && mv.start.col().abs_diff(mv.end.col()) == 2
}

/// A diagonal pawn move onto an empty square. Only en passant produces one.
pub fn is_en_passant(board: &Board, mv: &Move) -> bool {
    matches!(board.get(mv.start), Some(p) if p.kind == PieceKind::Pawn)
        && mv.start.col() != mv.end.col()
        && board.get(mv.end).is_none()
}

/// Applies a move with all its side effects on the grid: the castling rook
/// hop, en-passant capture removal and promotion. Castling rights and the
/// en-passant target are left untouched; no legality checking is done.
pub fn apply_unchecked(board: &mut Board, mv: &Move) {
    let Some(piece) = board.get(mv.start) else {
        return;
    };

    if is_castle(board, mv) {
        let side = if mv.end.col() > mv.start.col() {
            CastleSide::KingSide
        } else {
            CastleSide::QueenSide
        };
        let row = mv.start.row();
        if let (Some(corner), Some(target)) = (
            Square::new(row, side.rook_col()),
            Square::new(row, side.rook_target_col()),
        ) {
            let rook = board.get(corner);
            board.set(corner, None);
            board.set(target, rook);
        }
    } else if is_en_passant(board, mv) {
        if let Some(victim) = Square::new(mv.start.row(), mv.end.col()) {
            board.set(victim, None);
        }
    }

    let landed = match mv.promotion {
        Some(kind) => Piece::new(piece.color, kind),
        None => piece,
    };
    board.set(mv.start, None);
    board.set(mv.end, Some(landed));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::board::CastlingRights;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn place(board: &mut Board, s: &str, c: char) {
        board.set(sq(s), Piece::from_char(c));
    }

    fn targets(board: &Board, from: &str) -> HashSet<String> {
        pseudo_legal_moves(board, sq(from))
            .iter()
            .map(|m| m.to_string()[2..].to_string())
            .collect()
    }

    fn set_of(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_square_has_no_moves() {
        assert!(pseudo_legal_moves(&Board::standard(), sq("e4")).is_empty());
    }

    #[test]
    fn test_rook_stops_at_blockers() {
        let mut board = Board::empty();
        place(&mut board, "d4", 'R');
        place(&mut board, "d6", 'p');
        place(&mut board, "f4", 'P');
        assert_eq!(
            targets(&board, "d4"),
            set_of(&["d5", "d6", "d3", "d2", "d1", "e4", "c4", "b4", "a4"])
        );
    }

    #[test]
    fn test_bishop_in_corner() {
        let mut board = Board::empty();
        place(&mut board, "a1", 'b');
        assert_eq!(
            targets(&board, "a1"),
            set_of(&["b2", "c3", "d4", "e5", "f6", "g7", "h8"])
        );
    }

    #[test]
    fn test_queen_in_center_of_empty_board() {
        let mut board = Board::empty();
        place(&mut board, "d4", 'Q');
        assert_eq!(pseudo_legal_moves(&board, sq("d4")).len(), 27);
    }

    #[test]
    fn test_knight_edge_and_friendly_blocking() {
        let mut board = Board::empty();
        place(&mut board, "b1", 'N');
        place(&mut board, "d2", 'P');
        place(&mut board, "c3", 'p');
        assert_eq!(targets(&board, "b1"), set_of(&["a3", "c3"]));
    }

    #[test]
    fn test_king_steps_and_castles() {
        let mut board = Board::empty();
        board.set_castling_rights(CastlingRights::all());
        place(&mut board, "e1", 'K');
        place(&mut board, "h1", 'R');
        place(&mut board, "a1", 'R');
        place(&mut board, "b1", 'N');
        let t = targets(&board, "e1");
        assert!(t.contains("g1"));
        assert!(!t.contains("c1"));
        assert_eq!(t.len(), 6);
    }

    #[test]
    fn test_castle_requires_rook_at_home() {
        let mut board = Board::empty();
        board.set_castling_rights(CastlingRights::all());
        place(&mut board, "e8", 'k');
        place(&mut board, "h8", 'n');
        place(&mut board, "a8", 'R');
        let t = targets(&board, "e8");
        assert!(!t.contains("g8"));
        assert!(!t.contains("c8"));
    }

    #[test]
    fn test_pawn_pushes_from_start() {
        let board = Board::standard();
        assert_eq!(targets(&board, "e2"), set_of(&["e3", "e4"]));
        assert_eq!(targets(&board, "b7"), set_of(&["b6", "b5"]));
    }

    #[test]
    fn test_pawn_blocked_double_push() {
        let mut board = Board::standard();
        place(&mut board, "e4", 'n');
        assert_eq!(targets(&board, "e2"), set_of(&["e3"]));
        place(&mut board, "e3", 'n');
        assert!(targets(&board, "e2").is_empty());
    }

    #[test]
    fn test_pawn_captures_only_enemies() {
        let mut board = Board::empty();
        place(&mut board, "d4", 'P');
        place(&mut board, "c5", 'p');
        place(&mut board, "e5", 'N');
        assert_eq!(targets(&board, "d4"), set_of(&["d5", "c5"]));
    }

    #[test]
    fn test_pawn_en_passant_needs_target_and_victim() {
        let mut board = Board::empty();
        place(&mut board, "e5", 'P');
        place(&mut board, "d5", 'p');
        assert_eq!(targets(&board, "e5"), set_of(&["e6"]));

        board.set_en_passant_target(Some(sq("d6")));
        assert_eq!(targets(&board, "e5"), set_of(&["e6", "d6"]));

        board.set(sq("d5"), None);
        assert_eq!(targets(&board, "e5"), set_of(&["e6"]));
    }

    #[test]
    fn test_promotion_emits_four_moves() {
        let mut board = Board::empty();
        place(&mut board, "g7", 'P');
        place(&mut board, "h8", 'r');
        let moves = pseudo_legal_moves(&board, sq("g7"));
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|m| m.promotion.is_some()));
        let kinds: HashSet<_> = moves
            .iter()
            .filter(|m| m.end == sq("h8"))
            .map(|m| m.promotion)
            .collect();
        assert_eq!(kinds.len(), 4);
    }

    #[test]
    fn test_apply_castle_moves_rook() {
        let mut board = Board::standard();
        for s in ["f1", "g1"] {
            board.set(sq(s), None);
        }
        let mv = Move::new(sq("e1"), sq("g1"), None);
        assert!(is_castle(&board, &mv));
        apply_unchecked(&mut board, &mv);
        assert_eq!(board.get(sq("g1")), Piece::from_char('K'));
        assert_eq!(board.get(sq("f1")), Piece::from_char('R'));
        assert_eq!(board.get(sq("h1")), None);
        assert_eq!(board.get(sq("e1")), None);
    }

    #[test]
    fn test_apply_en_passant_removes_victim() {
        let mut board = Board::empty();
        place(&mut board, "e5", 'P');
        place(&mut board, "f5", 'p');
        board.set_en_passant_target(Some(sq("f6")));
        let mv = Move::new(sq("e5"), sq("f6"), None);
        assert!(is_en_passant(&board, &mv));
        apply_unchecked(&mut board, &mv);
        assert_eq!(board.get(sq("f6")), Piece::from_char('P'));
        assert_eq!(board.get(sq("f5")), None);
        assert_eq!(board.piece_count(), 1);
    }

    #[test]
    fn test_apply_promotion_replaces_pawn() {
        let mut board = Board::empty();
        place(&mut board, "a2", 'p');
        apply_unchecked(&mut board, &Move::new(sq("a2"), sq("a1"), Some(PieceKind::Knight)));
        assert_eq!(board.get(sq("a1")), Piece::from_char('n'));
    }
}
