//! Forsyth-Edwards Notation for boards and games
//!
//! Placement, side to move, castling availability and the en-passant square
//! are read and written. Move counters are emitted as `0 1` and ignored on
//! input, since the engine does not track them.

use super::board::{Board, CastlingRights};
use super::game::Game;
use super::types::{CastleSide, Color, Piece, Square};
use crate::error::{Error, Result};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parses a FEN string into a board and the side to move.
    pub fn from_fen(fen: &str) -> Result<(Board, Color)> {
        let mut fields = fen.split_whitespace();
        let placement = fields
            .next()
            .ok_or_else(|| Error::Fen("empty FEN".to_string()))?;

        let mut board = Board::empty();
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(Error::Fen(format!("expected 8 ranks, found {}", ranks.len())));
        }
        for (i, rank) in ranks.iter().enumerate() {
            let row = 8 - i as u8;
            let mut col = 1u8;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(Error::Fen(format!("invalid empty-square count '{}'", c)));
                    }
                    col += skip as u8;
                    if col > 9 {
                        return Err(Error::Fen(format!("rank {} is too long", row)));
                    }
                    continue;
                }
                let piece = Piece::from_char(c)
                    .ok_or_else(|| Error::Fen(format!("unknown piece '{}'", c)))?;
                let square = Square::new(row, col)
                    .ok_or_else(|| Error::Fen(format!("rank {} is too long", row)))?;
                board.set(square, Some(piece));
                col += 1;
            }
            if col != 9 {
                return Err(Error::Fen(format!("rank {} does not have 8 files", row)));
            }
        }

        let turn = match fields.next() {
            Some("w") | None => Color::White,
            Some("b") => Color::Black,
            Some(other) => return Err(Error::Fen(format!("invalid side to move '{}'", other))),
        };

        let castling = fields.next().unwrap_or("-");
        if castling != "-" && !castling.chars().all(|c| "KQkq".contains(c)) {
            return Err(Error::Fen(format!("invalid castling field '{}'", castling)));
        }
        board.set_castling_rights(CastlingRights::from_flags(
            castling.contains('K'),
            castling.contains('Q'),
            castling.contains('k'),
            castling.contains('q'),
        ));

        let en_passant = match fields.next() {
            None | Some("-") => None,
            Some(s) => Some(
                s.parse::<Square>()
                    .map_err(|_| Error::Fen(format!("invalid en passant square '{}'", s)))?,
            ),
        };
        board.set_en_passant_target(en_passant);

        Ok((board, turn))
    }

    pub fn to_fen(&self, turn: Color) -> String {
        let mut out = String::new();
        for row in (1..=8u8).rev() {
            let mut empty = 0;
            for col in 1..=8u8 {
                match Square::new(row, col).and_then(|sq| self.get(sq)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.as_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if row > 1 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match turn {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        let mut castling = String::new();
        for (color, side, c) in [
            (Color::White, CastleSide::KingSide, 'K'),
            (Color::White, CastleSide::QueenSide, 'Q'),
            (Color::Black, CastleSide::KingSide, 'k'),
            (Color::Black, CastleSide::QueenSide, 'q'),
        ] {
            if self.castling_eligible(color, side) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        out.push_str(&castling);

        out.push(' ');
        match self.en_passant_target() {
            Some(sq) => out.push_str(&sq.to_string()),
            None => out.push('-'),
        }
        out.push_str(" 0 1");
        out
    }
}

impl Game {
    pub fn from_fen(fen: &str) -> Result<Self> {
        let (board, turn) = Board::from_fen(fen)?;
        Ok(Game::from_board(board, turn))
    }

    pub fn to_fen(&self) -> String {
        self.board().to_fen(self.turn())
    }
}
