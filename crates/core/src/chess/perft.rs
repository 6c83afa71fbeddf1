//! Move path enumeration, used to check the move generator against known node
//! counts

use super::game::Game;

/// Number of leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(game: &Game, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = game.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|mv| {
            let mut next = game.clone();
            next.apply_legal(mv);
            perft(&next, depth - 1)
        })
        .sum()
}
