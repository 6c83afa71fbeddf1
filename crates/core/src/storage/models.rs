//! Database models

use serde::{Deserialize, Serialize};

use crate::chess::{Color, Game};

/// A game row together with its decoded engine state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredGame {
    pub id: i64,
    pub name: String,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub game: Game,
    pub created_at: i64,
    pub updated_at: i64,
}

impl StoredGame {
    /// Color `username` plays in this game, if seated
    pub fn player_color(&self, username: &str) -> Option<Color> {
        if self.white_username.as_deref() == Some(username) {
            Some(Color::White)
        } else if self.black_username.as_deref() == Some(username) {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn username(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white_username.as_deref(),
            Color::Black => self.black_username.as_deref(),
        }
    }
}
