//! Database operations

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use super::models::*;
use crate::chess::{Color, Game};
use crate::error::{Error, Result};

const SELECT_GAME: &str =
    "SELECT id, name, white_username, black_username, state, created_at, updated_at FROM games";

pub struct Database {
    conn: Connection,
}

/// Row as stored, before the JSON state is decoded
struct GameRow {
    id: i64,
    name: String,
    white_username: Option<String>,
    black_username: Option<String>,
    state: String,
    created_at: i64,
    updated_at: i64,
}

impl GameRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            white_username: row.get(2)?,
            black_username: row.get(3)?,
            state: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn decode(self) -> Result<StoredGame> {
        Ok(StoredGame {
            id: self.id,
            name: self.name,
            white_username: self.white_username,
            black_username: self.black_username,
            game: serde_json::from_str(&self.state)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                white_username TEXT,
                black_username TEXT,
                state TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_games_created_at ON games(created_at);
            "#,
        )?;
        Ok(())
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default()
    }

    /// Creates a game in the standard starting position and returns its id
    pub fn create_game(&self, name: &str) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::BadRequest("game name is required".to_string()));
        }
        let state = serde_json::to_string(&crate::starting_game())?;
        let now = Self::now();

        self.conn.execute(
            "INSERT INTO games (name, state, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, state, now, now],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(game_id = id, name, "created game");
        Ok(id)
    }

    pub fn get_game(&self, id: i64) -> Result<Option<StoredGame>> {
        let mut stmt = self.conn.prepare(&format!("{} WHERE id = ?1", SELECT_GAME))?;
        let row = stmt.query_row(params![id], GameRow::read).optional()?;
        row.map(GameRow::decode).transpose()
    }

    pub fn list_games(&self) -> Result<Vec<StoredGame>> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY id", SELECT_GAME))?;
        let rows = stmt
            .query_map([], GameRow::read)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(GameRow::decode).collect()
    }

    /// Seats `username` as `color`. The seat must be free.
    pub fn join_game(&self, id: i64, color: Color, username: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::BadRequest("username is required".to_string()));
        }
        let game = self.get_game(id)?.ok_or(Error::GameNotFound(id))?;
        if game.username(color).is_some_and(|taken| !taken.is_empty()) {
            return Err(Error::AlreadyTaken { game_id: id, color });
        }

        let sql = match color {
            Color::White => "UPDATE games SET white_username = ?1, updated_at = ?2 WHERE id = ?3",
            Color::Black => "UPDATE games SET black_username = ?1, updated_at = ?2 WHERE id = ?3",
        };
        self.conn.execute(sql, params![username, Self::now(), id])?;
        info!(game_id = id, username, color = %color, "player joined");
        Ok(())
    }

    /// Frees the seat held by `username`
    pub fn leave_game(&self, id: i64, username: &str) -> Result<Color> {
        let game = self.get_game(id)?.ok_or(Error::GameNotFound(id))?;
        let color = game
            .player_color(username)
            .ok_or_else(|| Error::NotAPlayer(username.to_string()))?;

        let sql = match color {
            Color::White => "UPDATE games SET white_username = NULL, updated_at = ?1 WHERE id = ?2",
            Color::Black => "UPDATE games SET black_username = NULL, updated_at = ?1 WHERE id = ?2",
        };
        self.conn.execute(sql, params![Self::now(), id])?;
        info!(game_id = id, username, "player left");
        Ok(color)
    }

    /// Stores the full engine state: grid, castling rights, en-passant
    /// target, side to move and the game-over flag.
    pub fn update_state(&self, id: i64, game: &Game) -> Result<()> {
        let state = serde_json::to_string(game)?;
        let changed = self.conn.execute(
            "UPDATE games SET state = ?1, updated_at = ?2 WHERE id = ?3",
            params![state, Self::now(), id],
        )?;
        if changed == 0 {
            return Err(Error::GameNotFound(id));
        }
        debug!(game_id = id, "stored game state");
        Ok(())
    }

    pub fn count_games(&self) -> Result<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM games",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM games", [])?;
        info!("cleared all games");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{CastleSide, Move};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_and_get() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_game("friendly").unwrap();
        let stored = db.get_game(id).unwrap().unwrap();
        assert_eq!(stored.name, "friendly");
        assert_eq!(stored.white_username, None);
        assert_eq!(stored.game, Game::new());
        assert!(db.get_game(id + 1).unwrap().is_none());
    }

    #[test]
    fn test_create_requires_name() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.create_game("  "), Err(Error::BadRequest(_))));
        assert_eq!(db.count_games().unwrap(), 0);
    }

    #[test]
    fn test_join_and_leave() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_game("g").unwrap();
        db.join_game(id, Color::White, "alice").unwrap();
        db.join_game(id, Color::Black, "bob").unwrap();
        assert!(matches!(
            db.join_game(id, Color::White, "carol"),
            Err(Error::AlreadyTaken { color: Color::White, .. })
        ));
        assert!(matches!(db.join_game(99, Color::White, "carol"), Err(Error::GameNotFound(99))));

        let stored = db.get_game(id).unwrap().unwrap();
        assert_eq!(stored.player_color("alice"), Some(Color::White));
        assert_eq!(stored.player_color("bob"), Some(Color::Black));
        assert_eq!(stored.player_color("carol"), None);

        assert_eq!(db.leave_game(id, "bob").unwrap(), Color::Black);
        assert!(matches!(db.leave_game(id, "bob"), Err(Error::NotAPlayer(_))));
        db.join_game(id, Color::Black, "carol").unwrap();
    }

    #[test]
    fn test_state_round_trip_keeps_special_move_state() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_game("g").unwrap();
        let mut game = Game::new();
        for m in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            game.make_move(m.parse::<Move>().unwrap()).unwrap();
        }
        db.update_state(id, &game).unwrap();

        let loaded = db.get_game(id).unwrap().unwrap().game;
        assert_eq!(loaded, game);
        assert_eq!(loaded.board().en_passant_target(), Some("d6".parse().unwrap()));
        assert!(loaded.board().castling_eligible(Color::White, CastleSide::KingSide));
    }

    #[test]
    fn test_update_missing_game() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.update_state(5, &Game::new()), Err(Error::GameNotFound(5))));
    }

    #[test]
    fn test_list_and_clear() {
        let db = Database::open_in_memory().unwrap();
        db.create_game("one").unwrap();
        db.create_game("two").unwrap();
        let names: Vec<String> = db.list_games().unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["one", "two"]);
        db.clear().unwrap();
        assert_eq!(db.count_games().unwrap(), 0);
    }
}
