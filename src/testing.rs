//! Fixtures shared by the unit tests. Every helper panics on failure.

use diesel::SqliteConnection;

use crate::db;
use crate::models::*;

pub fn conn() -> SqliteConnection {
    db::establish(db::MEMORY_DATABASE).expect("in-memory database")
}

pub fn player(conn: &mut SqliteConnection, id: PlayerId, name: &str) {
    Player { id, name: name.to_owned() }.insert(conn).expect("insert player");
}

pub fn game(conn: &mut SqliteConnection, id: GameId, name: &str) {
    Game { id, name: name.to_owned() }.insert(conn).expect("insert game");
}

pub fn victory(conn: &mut SqliteConnection, game_id: GameId, id: VictoryId, name: &str, points: i32) {
    Victory { id, game_id, name: name.to_owned(), points }.insert(conn).expect("insert victory");
}

pub fn plays(conn: &mut SqliteConnection, player_id: PlayerId, game_id: GameId) {
    Participation { player_id, game_id, ign: None }.insert(conn).expect("insert participation");
}

pub fn earn(conn: &mut SqliteConnection, player_id: PlayerId, victory_id: VictoryId) {
    EarnedVictory { player_id, victory_id }.insert(conn).expect("insert earned victory");
}
