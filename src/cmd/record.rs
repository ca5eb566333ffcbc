/*!
 * Commands that record new facts
 */

use diesel::SqliteConnection;

use crate::error::Error;
use crate::friendship::insert_friendship;
use crate::models::*;
use super::*;

pub fn add_player(conn: &mut SqliteConnection, player_id: PlayerId, name: String) -> StringResult {
    let player = Player { id: player_id, name };
    player.insert(conn)?;
    Ok(format!("{} added as Player #{}.", player.name, player.id))
}

pub fn add_game(conn: &mut SqliteConnection, game_id: GameId, name: String) -> StringResult {
    let game = Game { id: game_id, name };
    game.insert(conn)?;
    Ok(format!("{} added as Game #{}.", game.name, game.id))
}

pub fn add_victory(
    conn: &mut SqliteConnection,
    game_id: GameId,
    victory_id: VictoryId,
    name: String,
    points: i32,
) -> StringResult {
    let game = Game::require(conn, game_id)?;
    let victory = Victory { id: victory_id, game_id, name, points };
    victory.insert(conn)?;
    Ok(format!("'{}' added to {} as Victory #{}.", victory.name, game.name, victory.id))
}

pub fn plays(conn: &mut SqliteConnection, player_id: PlayerId, game_id: GameId, ign: String) -> StringResult {
    let player = Player::require(conn, player_id)?;
    let game = Game::require(conn, game_id)?;
    Participation { player_id, game_id, ign: Some(ign) }.insert(conn)?;
    Ok(format!("Added '{}' to player {}'s game list.", game.name, player.name))
}

pub fn add_friends(conn: &mut SqliteConnection, player1_id: PlayerId, player2_id: PlayerId) -> StringResult {
    insert_friendship(conn, player1_id, player2_id)?;
    let player1 = Player::require(conn, player1_id)?;
    let player2 = Player::require(conn, player2_id)?;
    Ok(format!("{} and {} are now friends.", player1.name, player2.name))
}

/// The victory has to belong to `game_id`, even though only the victory is stored.
pub fn win_victory(
    conn: &mut SqliteConnection,
    player_id: PlayerId,
    game_id: GameId,
    victory_id: VictoryId,
) -> StringResult {
    let player = Player::require(conn, player_id)?;
    let victory = Victory::get_in_game(conn, victory_id, game_id)?
        .ok_or(Error::VictoryNotFound { victory_id, game_id: Some(game_id) })?;
    EarnedVictory { player_id, victory_id }.insert(conn)?;
    Ok(format!("Added '{}' to {}'s victories.", victory.name, player.name))
}
