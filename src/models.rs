/*!
 * DB models for the game database
 */

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::instrument;

use crate::error::{Error, Result};
use crate::extensions::QueryResultExt;

pub use crate::schema::{game, player, player_game, player_victory, victory};

pub type PlayerId = i32;
pub type GameId = i32;
pub type VictoryId = i32;

#[derive(Queryable, Insertable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = player)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn get(conn: &mut SqliteConnection, id: PlayerId) -> QueryResult<Option<Player>> {
        player::table.find(id).first(conn).optional()
    }

    pub fn require(conn: &mut SqliteConnection, id: PlayerId) -> Result<Player> {
        Self::get(conn, id)?.ok_or(Error::PlayerNotFound(id))
    }

    #[instrument(skip(conn))]
    pub fn insert(&self, conn: &mut SqliteConnection) -> Result<()> {
        diesel::insert_into(player::table)
            .values(self)
            .execute(conn)
            .on_duplicate(|| Error::PlayerExists(self.id))?;
        Ok(())
    }
}

#[derive(Queryable, Insertable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = game)]
pub struct Game {
    pub id: GameId,
    pub name: String,
}

impl Game {
    pub fn get(conn: &mut SqliteConnection, id: GameId) -> QueryResult<Option<Game>> {
        game::table.find(id).first(conn).optional()
    }

    pub fn require(conn: &mut SqliteConnection, id: GameId) -> Result<Game> {
        Self::get(conn, id)?.ok_or(Error::GameNotFound(id))
    }

    #[instrument(skip(conn))]
    pub fn insert(&self, conn: &mut SqliteConnection) -> Result<()> {
        diesel::insert_into(game::table)
            .values(self)
            .execute(conn)
            .on_duplicate(|| Error::GameExists(self.id))?;
        Ok(())
    }
}

/// A victory condition, worth `points` in the game that owns it.
#[derive(Queryable, Insertable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = victory)]
pub struct Victory {
    pub id: VictoryId,
    pub game_id: GameId,
    pub name: String,
    pub points: i32,
}

impl Victory {
    pub fn get(conn: &mut SqliteConnection, id: VictoryId) -> QueryResult<Option<Victory>> {
        victory::table.find(id).first(conn).optional()
    }

    /// Same as `get`, but only if the victory belongs to `game_id`.
    pub fn get_in_game(
        conn: &mut SqliteConnection,
        id: VictoryId,
        game_id: GameId,
    ) -> QueryResult<Option<Victory>> {
        victory::table
            .find(id)
            .filter(victory::game_id.eq(game_id))
            .first(conn)
            .optional()
    }

    pub fn for_game(conn: &mut SqliteConnection, game_id: GameId) -> QueryResult<Vec<Victory>> {
        victory::table
            .filter(victory::game_id.eq(game_id))
            .order((victory::points.desc(), victory::name.asc()))
            .load(conn)
    }

    #[instrument(skip(conn))]
    pub fn insert(&self, conn: &mut SqliteConnection) -> Result<()> {
        conn.transaction::<_, Error, _>(|conn| {
            Game::require(conn, self.game_id)?;
            diesel::insert_into(victory::table)
                .values(self)
                .execute(conn)
                .on_duplicate(|| Error::VictoryExists(self.id))?;
            Ok(())
        })
    }
}

/// A player having a game in their library, under an optional in-game name.
#[derive(Queryable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = player_game)]
pub struct Participation {
    pub player_id: PlayerId,
    pub game_id: GameId,
    pub ign: Option<String>,
}

impl Participation {
    #[instrument(skip(conn))]
    pub fn insert(&self, conn: &mut SqliteConnection) -> Result<()> {
        conn.transaction::<_, Error, _>(|conn| {
            Player::require(conn, self.player_id)?;
            Game::require(conn, self.game_id)?;
            diesel::insert_into(player_game::table)
                .values(self)
                .execute(conn)
                .on_duplicate(|| Error::AlreadyPlays {
                    player_id: self.player_id,
                    game_id: self.game_id,
                })?;
            Ok(())
        })
    }
}

/// A victory earned by a player. The game is always the victory's own.
#[derive(Queryable, Insertable, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = player_victory)]
pub struct EarnedVictory {
    pub player_id: PlayerId,
    pub victory_id: VictoryId,
}

impl EarnedVictory {
    #[instrument(skip(conn))]
    pub fn insert(&self, conn: &mut SqliteConnection) -> Result<()> {
        conn.transaction::<_, Error, _>(|conn| {
            Player::require(conn, self.player_id)?;
            if Victory::get(conn, self.victory_id)?.is_none() {
                return Err(Error::VictoryNotFound { victory_id: self.victory_id, game_id: None });
            }
            diesel::insert_into(player_victory::table)
                .values(self)
                .execute(conn)
                .on_duplicate(|| Error::AlreadyEarned {
                    player_id: self.player_id,
                    victory_id: self.victory_id,
                })?;
            Ok(())
        })
    }

    /// Players that earned `victory_id`, by name.
    pub fn earners(conn: &mut SqliteConnection, victory_id: VictoryId) -> QueryResult<Vec<Player>> {
        player_victory::table
            .inner_join(player::table)
            .filter(player_victory::victory_id.eq(victory_id))
            .select((player::id, player::name))
            .order(player::name.asc())
            .load(conn)
    }
}
