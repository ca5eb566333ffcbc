/*!
 * Per-game victory counts and scores
 *
 * Every participation row yields exactly one [`GameTotals`], zeros included. The
 * earned victories carry no game id, so they are matched to a participation
 * through their victory's `game_id` only.
 */

use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::models::{player_game, player_victory, victory, GameId, PlayerId};

pub use crate::schema::per_game_totals;

#[derive(Queryable, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameTotals {
    pub player_id: PlayerId,
    pub game_id: GameId,
    pub n_earned_victories: i64,
    pub game_score: i64,
}

impl GameTotals {
    fn zero(player_id: PlayerId, game_id: GameId) -> Self {
        Self { player_id, game_id, n_earned_victories: 0, game_score: 0 }
    }
}

/// Totals of every participation matching the filters, by player then game.
pub fn totals_for(
    conn: &mut SqliteConnection,
    player_id: Option<PlayerId>,
    game_id: Option<GameId>,
) -> QueryResult<Vec<GameTotals>> {
    let mut participations = player_game::table
        .select((player_game::player_id, player_game::game_id))
        .into_boxed();
    let mut earned = player_victory::table
        .inner_join(victory::table)
        .select((player_victory::player_id, victory::game_id, victory::points))
        .into_boxed();

    if let Some(id) = player_id {
        participations = participations.filter(player_game::player_id.eq(id));
        earned = earned.filter(player_victory::player_id.eq(id));
    }
    if let Some(id) = game_id {
        participations = participations.filter(player_game::game_id.eq(id));
        earned = earned.filter(victory::game_id.eq(id));
    }

    let mut totals = participations
        .load::<(PlayerId, GameId)>(conn)?
        .into_iter()
        .map(|(p, g)| ((p, g), GameTotals::zero(p, g)))
        .collect::<BTreeMap<_, _>>();

    for (p, g, points) in earned.load::<(PlayerId, GameId, i32)>(conn)? {
        // Victories of games the player does not have in their library are not scored
        if let Some(row) = totals.get_mut(&(p, g)) {
            row.n_earned_victories += 1;
            row.game_score += i64::from(points);
        }
    }

    Ok(totals.into_values().collect())
}

/// Sum of `game_score` over all the games of `player_id`.
pub fn total_score(conn: &mut SqliteConnection, player_id: PlayerId) -> QueryResult<i64> {
    Ok(totals_for(conn, Some(player_id), None)?.iter().map(|t| t.game_score).sum())
}
