/*!
 * Read-only reports over players, games and scores
 */

use std::collections::{HashMap, HashSet};

use diesel::prelude::*;
use diesel::SqliteConnection;
use itertools::Itertools;

use crate::error::{Error, Result};
use crate::friendship::friends_of;
use crate::models::*;
use crate::table::{initials, numbered_table};
use crate::totals::{total_score, totals_for};
use super::*;

fn player_names(conn: &mut SqliteConnection) -> QueryResult<HashMap<PlayerId, String>> {
    Ok(player::table
        .select((player::id, player::name))
        .load::<(PlayerId, String)>(conn)?
        .into_iter()
        .collect())
}

fn game_names(conn: &mut SqliteConnection) -> QueryResult<HashMap<GameId, String>> {
    Ok(game::table
        .select((game::id, game::name))
        .load::<(GameId, String)>(conn)?
        .into_iter()
        .collect())
}

/// Name for `id` in `names`, falling back to the bare id.
fn name_of(names: &HashMap<i32, String>, id: i32) -> String {
    names.get(&id).cloned().unwrap_or_else(|| format!("#{}", id))
}

/// Orders (name, score) pairs by score descending, then name.
fn by_score(rows: &mut [(String, i64)]) {
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
}

fn score_rows(rows: &[(String, i64)]) -> Vec<Vec<String>> {
    rows.iter().map(|(name, score)| vec![name.clone(), score.to_string()]).collect()
}

pub fn friends_who_play(conn: &mut SqliteConnection, player_id: PlayerId, game_id: GameId) -> StringResult {
    let player = Player::require(conn, player_id)?;
    let game = Game::require(conn, game_id)?;
    let names = player_names(conn)?;

    let friends = friends_of(conn, player_id)?.collect::<HashSet<_>>();
    let mut rows = totals_for(conn, None, Some(game_id))?
        .into_iter()
        .filter(|t| friends.contains(&t.player_id))
        .map(|t| (name_of(&names, t.player_id), t.game_score))
        .collect::<Vec<_>>();
    by_score(&mut rows);

    if rows.is_empty() {
        return Ok(format!("{} has no friends who play {}. :(", player.name, game.name));
    }
    Ok(format!(
        "{}'s friends who play {}:\n\n{}",
        player.name,
        game.name,
        numbered_table(&["Name", "Score"], &score_rows(&rows))
    ))
}

pub fn compare_players(
    conn: &mut SqliteConnection,
    player1_id: PlayerId,
    player2_id: PlayerId,
    game_id: GameId,
) -> StringResult {
    let player1 = Player::require(conn, player1_id)?;
    let player2 = Player::require(conn, player2_id)?;
    let game = Game::require(conn, game_id)?;

    // Only players that have the game get a score row, the first player on top
    let totals = totals_for(conn, None, Some(game_id))?;
    let scores = [&player1, &player2]
        .iter()
        .filter_map(|p| totals.iter().find(|t| t.player_id == p.id).map(|t| (p, t.game_score)))
        .map(|(p, score)| vec![p.name.clone(), score.to_string()])
        .collect::<Vec<_>>();

    let mut out = format!(
        "Total scores for {}:\n\n{}",
        game.name,
        numbered_table(&["Player", "Points"], &scores)
    );

    let earned1 = earned_ids(conn, player1_id)?;
    let earned2 = earned_ids(conn, player2_id)?;
    let yes_no = |earned: &HashSet<VictoryId>, id: VictoryId| if earned.contains(&id) { "Y" } else { "N" };

    let victories = Victory::for_game(conn, game_id)?
        .into_iter()
        .sorted_by(|a, b| a.name.cmp(&b.name).then_with(|| b.points.cmp(&a.points)))
        .map(|v| {
            vec![
                v.name.clone(),
                v.points.to_string(),
                yes_no(&earned1, v.id).to_owned(),
                yes_no(&earned2, v.id).to_owned(),
            ]
        })
        .collect::<Vec<_>>();

    if victories.is_empty() {
        out.push_str("\n\nNo victories.");
    } else {
        let (i1, i2) = (initials(&player1.name), initials(&player2.name));
        out.push_str(&format!(
            "\n\nVictories for {}:\n\n{}",
            game.name,
            numbered_table(&["Victory", "Points", &i1, &i2], &victories)
        ));
    }

    Ok(out)
}

fn earned_ids(conn: &mut SqliteConnection, player_id: PlayerId) -> QueryResult<HashSet<VictoryId>> {
    Ok(player_victory::table
        .filter(player_victory::player_id.eq(player_id))
        .select(player_victory::victory_id)
        .load::<VictoryId>(conn)?
        .into_iter()
        .collect())
}

pub fn summarize_player(conn: &mut SqliteConnection, player_id: PlayerId) -> StringResult {
    let player = Player::require(conn, player_id)?;
    let names = player_names(conn)?;
    let games = game_names(conn)?;

    let mut friends = friends_of(conn, player_id)?
        .map(|id| -> Result<(String, i64)> { Ok((name_of(&names, id), total_score(conn, id)?)) })
        .collect::<Result<Vec<_>>>()?;
    by_score(&mut friends);

    let mut out = if friends.is_empty() {
        format!("{} has no friends. :(", player.name)
    } else {
        format!("{}'s friends:\n{}", player.name, numbered_table(&["Name", "Score"], &score_rows(&friends)))
    };

    let available = victory::table
        .select(victory::game_id)
        .load::<GameId>(conn)?
        .into_iter()
        .counts();
    let igns = player_game::table
        .filter(player_game::player_id.eq(player_id))
        .load::<Participation>(conn)?
        .into_iter()
        .map(|p| (p.game_id, p.ign))
        .collect::<HashMap<_, _>>();

    let totals = totals_for(conn, Some(player_id), None)?
        .into_iter()
        .sorted_by(|a, b| {
            b.game_score
                .cmp(&a.game_score)
                .then_with(|| name_of(&games, a.game_id).cmp(&name_of(&games, b.game_id)))
        })
        .collect::<Vec<_>>();
    let rows = totals
        .iter()
        .map(|t| {
            vec![
                name_of(&games, t.game_id),
                format!("{}/{}", t.n_earned_victories, available.get(&t.game_id).unwrap_or(&0)),
                t.game_score.to_string(),
                igns.get(&t.game_id).cloned().flatten().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();

    if rows.is_empty() {
        out.push_str(&format!("\n\n{} has no games in their library. :(", player.name));
    } else {
        out.push_str(&format!(
            "\n\n{}'s games:\n{}",
            player.name,
            numbered_table(&["Name", "Victories", "Points", "IGN"], &rows)
        ));
    }

    let total: i64 = totals.iter().map(|t| t.game_score).sum();
    out.push_str(&format!("\n\n{}'s total score: {}", player.name, total));

    Ok(out)
}

pub fn summarize_game(conn: &mut SqliteConnection, game_id: GameId) -> StringResult {
    let game = Game::require(conn, game_id)?;
    let names = player_names(conn)?;

    let victories = Victory::for_game(conn, game_id)?;
    let earners = player_victory::table
        .inner_join(victory::table)
        .filter(victory::game_id.eq(game_id))
        .select(player_victory::victory_id)
        .load::<VictoryId>(conn)?
        .into_iter()
        .counts();

    let mut players = totals_for(conn, None, Some(game_id))?
        .into_iter()
        .map(|t| (name_of(&names, t.player_id), t.game_score, t.n_earned_victories))
        .collect::<Vec<_>>();
    players.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let out = if victories.is_empty() {
        format!("{} has no Victories associated with it.", game.name)
    } else {
        let rows = victories
            .iter()
            .map(|v| {
                vec![
                    v.name.clone(),
                    v.points.to_string(),
                    format!("{}/{}", earners.get(&v.id).unwrap_or(&0), players.len()),
                ]
            })
            .collect::<Vec<_>>();
        format!(
            "Victories for {}:\n{}",
            game.name,
            numbered_table(&["Name", "Points", "Players"], &rows)
        )
    };

    let section = if players.is_empty() {
        format!("No players have {} in their library.", game.name)
    } else {
        let rows = players
            .iter()
            .map(|(name, score, earned)| {
                vec![name.clone(), score.to_string(), format!("{}/{}", earned, victories.len())]
            })
            .collect::<Vec<_>>();
        format!(
            "Players with {} in their library:\n{}",
            game.name,
            numbered_table(&["Name", "Points", "Victories"], &rows)
        )
    };

    Ok(format!("{}\n\n{}", out, section))
}

pub fn summarize_victory(conn: &mut SqliteConnection, game_id: GameId, victory_id: VictoryId) -> StringResult {
    let game = Game::require(conn, game_id)?;
    let victory = Victory::get_in_game(conn, victory_id, game_id)?
        .ok_or(Error::VictoryNotFound { victory_id, game_id: Some(game_id) })?;

    let total_players: i64 = player_game::table
        .filter(player_game::game_id.eq(game_id))
        .count()
        .get_result(conn)?;
    let earners = EarnedVictory::earners(conn, victory_id)?;

    let percent = if total_players == 0 {
        0.0
    } else {
        (10000.0 * earners.len() as f64 / total_players as f64).round() / 100.0
    };
    let header = format!(
        "{}% of all {} players have earned {}:",
        percent, game.name, victory.name
    );

    if earners.is_empty() {
        return Ok(format!("{}\n\nNo results.", header));
    }
    let rows = earners.into_iter().map(|p| vec![p.name]).collect::<Vec<_>>();
    Ok(format!("{}\n\n{}", header, numbered_table(&["Player"], &rows)))
}

pub fn victory_ranking(conn: &mut SqliteConnection) -> StringResult {
    let mut scores: HashMap<PlayerId, i64> = HashMap::new();
    for t in totals_for(conn, None, None)? {
        *scores.entry(t.player_id).or_default() += t.game_score;
    }

    let mut rows = player::table
        .load::<Player>(conn)?
        .into_iter()
        .map(|p| {
            let score = scores.get(&p.id).copied().unwrap_or(0);
            (p.name, score)
        })
        .collect::<Vec<_>>();
    by_score(&mut rows);

    if rows.is_empty() {
        return Ok("No results.".to_owned());
    }
    Ok(format!(
        "Global leaderboard:\n\n{}",
        numbered_table(&["Player", "Total Score"], &score_rows(&rows))
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::friendship::insert_friendship;
    use crate::testing;

    /// Ada and Bob play Portal (1), Ada also plays Braid (2) and is friends with
    /// Bob and Cy. Cy plays nothing.
    fn seeded() -> SqliteConnection {
        let mut conn = testing::conn();
        testing::player(&mut conn, 1, "Ada Lovelace");
        testing::player(&mut conn, 2, "Bob");
        testing::player(&mut conn, 3, "Cy");
        testing::game(&mut conn, 1, "Portal");
        testing::game(&mut conn, 2, "Braid");
        testing::victory(&mut conn, 1, 10, "Cake", 10);
        testing::victory(&mut conn, 1, 11, "Lie", 25);
        testing::victory(&mut conn, 2, 20, "Time", 7);
        Participation { player_id: 1, game_id: 1, ign: Some("ada".into()) }.insert(&mut conn).unwrap();
        testing::plays(&mut conn, 1, 2);
        testing::plays(&mut conn, 2, 1);
        testing::earn(&mut conn, 1, 10);
        testing::earn(&mut conn, 1, 11);
        testing::earn(&mut conn, 2, 11);
        insert_friendship(&mut conn, 2, 1).unwrap();
        insert_friendship(&mut conn, 1, 3).unwrap();
        conn
    }

    #[test]
    fn friends_who_play_lists_only_players_of_the_game() {
        let mut conn = seeded();
        let out = friends_who_play(&mut conn, 1, 1).unwrap();
        assert!(out.starts_with("Ada Lovelace's friends who play Portal:"));
        assert!(out.contains("1  Bob   25"));
        assert!(!out.contains("Cy"));

        let out = friends_who_play(&mut conn, 1, 2).unwrap();
        assert_eq!(out, "Ada Lovelace has no friends who play Braid. :(");

        assert!(matches!(friends_who_play(&mut conn, 9, 1), Err(Error::PlayerNotFound(9))));
        assert!(matches!(friends_who_play(&mut conn, 1, 9), Err(Error::GameNotFound(9))));
    }

    #[test]
    fn compare_players_marks_earned_victories() {
        let mut conn = seeded();
        let out = compare_players(&mut conn, 2, 1, 1).unwrap();
        let lines: Vec<_> = out.lines().collect();

        assert!(lines[4].starts_with("1  Bob"));
        assert!(lines[5].starts_with("2  Ada Lovelace"));
        assert!(out.contains("Victory  Points  B.  A.L."));
        assert!(out.contains("Cake     10      N   Y"));
        assert!(out.contains("Lie      25      Y   Y"));
    }

    #[test]
    fn compare_players_skips_non_participants() {
        let mut conn = seeded();
        let out = compare_players(&mut conn, 1, 3, 2).unwrap();
        assert!(out.contains("1  Ada Lovelace  0"));
        assert!(!out.contains("2  Cy"));
    }

    #[test]
    fn summarize_player_lists_friends_and_games() {
        let mut conn = seeded();
        let out = summarize_player(&mut conn, 1).unwrap();

        assert!(out.contains("1  Bob   25"));
        assert!(out.contains("2  Cy    0"));
        assert!(out.contains("1  Portal  2/2        35      ada"));
        assert!(out.contains("2  Braid   0/1        0"));
        assert!(out.ends_with("Ada Lovelace's total score: 35"));

        let out = summarize_player(&mut conn, 3).unwrap();
        assert!(out.contains("Cy has no games in their library. :("));
        assert!(out.ends_with("Cy's total score: 0"));
    }

    #[test]
    fn summarize_game_counts_players_and_victories() {
        let mut conn = seeded();
        let out = summarize_game(&mut conn, 1).unwrap();

        assert!(out.contains("1  Lie   25      2/2"));
        assert!(out.contains("2  Cake  10      1/2"));
        assert!(out.contains("1  Ada Lovelace  35      2/2"));
        assert!(out.contains("2  Bob           25      1/2"));

        testing::game(&mut conn, 3, "Empty");
        let out = summarize_game(&mut conn, 3).unwrap();
        assert!(out.contains("Empty has no Victories associated with it."));
        assert!(out.contains("No players have Empty in their library."));
    }

    #[test]
    fn summarize_victory_reports_share_of_players() {
        let mut conn = seeded();
        let out = summarize_victory(&mut conn, 1, 10).unwrap();
        assert!(out.starts_with("50% of all Portal players have earned Cake:"));
        assert!(out.contains("1  Ada Lovelace"));

        let out = summarize_victory(&mut conn, 2, 20).unwrap();
        assert!(out.starts_with("0% of all Braid players have earned Time:"));
        assert!(out.ends_with("No results."));

        assert!(matches!(
            summarize_victory(&mut conn, 2, 10),
            Err(Error::VictoryNotFound { victory_id: 10, game_id: Some(2) })
        ));
    }

    #[test]
    fn victory_ranking_includes_players_without_games() {
        let mut conn = seeded();
        let out = victory_ranking(&mut conn).unwrap();
        let lines: Vec<_> = out.lines().skip(4).collect();
        assert_eq!(
            lines,
            vec!["1  Ada Lovelace  35", "2  Bob           25", "3  Cy            0"]
        );
    }
}
