table! {
    player (id) {
        id -> Integer,
        name -> Text,
    }
}

table! {
    game (id) {
        id -> Integer,
        name -> Text,
    }
}

table! {
    victory (id) {
        id -> Integer,
        game_id -> Integer,
        name -> Text,
        points -> Integer,
    }
}

table! {
    player_game (player_id, game_id) {
        player_id -> Integer,
        game_id -> Integer,
        ign -> Nullable<Text>,
    }
}

table! {
    player_victory (player_id, victory_id) {
        player_id -> Integer,
        victory_id -> Integer,
    }
}

table! {
    friendship (left_side, right_side) {
        left_side -> Integer,
        right_side -> Integer,
    }
}

// Views. Read-only, except `friend` which accepts inserts through its trigger.

table! {
    friend (player_id, friend_id) {
        player_id -> Integer,
        friend_id -> Integer,
    }
}

table! {
    per_game_totals (player_id, game_id) {
        player_id -> Integer,
        game_id -> Integer,
        n_earned_victories -> BigInt,
        game_score -> BigInt,
    }
}

joinable!(victory -> game (game_id));
joinable!(player_game -> player (player_id));
joinable!(player_game -> game (game_id));
joinable!(player_victory -> player (player_id));
joinable!(player_victory -> victory (victory_id));

allow_tables_to_appear_in_same_query!(
    player,
    game,
    victory,
    player_game,
    player_victory,
    friendship,
    friend,
    per_game_totals,
);
