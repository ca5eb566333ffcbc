/*!
 * Mutual friendships, stored once per pair
 *
 * A friendship is undirected, but it lives in `friendship` as a single
 * `(left_side, right_side)` row with `left_side < right_side`. Writes go through
 * [`FriendPair::new`] so both argument orders land on the same row and the
 * primary key alone rejects the second one. Reads look the player up on both
 * sides: the primary key covers `left_side`, `friendship_right_side_idx` covers
 * `right_side`.
 */

use std::fmt::{Display, Formatter, Result as FmtResult};

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::extensions::QueryResultExt;
use crate::models::{Player, PlayerId};

pub use crate::schema::{friend, friendship};

/// An unordered pair of players in canonical order.
#[derive(Queryable, Insertable, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[diesel(table_name = friendship)]
pub struct FriendPair {
    pub left_side: PlayerId,
    pub right_side: PlayerId,
}

impl FriendPair {
    pub fn new(a: PlayerId, b: PlayerId) -> Result<Self> {
        if a == b {
            return Err(Error::SelfFriendship(a));
        }
        Ok(Self { left_side: a.min(b), right_side: a.max(b) })
    }
}

impl Display for FriendPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "({}, {})", self.left_side, self.right_side)
    }
}

/// Records that `a` and `b` are friends. Fails if they already are.
#[instrument(skip(conn))]
pub fn insert_friendship(
    conn: &mut SqliteConnection,
    a: PlayerId,
    b: PlayerId,
) -> Result<FriendPair> {
    let pair = FriendPair::new(a, b)?;

    conn.transaction::<_, Error, _>(|conn| {
        Player::require(conn, a)?;
        Player::require(conn, b)?;
        diesel::insert_into(friendship::table)
            .values(&pair)
            .execute(conn)
            .on_duplicate(|| Error::AlreadyFriends(pair))?;
        Ok(())
    })?;

    debug!(%pair, "Saved friendship");
    Ok(pair)
}

/// Friends of `player_id`, in no particular order. Empty for unknown players.
pub fn friends_of(
    conn: &mut SqliteConnection,
    player_id: PlayerId,
) -> QueryResult<impl Iterator<Item = PlayerId>> {
    let right = friendship::table
        .filter(friendship::left_side.eq(player_id))
        .select(friendship::right_side)
        .load::<PlayerId>(conn)?;
    let left = friendship::table
        .filter(friendship::right_side.eq(player_id))
        .select(friendship::left_side)
        .load::<PlayerId>(conn)?;

    Ok(right.into_iter().chain(left))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::error::Violation;
    use crate::testing;

    fn friends(conn: &mut SqliteConnection, id: PlayerId) -> BTreeSet<PlayerId> {
        friends_of(conn, id).unwrap().collect()
    }

    fn seeded() -> SqliteConnection {
        let mut conn = testing::conn();
        for (id, name) in [(1, "Ada"), (2, "Bob"), (3, "Cy"), (4, "Dee")] {
            testing::player(&mut conn, id, name);
        }
        conn
    }

    #[test]
    fn pair_is_canonical() {
        assert_eq!(FriendPair::new(7, 3).unwrap(), FriendPair { left_side: 3, right_side: 7 });
        assert_eq!(FriendPair::new(3, 7).unwrap(), FriendPair::new(7, 3).unwrap());
    }

    #[test]
    fn friendship_is_symmetric() {
        let mut conn = seeded();
        insert_friendship(&mut conn, 3, 1).unwrap();
        insert_friendship(&mut conn, 1, 2).unwrap();

        assert_eq!(friends(&mut conn, 1), BTreeSet::from([2, 3]));
        assert_eq!(friends(&mut conn, 2), BTreeSet::from([1]));
        assert_eq!(friends(&mut conn, 3), BTreeSet::from([1]));
        assert!(friends(&mut conn, 4).is_empty());
        assert!(friends(&mut conn, 99).is_empty());
    }

    #[test]
    fn friends_of_is_restartable() {
        let mut conn = seeded();
        insert_friendship(&mut conn, 2, 4).unwrap();

        let first: Vec<_> = friends_of(&mut conn, 4).unwrap().collect();
        let second: Vec<_> = friends_of(&mut conn, 4).unwrap().collect();
        assert_eq!(first, vec![2]);
        assert_eq!(first, second);
    }

    #[test]
    fn stored_once_in_canonical_order() {
        let mut conn = seeded();
        let pair = insert_friendship(&mut conn, 4, 2).unwrap();
        assert_eq!(pair, FriendPair { left_side: 2, right_side: 4 });

        let rows: Vec<FriendPair> = friendship::table.load(&mut conn).unwrap();
        assert_eq!(rows, vec![pair]);
    }

    #[test]
    fn either_order_twice_is_a_duplicate() {
        let mut conn = seeded();
        insert_friendship(&mut conn, 1, 2).unwrap();

        for (a, b) in [(1, 2), (2, 1)] {
            let err = insert_friendship(&mut conn, a, b).unwrap_err();
            assert!(matches!(err, Error::AlreadyFriends(FriendPair { left_side: 1, right_side: 2 })));
            assert_eq!(err.violation(), Some(Violation::Duplicate));
        }
        assert_eq!(friends(&mut conn, 2), BTreeSet::from([1]));
    }

    #[test]
    fn self_friendship_is_rejected() {
        let mut conn = seeded();
        let err = insert_friendship(&mut conn, 3, 3).unwrap_err();
        assert!(matches!(err, Error::SelfFriendship(3)));
        assert_eq!(err.violation(), Some(Violation::Domain));

        // Even for players that do not exist
        assert!(matches!(insert_friendship(&mut conn, 50, 50), Err(Error::SelfFriendship(50))));
        assert!(friends(&mut conn, 3).is_empty());
    }

    #[test]
    fn missing_player_is_named() {
        let mut conn = seeded();
        let err = insert_friendship(&mut conn, 1, 9).unwrap_err();
        assert!(matches!(err, Error::PlayerNotFound(9)));
        let err = insert_friendship(&mut conn, 8, 1).unwrap_err();
        assert!(matches!(err, Error::PlayerNotFound(8)));
        assert_eq!(err.violation(), Some(Violation::MissingReference));
    }

    #[test]
    fn table_rejects_non_canonical_rows() {
        let mut conn = seeded();
        let res = diesel::insert_into(friendship::table)
            .values(&FriendPair { left_side: 3, right_side: 1 })
            .execute(&mut conn);
        assert!(res.is_err());
        let res = diesel::insert_into(friendship::table)
            .values(&FriendPair { left_side: 2, right_side: 2 })
            .execute(&mut conn);
        assert!(res.is_err());
    }

    #[test]
    fn view_shows_both_orientations() {
        let mut conn = seeded();
        insert_friendship(&mut conn, 2, 1).unwrap();

        let mut rows: Vec<(PlayerId, PlayerId)> = friend::table.load(&mut conn).unwrap();
        rows.sort();
        assert_eq!(rows, vec![(1, 2), (2, 1)]);

        let of_two: Vec<PlayerId> = friend::table
            .filter(friend::player_id.eq(2))
            .select(friend::friend_id)
            .load(&mut conn)
            .unwrap();
        assert_eq!(of_two, vec![1]);
    }

    #[test]
    fn view_insert_is_rewritten_to_canonical_order() {
        let mut conn = seeded();
        diesel::insert_into(friend::table)
            .values((friend::player_id.eq(4), friend::friend_id.eq(3)))
            .execute(&mut conn)
            .unwrap();

        let rows: Vec<FriendPair> = friendship::table.load(&mut conn).unwrap();
        assert_eq!(rows, vec![FriendPair { left_side: 3, right_side: 4 }]);

        let err = insert_friendship(&mut conn, 3, 4).unwrap_err();
        assert!(matches!(err, Error::AlreadyFriends(_)));

        let res = diesel::insert_into(friend::table)
            .values((friend::player_id.eq(2), friend::friend_id.eq(2)))
            .execute(&mut conn);
        assert!(res.is_err());
    }
}
