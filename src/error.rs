/*!
 * Errors that can be returned by store operations and console commands
 */

use std::error::Error as StdError;
use std::fmt::{Display, Formatter, Result as FmtResult};

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::friendship::FriendPair;
use crate::models::{GameId, PlayerId, VictoryId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Db(DieselError),
    Connection(diesel::ConnectionError),

    PlayerExists(PlayerId),
    GameExists(GameId),
    VictoryExists(VictoryId),
    AlreadyPlays { player_id: PlayerId, game_id: GameId },
    AlreadyEarned { player_id: PlayerId, victory_id: VictoryId },
    AlreadyFriends(FriendPair),

    PlayerNotFound(PlayerId),
    GameNotFound(GameId),
    VictoryNotFound { victory_id: VictoryId, game_id: Option<GameId> },
    /// Foreign key failure reported by the engine itself
    MissingReference(String),

    SelfFriendship(PlayerId),

    UnknownCommand(String),
    Usage(&'static str),
}

/// Which kind of invariant a rejected write ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Duplicate,
    MissingReference,
    Domain,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Db(e) => write!(f, "{}", e),
            Self::Connection(e) => write!(f, "{}", e),
            Self::PlayerExists(id) => write!(f, "Player #{} already exists!", id),
            Self::GameExists(id) => write!(f, "Game #{} already exists!", id),
            Self::VictoryExists(id) => write!(f, "Victory #{} already exists!", id),
            Self::AlreadyPlays { player_id, game_id } => {
                write!(f, "Game #{} is already in player #{}'s game list!", game_id, player_id)
            }
            Self::AlreadyEarned { player_id, victory_id } => {
                write!(f, "Player #{} has already earned victory #{}!", player_id, victory_id)
            }
            Self::AlreadyFriends(pair) => write!(
                f,
                "Players #{} and #{} are already friends.",
                pair.left_side, pair.right_side
            ),
            Self::PlayerNotFound(id) => write!(f, "Player #{} is not in the database!", id),
            Self::GameNotFound(id) => write!(f, "Game #{} is not in the database!", id),
            Self::VictoryNotFound { victory_id, game_id: Some(game_id) } => write!(
                f,
                "Victory #{} for game #{} is not in the database!",
                victory_id, game_id
            ),
            Self::VictoryNotFound { victory_id, game_id: None } => {
                write!(f, "Victory #{} is not in the database!", victory_id)
            }
            Self::MissingReference(msg) => write!(f, "Missing reference: {}", msg),
            Self::SelfFriendship(id) => {
                write!(f, "Player #{} cannot be friends with themselves.", id)
            }
            Self::UnknownCommand(name) => {
                write!(f, "Unknown command '{}', try Help.", name)
            }
            Self::Usage(usage) => write!(f, "Invalid input. Usage: {}", usage),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Db(e) => Some(e),
            Self::Connection(e) => Some(e),
            _ => None,
        }
    }
}

impl Error {
    pub fn violation(&self) -> Option<Violation> {
        match self {
            Self::PlayerExists(_)
            | Self::GameExists(_)
            | Self::VictoryExists(_)
            | Self::AlreadyPlays { .. }
            | Self::AlreadyEarned { .. }
            | Self::AlreadyFriends(_) => Some(Violation::Duplicate),
            Self::PlayerNotFound(_)
            | Self::GameNotFound(_)
            | Self::VictoryNotFound { .. }
            | Self::MissingReference(_) => Some(Violation::MissingReference),
            Self::SelfFriendship(_) => Some(Violation::Domain),
            Self::Db(DieselError::DatabaseError(kind, _)) => match kind {
                DatabaseErrorKind::UniqueViolation => Some(Violation::Duplicate),
                DatabaseErrorKind::ForeignKeyViolation => Some(Violation::MissingReference),
                DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                    Some(Violation::Domain)
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Line to show the console user. Store failures stay generic.
    pub fn as_message(&self) -> String {
        match self {
            Self::Db(_) | Self::Connection(_) => "Internal error".to_owned(),
            e => e.to_string(),
        }
    }
}

impl From<DieselError> for Error {
    fn from(e: DieselError) -> Error {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Error::MissingReference(info.message().to_owned())
            }
            e => Error::Db(e),
        }
    }
}

impl From<diesel::ConnectionError> for Error {
    fn from(e: diesel::ConnectionError) -> Error {
        Error::Connection(e)
    }
}
