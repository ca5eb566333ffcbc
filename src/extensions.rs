/*!
 * Extensions to some diesel types
 */

use diesel::result::{DatabaseErrorKind, Error as DieselError, QueryResult};

use crate::error::{Error, Result};

pub trait QueryResultExt<T> {
    /// Replaces a unique constraint failure with the error naming the duplicate.
    fn on_duplicate(self, err: impl FnOnce() -> Error) -> Result<T>;
}

impl<T> QueryResultExt<T> for QueryResult<T> {
    fn on_duplicate(self, err: impl FnOnce() -> Error) -> Result<T> {
        match self {
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Err(err()),
            res => res.map_err(Error::from),
        }
    }
}
