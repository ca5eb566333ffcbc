/*!
 * gamedb: players, games, victories, friendships and the scores they add up to,
 * kept in an embedded SQLite database.
 */

#[macro_use]
extern crate diesel;

pub mod cmd;
pub mod config;
pub mod db;
pub mod error;
pub mod extensions;
pub mod friendship;
pub mod models;
pub mod schema;
pub mod table;
pub mod totals;

#[cfg(test)]
mod testing;
