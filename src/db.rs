/*!
 * Opening the store and making sure the schema is there
 */

use diesel::connection::SimpleConnection;
use diesel::{Connection, SqliteConnection};
use tracing::{debug, info, instrument};

use crate::error::Result;

/// DDL for every table, index, view and trigger. Safe to run on an existing database.
pub const SCHEMA: &str = include_str!("../migrations/2026-10-17-120000_create_gamedb/up.sql");

pub const MEMORY_DATABASE: &str = ":memory:";

/// Connects to `database_url`, turns foreign keys on and ensures the schema.
#[instrument(err)]
pub fn establish(database_url: &str) -> Result<SqliteConnection> {
    let mut conn = SqliteConnection::establish(database_url)?;
    // Per connection in SQLite, and off by default
    conn.batch_execute("PRAGMA foreign_keys = ON;")?;
    ensure_schema(&mut conn)?;
    info!("Database ready");
    Ok(conn)
}

pub fn ensure_schema(conn: &mut SqliteConnection) -> Result<()> {
    debug!("Ensuring schema");
    conn.batch_execute(SCHEMA)?;
    Ok(())
}
