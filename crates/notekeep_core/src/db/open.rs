//! Connection pool bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Build a bounded `r2d2` pool over one SQLite database file.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable pool.
//!
//! # Invariants
//! - Every connection has `foreign_keys=ON`, WAL journaling and a busy timeout.
//! - Returned pools have migrations fully applied.
//! - Connections return to the pool when the checkout guard drops, on every
//!   exit path.

use super::migrations::apply_migrations;
use super::DbResult;
use crate::config::DatabaseConfig;
use log::{error, info};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::time::{Duration, Instant};

/// Shared pool handle. Cloning is cheap and shares the same connections.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Scoped connection checkout; released back to the pool on drop.
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Opens a pooled SQLite database and applies all pending migrations.
///
/// # Side effects
/// - Opens up to `pool_max_size` connections eagerly.
/// - Emits `db_open` logging events with duration and status.
pub fn open_pool(config: &DatabaseConfig) -> DbResult<DbPool> {
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start pool_max_size={}",
        config.pool_max_size
    );

    match build_pool(config) {
        Ok(pool) => {
            info!(
                "event=db_open module=db status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(pool)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn build_pool(config: &DatabaseConfig) -> DbResult<DbPool> {
    let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
    let manager = SqliteConnectionManager::file(&config.path)
        .with_init(move |conn| configure_connection(conn, busy_timeout));

    let pool = Pool::builder()
        .max_size(config.pool_max_size)
        .connection_timeout(Duration::from_millis(config.connection_timeout_ms))
        .build(manager)?;

    let mut conn = pool.get()?;
    apply_migrations(&mut conn)?;
    drop(conn);

    Ok(pool)
}

fn configure_connection(conn: &mut Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    let _journal_mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    Ok(())
}
