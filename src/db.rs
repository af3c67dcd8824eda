//! SQLite connection pooling.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Milliseconds a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Per-connection pragmas. SQLite leaves foreign keys off by default, which
/// would silently skip the cascade from listings to swipes and matches.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Build an r2d2 pool for the SQLite database at `database_url`.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
}
