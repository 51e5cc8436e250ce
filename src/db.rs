use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::migration::Migrator;

pub type OrmConn = DatabaseConnection;

/// Create a SeaORM connection.
///
/// An in-memory SQLite database only lives as long as its connection, so the
/// pool is pinned to a single connection in that case.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);
    if is_memory_sqlite(database_url) {
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Apply every pending versioned migration, in order.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let pending = Migrator::get_pending_migrations(conn).await?.len();
    Migrator::up(conn, None).await?;
    tracing::info!(applied = pending, "database schema up to date");
    Ok(())
}

fn is_memory_sqlite(database_url: &str) -> bool {
    database_url.starts_with("sqlite") && database_url.contains(":memory:")
}
