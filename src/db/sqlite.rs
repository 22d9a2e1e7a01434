use crate::db::schema::{SQLITE_INIT, TABLES};
use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating if missing) the database file and apply the schema.
pub async fn connect(db_path: &str) -> Result<SqlitePool, AppError> {
    let connect_opts = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    init_schema(&pool).await?;
    info!(path = %db_path, "database ready");
    Ok(pool)
}

/// Private in-memory database with the schema applied.
///
/// Pinned to a single connection that never expires: every new in-memory
/// connection would otherwise see its own empty database.
pub async fn open_in_memory() -> Result<SqlitePool, AppError> {
    let connect_opts = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_opts)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Initialize the schema by executing the bundled DDL.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), AppError> {
    // sqlx::query runs a single statement, so split the script
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    debug!(tables = ?TABLES, "schema applied");
    Ok(())
}

/// Row count for each table, in [`TABLES`] order.
pub async fn table_counts(pool: &SqlitePool) -> Result<[i64; 4], AppError> {
    let mut counts = [0i64; 4];
    for (slot, table) in counts.iter_mut().zip(TABLES) {
        // table names come from the fixed TABLES list
        let sql = format!("SELECT COUNT(*) FROM {table}");
        *slot = sqlx::query_scalar::<_, i64>(&sql).fetch_one(pool).await?;
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_is_idempotent() {
        let pool = open_in_memory().await.expect("open db");
        init_schema(&pool).await.expect("second run");
        let counts = table_counts(&pool).await.expect("counts");
        assert_eq!(counts, [0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let pool = open_in_memory().await.expect("open db");
        let res = sqlx::query("INSERT INTO properties (client_id, name) VALUES (999, 'Orfã')")
            .execute(&pool)
            .await;
        assert!(res.is_err());
    }
}
