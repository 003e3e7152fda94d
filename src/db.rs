use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

/// Opens (creating if needed) the sqlite file at `path` with foreign keys on.
pub async fn connect(path: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);
    let db = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
        .with_context(|| format!("open sqlite database at {path}"))?;
    Ok(db)
}

/// Applies the embedded migrations from `./migrations`.
pub async fn migrate(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("apply migrations")?;
    Ok(())
}

/// Single-connection in-memory database with the schema applied. The
/// connection is never recycled, since that would drop the data.
#[cfg(test)]
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("open in-memory sqlite")?;
    migrate(&db).await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_create_users_table() {
        let db = connect_in_memory().await.unwrap();
        let cols: Vec<(String,)> = sqlx::query_as("SELECT name FROM pragma_table_info('users') ORDER BY cid")
            .fetch_all(&db)
            .await
            .unwrap();
        let cols: Vec<String> = cols.into_iter().map(|(c,)| c).collect();
        assert_eq!(
            cols,
            ["id", "email", "password", "active", "staff", "admin", "created", "updated"]
        );
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = connect_in_memory().await.unwrap();
        migrate(&db).await.expect("second run is a no-op");
    }

    #[tokio::test]
    async fn connect_creates_missing_file() {
        let path = std::env::temp_dir().join(format!("users-api-test-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let db = connect(path.to_str().unwrap()).await.unwrap();
        migrate(&db).await.unwrap();
        db.close().await;
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
