use once_cell::sync::OnceCell;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const CREATE_SALES_DATA: &str = r#"
    CREATE TABLE IF NOT EXISTS sales_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_category TEXT NOT NULL,
        region TEXT NOT NULL,
        customer_segment TEXT NOT NULL,
        sale_date TEXT NOT NULL,
        total_sales REAL NOT NULL DEFAULT 0,
        profit REAL NOT NULL DEFAULT 0
    );
"#;

const CREATE_SALES_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_sales_data_sale_date ON sales_data (sale_date);";

const CREATE_CUSTOMER_LOYALTY: &str = r#"
    CREATE TABLE IF NOT EXISTS customer_loyalty (
        customer_id INTEGER PRIMARY KEY NOT NULL,
        first_name TEXT,
        last_name TEXT,
        city TEXT,
        country TEXT,
        total_sales REAL NOT NULL DEFAULT 0,
        visited_locations TEXT NOT NULL DEFAULT '[]'
    );
"#;

/// Open the warehouse file, creating it and its tables when missing
pub async fn connect(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;

    ensure_schema(&conn).await?;
    Ok(conn)
}

/// Minimal schema bootstrap for the two warehouse tables
pub async fn ensure_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for sql in [
        CREATE_SALES_DATA,
        CREATE_SALES_DATE_INDEX,
        CREATE_CUSTOMER_LOYALTY,
    ] {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    Ok(())
}

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    tracing::info!("Opening warehouse at {}", db_file.display());
    let conn = connect(db_file).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Row count of a warehouse table; `table` must be a trusted identifier
pub async fn count_rows(conn: &DatabaseConnection, table: &str) -> anyhow::Result<i64> {
    let row = conn
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("SELECT COUNT(*) AS cnt FROM {}", table),
        ))
        .await?;

    let count = match row {
        Some(row) => row.try_get::<i64>("", "cnt")?,
        None => 0,
    };
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::test_support;

    #[tokio::test]
    async fn test_schema_bootstrap_is_idempotent() {
        let conn = test_support::empty_database().await;
        ensure_schema(&conn).await.unwrap();

        assert_eq!(count_rows(&conn, "sales_data").await.unwrap(), 0);
        assert_eq!(count_rows(&conn, "customer_loyalty").await.unwrap(), 0);
    }
}
