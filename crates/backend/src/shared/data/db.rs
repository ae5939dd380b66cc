use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

/// Tables created on startup when missing, in dependency order.
const SCHEMA: &[(&str, &str)] = &[
    (
        "a001_category",
        r#"
        CREATE TABLE a001_category (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            tp_status INTEGER NOT NULL DEFAULT 1,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
    ),
    (
        "a002_product",
        r#"
        CREATE TABLE a002_product (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            category_id TEXT NOT NULL,
            stock INTEGER NOT NULL DEFAULT 0,
            price REAL NOT NULL DEFAULT 0,
            tp_status INTEGER NOT NULL DEFAULT 1,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
    ),
    (
        "a003_sale",
        r#"
        CREATE TABLE a003_sale (
            id TEXT PRIMARY KEY NOT NULL,
            created_at TEXT
        );
        "#,
    ),
    (
        "a003_sale_line",
        r#"
        CREATE TABLE a003_sale_line (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sale_id TEXT NOT NULL,
            line_no INTEGER NOT NULL,
            product_id TEXT NOT NULL,
            quantity INTEGER NOT NULL
        );
        "#,
    ),
    (
        "a004_user",
        r#"
        CREATE TABLE a004_user (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            tp_status INTEGER NOT NULL DEFAULT 1,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_a002_product_category ON a002_product (category_id);",
    "CREATE INDEX IF NOT EXISTS idx_a003_sale_line_sale ON a003_sale_line (sale_id);",
    "CREATE INDEX IF NOT EXISTS idx_a004_user_username ON a004_user (username);",
];

/// Largest integer SQLite binds. sqlx converts `u64` parameters to `i64`.
pub const MAX_SQL_INT: u64 = i64::MAX as u64;

/// Ids bound per `IN (...)` list, well under SQLite's variable limit
pub const IN_LIST_CHUNK: usize = 500;

/// Clamps a `LIMIT`/`OFFSET` value to what SQLite can bind
pub fn sql_int(value: u64) -> u64 {
    value.min(MAX_SQL_INT)
}

/// Opens (creating if needed) the SQLite file and bootstraps the schema.
///
/// The returned connection is owned by the caller; there is no process-wide
/// handle.
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
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

    tracing::info!("Opening database {}", absolute_path.display());
    let conn = Database::connect(&db_url).await?;

    for (table, ddl) in SCHEMA {
        ensure_table(&conn, table, ddl).await?;
    }
    for ddl in INDEXES {
        execute(&conn, ddl).await?;
    }

    Ok(conn)
}

async fn ensure_table(conn: &DatabaseConnection, table: &str, ddl: &str) -> anyhow::Result<()> {
    let check_table = format!(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='{}';",
        table
    );
    let existing = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, check_table))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating {} table", table);
        execute(conn, ddl).await?;
    }
    Ok(())
}

async fn execute(conn: &DatabaseConnection, sql: &str) -> anyhow::Result<()> {
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        sql.to_string(),
    ))
    .await?;
    Ok(())
}

#[cfg(test)]
pub mod test_support {
    use sea_orm::DatabaseConnection;

    /// Throwaway database backed by a file in a temporary directory
    pub struct TestDatabase {
        pub conn: DatabaseConnection,
        _dir: tempfile::TempDir,
    }

    pub async fn open() -> TestDatabase {
        let dir = tempfile::tempdir().expect("temp dir");
        let conn = super::initialize_database(&dir.path().join("test.db"))
            .await
            .expect("test database");
        TestDatabase { conn, _dir: dir }
    }
}
