//! Database Module
//!
//! Handles the SQLite connection pool, migrations and the initial
//! category seed.

pub mod repository;

use shared::AppError;
use shared::models::CategoriaCreate;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

/// Embedded migrations (`estoque-server/migrations/`)
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Categories inserted on first start, when the catalog is empty
const CATEGORIAS_INICIAIS: [&str; 5] =
    ["Bebidas", "Carnes", "Padaria", "Laticínios", "Hortifruti"];

/// Database service — owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database file, apply migrations and seed the
    /// initial categories when the table is empty.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        // busy_timeout: wait 5s on write contention instead of failing
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to set busy_timeout: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        seed_categorias(&pool)
            .await
            .map_err(|e| AppError::database(format!("Category seed failed: {e}")))?;

        Ok(Self { pool })
    }

    /// In-memory database with migrations applied. Used by tests.
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(e.to_string()))?
            .pragma("foreign_keys", "ON");

        // A single connection: every :memory: connection is its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory db: {e}")))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;

        Ok(Self { pool })
    }
}

/// Insert the initial categories when the categoria table is empty.
async fn seed_categorias(pool: &SqlitePool) -> repository::RepoResult<()> {
    if !repository::categoria::is_empty(pool).await? {
        return Ok(());
    }

    tracing::info!("Empty catalog, seeding initial categories");
    for nome in CATEGORIAS_INICIAIS {
        repository::categoria::create(
            pool,
            CategoriaCreate {
                nome: nome.to_string(),
            },
        )
        .await?;
    }
    Ok(())
}
