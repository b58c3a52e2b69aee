use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::filtro::FiltroStore;
use shared::AppResult;

/// Shared server state - one cheap-to-clone handle per request
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Config | immutable configuration |
/// | db | SqlitePool | SQLite connection pool |
/// | filtros | Arc<FiltroStore> | per-session category filter selections |
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub db: SqlitePool,
    /// Session-scoped category filter selections
    pub filtros: Arc<FiltroStore>,
}

impl ServerState {
    /// Initialize the server state:
    ///
    /// 1. create the work directory layout
    /// 2. open the database (runs migrations and the category seed)
    /// 3. create the in-memory filter session store
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| shared::AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db_path = config.database_dir().join("estoque.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self {
            config: config.clone(),
            db: db_service.pool,
            filtros: Arc::new(FiltroStore::new()),
        })
    }

    /// Build a state around an existing pool. Used by tests.
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        Self {
            config,
            db: pool,
            filtros: Arc::new(FiltroStore::new()),
        }
    }
}
