// ==========================================
// Porter Rota - Application state
// ==========================================
// Owns the shared connection and wires repositories, store, engine and
// API together.
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::RotaApi;
use crate::config::{ConfigManager, RotaConfigReader, ShiftSettings};
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::{DailyAssignmentExpander, RotaStore, ShiftCalculator, SqliteRotaStore};

/// Application state shared by every caller.
pub struct AppState {
    pub db_path: String,

    pub rota_api: Arc<RotaApi>,

    /// Direct repository access for data management (porters, departments, ...).
    pub store: Arc<SqliteRotaStore>,

    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// Open (or create) the database and build every layer.
    ///
    /// Steps:
    /// 1. open the connection and create missing tables
    /// 2. seed the four shift group phases from the configured reference date
    /// 3. load the rotation calculator and build the API
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "initialising AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("cannot open database: {}", e))?;
        init_schema(&conn).map_err(|e| format!("cannot initialise schema: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // Config
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("cannot create ConfigManager: {}", e))?,
        );
        let reference_date = config_manager
            .get_rotation_reference_date()
            .await
            .map_err(|e| format!("cannot read rotation reference date: {}", e))?;
        let settings = ShiftSettings::load(config_manager.as_ref())
            .await
            .map_err(|e| format!("cannot read shift settings: {}", e))?;

        // ==========================================
        // Repositories / store
        // ==========================================
        let store = Arc::new(SqliteRotaStore::from_connection(conn));
        let seeded = store
            .shift_pattern_repo
            .seed_default_phases(reference_date)
            .map_err(|e| format!("cannot seed shift group phases: {}", e))?;
        if seeded > 0 {
            tracing::info!(%reference_date, seeded, "default shift group phases seeded");
        }

        // ==========================================
        // Engine / API
        // ==========================================
        let dyn_store: Arc<dyn RotaStore> = store.clone();
        let calculator = Arc::new(
            ShiftCalculator::load(dyn_store.as_ref())
                .await
                .map_err(|e| format!("cannot load shift calculator: {}", e))?,
        );
        let expander = Arc::new(DailyAssignmentExpander::new(dyn_store.clone(), calculator));
        let rota_api = Arc::new(RotaApi::new(dyn_store, expander, settings));

        tracing::info!("AppState ready");

        Ok(Self {
            db_path,
            rota_api,
            store,
            config_manager,
        })
    }
}

/// Database location.
///
/// `PORTER_ROTA_DB_PATH` wins when set; otherwise the user data directory,
/// falling back to the working directory.
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("PORTER_ROTA_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./porter_rota.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("porter-rota");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("porter_rota.db");
        }
    }

    path.to_string_lossy().to_string()
}
