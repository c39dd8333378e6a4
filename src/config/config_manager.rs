// ==========================================
// Porter Rota - Configuration manager
// ==========================================
// Storage: config_kv table, scope 'global'.
// Invalid stored values fall back to the default with a warning.
// ==========================================

use crate::config::rota_config_trait::RotaConfigReader;
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// Keys and defaults
// ==========================================
pub mod config_keys {
    pub const ROTATION_REFERENCE_DATE: &str = "rotation_reference_date";
    pub const DAY_SHIFT_START: &str = "day_shift_start";
    pub const NIGHT_SHIFT_START: &str = "night_shift_start";
    pub const DEFAULT_BREAK_MINUTES: &str = "default_break_minutes";
}

pub mod config_defaults {
    pub const ROTATION_REFERENCE_DATE: &str = "2025-05-27";
    pub const DAY_SHIFT_START: &str = "07:00";
    pub const NIGHT_SHIFT_START: &str = "19:00";
    pub const DEFAULT_BREAK_MINUTES: &str = "30";
}

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection; PRAGMAs are re-applied (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Raw global value, None when unset.
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Parse a stored value; unparseable values log and use the default.
    fn get_parsed_or_default<T, F>(&self, key: &str, default: &str, parse: F) -> RepositoryResult<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        let raw = self.get_config_or_default(key, default)?;
        if let Some(value) = parse(raw.trim()) {
            return Ok(value);
        }

        tracing::warn!(config_key = key, raw_value = %raw, "invalid config value, using default");
        parse(default).ok_or_else(|| RepositoryError::FieldValueError {
            field: key.to_string(),
            message: format!("default value {} does not parse", default),
        })
    }

    /// Insert or replace a global value.
    pub fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// All global keys as a JSON object string.
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT key, value FROM config_kv
            WHERE scope_id = 'global'
            ORDER BY key
            "#,
        )?;

        let config_map = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<String, String>>>()?;

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// Write back a snapshot produced by `get_config_snapshot`.
    ///
    /// Keys prefixed with `__meta_` are ignored. Returns rows written.
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> RepositoryResult<usize> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        for (key, value) in config_map.iter().filter(|(k, _)| !k.starts_with("__meta_")) {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

// ==========================================
// RotaConfigReader implementation
// ==========================================
#[async_trait]
impl RotaConfigReader for ConfigManager {
    async fn get_rotation_reference_date(&self) -> RepositoryResult<NaiveDate> {
        self.get_parsed_or_default(
            config_keys::ROTATION_REFERENCE_DATE,
            config_defaults::ROTATION_REFERENCE_DATE,
            |v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok(),
        )
    }

    async fn get_day_shift_start(&self) -> RepositoryResult<NaiveTime> {
        self.get_parsed_or_default(
            config_keys::DAY_SHIFT_START,
            config_defaults::DAY_SHIFT_START,
            parse_time,
        )
    }

    async fn get_night_shift_start(&self) -> RepositoryResult<NaiveTime> {
        self.get_parsed_or_default(
            config_keys::NIGHT_SHIFT_START,
            config_defaults::NIGHT_SHIFT_START,
            parse_time,
        )
    }

    async fn get_default_break_minutes(&self) -> RepositoryResult<u32> {
        self.get_parsed_or_default(
            config_keys::DEFAULT_BREAK_MINUTES,
            config_defaults::DEFAULT_BREAK_MINUTES,
            |v| u32::from_str(v).ok(),
        )
    }
}
