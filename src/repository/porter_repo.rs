// ==========================================
// Porter Rota - Porter repository
// ==========================================
// Rule: no business logic here.
// Porters are only ever soft-deleted.
// ==========================================

use crate::domain::porter::Porter;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{parse_enum_column, parse_optional_enum_column};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const PORTER_COLUMNS: &str = r#"
    id, name, porter_category, shift_group, shift_category,
    contracted_hours, break_duration_minutes, is_active
"#;

// ==========================================
// PorterRepository
// ==========================================
pub struct PorterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PorterRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Porter> {
        Ok(Porter {
            id: row.get(0)?,
            name: row.get(1)?,
            porter_category: parse_enum_column(2, &row.get::<_, String>(2)?)?,
            shift_group: row.get(3)?,
            shift_category: parse_optional_enum_column(4, row.get(4)?)?,
            contracted_hours: row.get(5)?,
            break_duration_minutes: row.get(6)?,
            is_active: row.get(7)?,
        })
    }

    /// Insert a porter and return its new id.
    pub fn insert(&self, porter: &Porter) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO porter (
                name, porter_category, shift_group, shift_category,
                contracted_hours, break_duration_minutes, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                porter.name,
                porter.porter_category.as_str(),
                porter.shift_group,
                porter.shift_category.map(|c| c.as_str()),
                porter.contracted_hours,
                porter.break_duration_minutes,
                porter.is_active,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(&self, porter: &Porter) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE porter SET
                name = ?2, porter_category = ?3, shift_group = ?4, shift_category = ?5,
                contracted_hours = ?6, break_duration_minutes = ?7, is_active = ?8,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                porter.id,
                porter.name,
                porter.porter_category.as_str(),
                porter.shift_group,
                porter.shift_category.map(|c| c.as_str()),
                porter.contracted_hours,
                porter.break_duration_minutes,
                porter.is_active,
            ],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Porter".to_string(),
                id: porter.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Porter>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM porter WHERE id = ?1", PORTER_COLUMNS);
        let porter = conn.query_row(&sql, params![id], Self::map_row).optional()?;
        Ok(porter)
    }

    /// All porters, active or not, ordered by name.
    pub fn list_all(&self) -> RepositoryResult<Vec<Porter>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM porter ORDER BY name, id", PORTER_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let porters = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Porter>>>()?;
        Ok(porters)
    }

    pub fn list_active(&self) -> RepositoryResult<Vec<Porter>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM porter WHERE is_active = 1 ORDER BY name, id",
            PORTER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let porters = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Porter>>>()?;
        Ok(porters)
    }

    /// Mark a porter inactive. Returns false when the id is unknown.
    pub fn soft_delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE porter SET is_active = 0, updated_at = datetime('now') WHERE id = ?1",
            params![id],
        )?;
        Ok(changed > 0)
    }
}
