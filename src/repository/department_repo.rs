// ==========================================
// Porter Rota - Department repository
// ==========================================
// operating_schedule is kept as a JSON column.
// rotation_category is re-derived from the name on every write.
// ==========================================

use crate::domain::department::{derive_rotation_category, Department, OperatingSchedule};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{parse_enum_column, parse_optional_enum_column};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const DEPARTMENT_COLUMNS: &str = r#"
    id, name, department_category, operating_schedule_json,
    min_porters_required, display_order, rotation_category
"#;

// ==========================================
// DepartmentRepository
// ==========================================
pub struct DepartmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DepartmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Department> {
        let schedule_json: String = row.get(3)?;
        let operating_schedule: OperatingSchedule = serde_json::from_str(&schedule_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

        Ok(Department {
            id: row.get(0)?,
            name: row.get(1)?,
            department_category: parse_enum_column(2, &row.get::<_, String>(2)?)?,
            operating_schedule,
            min_porters_required: row.get(4)?,
            display_order: row.get(5)?,
            rotation_category: parse_optional_enum_column(6, row.get(6)?)?,
        })
    }

    pub fn insert(&self, department: &Department) -> RepositoryResult<i64> {
        let schedule_json = serde_json::to_string(&department.operating_schedule)?;
        let rotation_category =
            derive_rotation_category(department.department_category, &department.name);

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO department (
                name, department_category, operating_schedule_json,
                min_porters_required, display_order, rotation_category
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                department.name,
                department.department_category.as_str(),
                schedule_json,
                department.min_porters_required,
                department.display_order,
                rotation_category.map(|c| c.as_str()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(&self, department: &Department) -> RepositoryResult<()> {
        let schedule_json = serde_json::to_string(&department.operating_schedule)?;
        let rotation_category =
            derive_rotation_category(department.department_category, &department.name);

        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE department SET
                name = ?2, department_category = ?3, operating_schedule_json = ?4,
                min_porters_required = ?5, display_order = ?6, rotation_category = ?7,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                department.id,
                department.name,
                department.department_category.as_str(),
                schedule_json,
                department.min_porters_required,
                department.display_order,
                rotation_category.map(|c| c.as_str()),
            ],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Department".to_string(),
                id: department.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Department>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM department WHERE id = ?1", DEPARTMENT_COLUMNS);
        let department = conn.query_row(&sql, params![id], Self::map_row).optional()?;
        Ok(department)
    }

    /// Ordered by display_order, then name.
    pub fn list_all(&self) -> RepositoryResult<Vec<Department>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM department ORDER BY display_order, name, id",
            DEPARTMENT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let departments = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Department>>>()?;
        Ok(departments)
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute("DELETE FROM department WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
