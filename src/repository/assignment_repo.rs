// ==========================================
// Porter Rota - Permanent assignment repository
// ==========================================
// Standing porter -> department links with an optional end date.
// Which link is "current" on a date is decided in the domain layer.
// ==========================================

use crate::domain::assignment::PermanentAssignment;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{format_date, parse_date_column, parse_optional_date_column};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const ASSIGNMENT_COLUMNS: &str = r#"
    id, porter_id, department_id, is_permanent, start_date, end_date
"#;

pub struct PermanentAssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PermanentAssignmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<PermanentAssignment> {
        Ok(PermanentAssignment {
            id: row.get(0)?,
            porter_id: row.get(1)?,
            department_id: row.get(2)?,
            is_permanent: row.get(3)?,
            start_date: parse_date_column(4, &row.get::<_, String>(4)?)?,
            end_date: parse_optional_date_column(5, row.get(5)?)?,
        })
    }

    fn query_list(
        conn: &Connection,
        where_clause: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> RepositoryResult<Vec<PermanentAssignment>> {
        let sql = format!(
            "SELECT {} FROM permanent_assignment {} ORDER BY start_date, id",
            ASSIGNMENT_COLUMNS, where_clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params, Self::map_row)?
            .collect::<SqliteResult<Vec<PermanentAssignment>>>()?;
        Ok(rows)
    }

    pub fn insert(&self, assignment: &PermanentAssignment) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO permanent_assignment (
                porter_id, department_id, is_permanent, start_date, end_date
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                assignment.porter_id,
                assignment.department_id,
                assignment.is_permanent,
                format_date(assignment.start_date),
                assignment.end_date.map(format_date),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<PermanentAssignment>> {
        let conn = self.get_conn()?;
        Self::query_list(&conn, "", &[])
    }

    pub fn list_by_porter(&self, porter_id: i64) -> RepositoryResult<Vec<PermanentAssignment>> {
        let conn = self.get_conn()?;
        Self::query_list(&conn, "WHERE porter_id = ?1", &[&porter_id])
    }

    pub fn list_by_department(
        &self,
        department_id: i64,
    ) -> RepositoryResult<Vec<PermanentAssignment>> {
        let conn = self.get_conn()?;
        Self::query_list(&conn, "WHERE department_id = ?1", &[&department_id])
    }

    /// Close an assignment on `end_date` (inclusive).
    pub fn end_assignment(&self, id: i64, end_date: NaiveDate) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE permanent_assignment SET end_date = ?2 WHERE id = ?1",
            params![id, format_date(end_date)],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "PermanentAssignment".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Remove every link between a porter and a department. Returns rows removed.
    pub fn delete_by_porter_and_department(
        &self,
        porter_id: i64,
        department_id: i64,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let removed = conn.execute(
            "DELETE FROM permanent_assignment WHERE porter_id = ?1 AND department_id = ?2",
            params![porter_id, department_id],
        )?;
        Ok(removed)
    }
}
