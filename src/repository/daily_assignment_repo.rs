// ==========================================
// Porter Rota - Daily assignment repository
// ==========================================
// Rows are derived staffing facts for one date.
// A slot is (date, department_id, shift_type); several rows may share a
// slot when more than one porter is permanently assigned to it.
// ==========================================

use crate::domain::assignment::DailyAssignmentRecord;
use crate::domain::types::ShiftCategory;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{format_date, parse_date_column, parse_enum_column};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row, Transaction};
use std::sync::{Arc, Mutex};

const DAILY_COLUMNS: &str = r#"
    id, date, department_id, porter_id, cover_porter_id, shift_type
"#;

pub struct DailyAssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DailyAssignmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<DailyAssignmentRecord> {
        Ok(DailyAssignmentRecord {
            id: row.get(0)?,
            date: parse_date_column(1, &row.get::<_, String>(1)?)?,
            department_id: row.get(2)?,
            porter_id: row.get(3)?,
            cover_porter_id: row.get(4)?,
            shift_type: parse_enum_column(5, &row.get::<_, String>(5)?)?,
        })
    }

    fn insert_rows(
        tx: &Transaction<'_>,
        records: &[DailyAssignmentRecord],
    ) -> RepositoryResult<Vec<DailyAssignmentRecord>> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO daily_assignment (
                date, department_id, porter_id, cover_porter_id, shift_type
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )?;

        let mut stored = Vec::with_capacity(records.len());
        for record in records {
            stmt.execute(params![
                format_date(record.date),
                record.department_id,
                record.porter_id,
                record.cover_porter_id,
                record.shift_type.as_str(),
            ])?;
            stored.push(DailyAssignmentRecord {
                id: tx.last_insert_rowid(),
                ..record.clone()
            });
        }
        Ok(stored)
    }

    /// Insert all records in one transaction; returns them with their new ids.
    pub fn insert_batch(
        &self,
        records: &[DailyAssignmentRecord],
    ) -> RepositoryResult<Vec<DailyAssignmentRecord>> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let stored = Self::insert_rows(&tx, records)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(stored)
    }

    /// Save the expansion of `date` and mark the date expanded, atomically.
    ///
    /// The marker is written even for an empty expansion.
    pub fn save_expansion(
        &self,
        date: NaiveDate,
        records: &[DailyAssignmentRecord],
    ) -> RepositoryResult<Vec<DailyAssignmentRecord>> {
        if let Some(other) = records.iter().find(|r| r.date != date) {
            return Err(RepositoryError::FieldValueError {
                field: "date".to_string(),
                message: format!("record dated {} in expansion of {}", other.date, date),
            });
        }

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "INSERT OR IGNORE INTO daily_expansion (date) VALUES (?1)",
            params![format_date(date)],
        )?;
        let stored = Self::insert_rows(&tx, records)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(stored)
    }

    /// Stored records for `date`, or None when the date was never expanded.
    ///
    /// Rows without a marker (databases written before markers existed)
    /// still count as an expansion.
    pub fn find_expanded(
        &self,
        date: NaiveDate,
    ) -> RepositoryResult<Option<Vec<DailyAssignmentRecord>>> {
        let marked = {
            let conn = self.get_conn()?;
            conn.query_row(
                "SELECT 1 FROM daily_expansion WHERE date = ?1",
                params![format_date(date)],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .is_some()
        };

        let records = self.find_by_date(date)?;
        if marked || !records.is_empty() {
            Ok(Some(records))
        } else {
            Ok(None)
        }
    }

    pub fn find_by_date(&self, date: NaiveDate) -> RepositoryResult<Vec<DailyAssignmentRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {} FROM daily_assignment
            WHERE date = ?1
            ORDER BY department_id, shift_type, id
            "#,
            DAILY_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![format_date(date)], Self::map_row)?
            .collect::<SqliteResult<Vec<DailyAssignmentRecord>>>()?;
        Ok(rows)
    }

    /// Replace porter/cover on the first record of a slot, or insert one.
    pub fn upsert_slot(
        &self,
        date: NaiveDate,
        department_id: i64,
        shift_type: ShiftCategory,
        porter_id: Option<i64>,
        cover_porter_id: Option<i64>,
    ) -> RepositoryResult<DailyAssignmentRecord> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let date_str = format_date(date);
        let existing: Option<i64> = tx
            .query_row(
                r#"
                SELECT id FROM daily_assignment
                WHERE date = ?1 AND department_id = ?2 AND shift_type = ?3
                ORDER BY id LIMIT 1
                "#,
                params![date_str, department_id, shift_type.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let id = match existing {
            Some(id) => {
                tx.execute(
                    r#"
                    UPDATE daily_assignment
                    SET porter_id = ?2, cover_porter_id = ?3, updated_at = datetime('now')
                    WHERE id = ?1
                    "#,
                    params![id, porter_id, cover_porter_id],
                )?;
                id
            }
            None => {
                tx.execute(
                    r#"
                    INSERT INTO daily_assignment (
                        date, department_id, porter_id, cover_porter_id, shift_type
                    ) VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![
                        date_str,
                        department_id,
                        porter_id,
                        cover_porter_id,
                        shift_type.as_str()
                    ],
                )?;
                tx.last_insert_rowid()
            }
        };

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(DailyAssignmentRecord {
            id,
            date,
            department_id,
            porter_id,
            cover_porter_id,
            shift_type,
        })
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<DailyAssignmentRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM daily_assignment WHERE id = ?1", DAILY_COLUMNS);
        let record = conn.query_row(&sql, params![id], Self::map_row).optional()?;
        Ok(record)
    }

    pub fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute("DELETE FROM daily_assignment WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
