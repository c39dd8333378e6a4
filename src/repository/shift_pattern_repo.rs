// ==========================================
// Porter Rota - Shift group phase repository
// ==========================================
// One row per rotation group ("Day Shift A" ...).
// Category and label are derived when the phase is built, then stored.
// ==========================================

use crate::domain::shift::ShiftGroupPhase;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{format_date, parse_date_column, parse_enum_column};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const PHASE_COLUMNS: &str = r#"
    id, group_name, shift_category, group_label, reference_date, is_working_on_reference
"#;

pub struct ShiftPatternRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShiftPatternRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<ShiftGroupPhase> {
        Ok(ShiftGroupPhase {
            id: row.get(0)?,
            group_name: row.get(1)?,
            shift_category: parse_enum_column(2, &row.get::<_, String>(2)?)?,
            group_label: parse_enum_column(3, &row.get::<_, String>(3)?)?,
            reference_date: parse_date_column(4, &row.get::<_, String>(4)?)?,
            is_working_on_reference: row.get(5)?,
        })
    }

    pub fn insert(&self, phase: &ShiftGroupPhase) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO shift_group_phase (
                group_name, shift_category, group_label, reference_date, is_working_on_reference
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                phase.group_name,
                phase.shift_category.as_str(),
                phase.group_label.as_str(),
                format_date(phase.reference_date),
                phase.is_working_on_reference,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<ShiftGroupPhase>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM shift_group_phase ORDER BY shift_category, group_label",
            PHASE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let phases = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<ShiftGroupPhase>>>()?;
        Ok(phases)
    }

    pub fn find_by_group_name(
        &self,
        group_name: &str,
    ) -> RepositoryResult<Option<ShiftGroupPhase>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM shift_group_phase WHERE group_name = ?1",
            PHASE_COLUMNS
        );
        let phase = conn
            .query_row(&sql, params![group_name], Self::map_row)
            .optional()?;
        Ok(phase)
    }

    /// Insert the four default phases when the table is empty.
    ///
    /// Returns how many rows were written (0 or 4).
    pub fn seed_default_phases(&self, reference_date: NaiveDate) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let existing: i64 =
            tx.query_row("SELECT COUNT(*) FROM shift_group_phase", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(0);
        }

        let phases = ShiftGroupPhase::default_phases(reference_date);
        for phase in &phases {
            tx.execute(
                r#"
                INSERT INTO shift_group_phase (
                    group_name, shift_category, group_label, reference_date, is_working_on_reference
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    phase.group_name,
                    phase.shift_category.as_str(),
                    phase.group_label.as_str(),
                    format_date(phase.reference_date),
                    phase.is_working_on_reference,
                ],
            )?;
        }

        tx.commit()?;
        Ok(phases.len())
    }
}
