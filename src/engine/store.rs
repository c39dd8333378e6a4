// ==========================================
// Porter Rota - Store adapter
// ==========================================
// The engine only sees storage through `RotaStore`.
// `SqliteRotaStore` aggregates the SQLite repositories behind it.
// ==========================================

use crate::domain::assignment::{DailyAssignmentRecord, PermanentAssignment};
use crate::domain::department::Department;
use crate::domain::porter::Porter;
use crate::domain::shift::ShiftGroupPhase;
use crate::domain::types::ShiftCategory;
use crate::repository::{
    DailyAssignmentRepository, DepartmentRepository, PermanentAssignmentRepository,
    PorterRepository, RepositoryResult, ShiftPatternRepository,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// RotaStore trait
// ==========================================
#[async_trait]
pub trait RotaStore: Send + Sync {
    async fn list_permanent_assignments(&self) -> RepositoryResult<Vec<PermanentAssignment>>;

    async fn list_departments(&self) -> RepositoryResult<Vec<Department>>;

    /// Every porter, including inactive ones.
    async fn list_porters(&self) -> RepositoryResult<Vec<Porter>>;

    async fn list_shift_group_phases(&self) -> RepositoryResult<Vec<ShiftGroupPhase>>;

    /// Persist the expansion of `date` and mark the date computed, even when
    /// `records` is empty. Returns the records with storage ids.
    async fn persist_daily_assignments(
        &self,
        date: NaiveDate,
        records: Vec<DailyAssignmentRecord>,
    ) -> RepositoryResult<Vec<DailyAssignmentRecord>>;

    /// Records stored for `date`; None when the date was never expanded.
    async fn load_daily_assignments(
        &self,
        date: NaiveDate,
    ) -> RepositoryResult<Option<Vec<DailyAssignmentRecord>>>;

    async fn upsert_daily_assignment(
        &self,
        date: NaiveDate,
        department_id: i64,
        shift_type: ShiftCategory,
        porter_id: Option<i64>,
        cover_porter_id: Option<i64>,
    ) -> RepositoryResult<DailyAssignmentRecord>;

    async fn find_daily_assignment(&self, id: i64)
        -> RepositoryResult<Option<DailyAssignmentRecord>>;

    async fn remove_daily_assignment(&self, id: i64) -> RepositoryResult<bool>;
}

// ==========================================
// SqliteRotaStore
// ==========================================
#[derive(Clone)]
pub struct SqliteRotaStore {
    pub porter_repo: Arc<PorterRepository>,
    pub department_repo: Arc<DepartmentRepository>,
    pub shift_pattern_repo: Arc<ShiftPatternRepository>,
    pub assignment_repo: Arc<PermanentAssignmentRepository>,
    pub daily_repo: Arc<DailyAssignmentRepository>,
}

impl SqliteRotaStore {
    pub fn new(
        porter_repo: Arc<PorterRepository>,
        department_repo: Arc<DepartmentRepository>,
        shift_pattern_repo: Arc<ShiftPatternRepository>,
        assignment_repo: Arc<PermanentAssignmentRepository>,
        daily_repo: Arc<DailyAssignmentRepository>,
    ) -> Self {
        Self {
            porter_repo,
            department_repo,
            shift_pattern_repo,
            assignment_repo,
            daily_repo,
        }
    }

    /// All repositories over one shared connection.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self::new(
            Arc::new(PorterRepository::new(conn.clone())),
            Arc::new(DepartmentRepository::new(conn.clone())),
            Arc::new(ShiftPatternRepository::new(conn.clone())),
            Arc::new(PermanentAssignmentRepository::new(conn.clone())),
            Arc::new(DailyAssignmentRepository::new(conn)),
        )
    }
}

#[async_trait]
impl RotaStore for SqliteRotaStore {
    async fn list_permanent_assignments(&self) -> RepositoryResult<Vec<PermanentAssignment>> {
        self.assignment_repo.list_all()
    }

    async fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
        self.department_repo.list_all()
    }

    async fn list_porters(&self) -> RepositoryResult<Vec<Porter>> {
        self.porter_repo.list_all()
    }

    async fn list_shift_group_phases(&self) -> RepositoryResult<Vec<ShiftGroupPhase>> {
        self.shift_pattern_repo.list_all()
    }

    async fn persist_daily_assignments(
        &self,
        date: NaiveDate,
        records: Vec<DailyAssignmentRecord>,
    ) -> RepositoryResult<Vec<DailyAssignmentRecord>> {
        self.daily_repo.save_expansion(date, &records)
    }

    async fn load_daily_assignments(
        &self,
        date: NaiveDate,
    ) -> RepositoryResult<Option<Vec<DailyAssignmentRecord>>> {
        self.daily_repo.find_expanded(date)
    }

    async fn upsert_daily_assignment(
        &self,
        date: NaiveDate,
        department_id: i64,
        shift_type: ShiftCategory,
        porter_id: Option<i64>,
        cover_porter_id: Option<i64>,
    ) -> RepositoryResult<DailyAssignmentRecord> {
        self.daily_repo
            .upsert_slot(date, department_id, shift_type, porter_id, cover_porter_id)
    }

    async fn find_daily_assignment(
        &self,
        id: i64,
    ) -> RepositoryResult<Option<DailyAssignmentRecord>> {
        self.daily_repo.find_by_id(id)
    }

    async fn remove_daily_assignment(&self, id: i64) -> RepositoryResult<bool> {
        self.daily_repo.delete_by_id(id)
    }
}
