// ==========================================
// Porter Rota - Daily assignment expander
// ==========================================
// Turns permanent assignments + rotation state into concrete staffing
// records for one date.
// Lifecycle per date: uncomputed -> expanded (marked + persisted + cached).
// Bad references are skipped and logged; expansion never fails on them.
// ==========================================

use crate::domain::assignment::{
    DailyAssignmentRecord, DailyAssignmentWithDetails, PermanentAssignment,
};
use crate::domain::department::Department;
use crate::domain::porter::Porter;
use crate::domain::types::{DepartmentCategory, ShiftCategory};
use crate::engine::assignment_cache::DailyAssignmentCache;
use crate::engine::error::{RotaError, RotaResult};
use crate::engine::rotation_core::RotationCore;
use crate::engine::shift_calculator::ShiftCalculator;
use crate::engine::store::RotaStore;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// Expansion outcome
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingDepartment,
    MissingPorter,
    InactivePorter,
    OutsideAssignmentPeriod,
    OffCycle { cycle_day: u8 },
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAssignment {
    pub assignment_id: i64,
    pub porter_id: i64,
    pub department_id: i64,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpansionOutcome {
    pub records: Vec<DailyAssignmentRecord>,
    pub skipped: Vec<SkippedAssignment>,
}

/// Expand permanent assignments into pending (unsaved) records for `date`.
///
/// Porters in a group without a phase are still emitted, with a warning.
pub fn expand_assignments(
    date: NaiveDate,
    assignments: &[PermanentAssignment],
    departments: &[Department],
    porters: &[Porter],
    calculator: &ShiftCalculator,
) -> ExpansionOutcome {
    let departments: HashMap<i64, &Department> = departments.iter().map(|d| (d.id, d)).collect();
    let porters: HashMap<i64, &Porter> = porters.iter().map(|p| (p.id, p)).collect();

    let mut outcome = ExpansionOutcome::default();
    let mut emitted: HashSet<(i64, i64, ShiftCategory)> = HashSet::new();

    for assignment in assignments {
        let skip = |reason: SkipReason| SkippedAssignment {
            assignment_id: assignment.id,
            porter_id: assignment.porter_id,
            department_id: assignment.department_id,
            reason,
        };

        if !assignment.is_active_on(date) {
            debug!(assignment_id = assignment.id, "assignment period does not cover date");
            outcome.skipped.push(skip(SkipReason::OutsideAssignmentPeriod));
            continue;
        }

        let Some(department) = departments.get(&assignment.department_id) else {
            warn!(
                assignment_id = assignment.id,
                department_id = assignment.department_id,
                "permanent assignment references a missing department; skipped"
            );
            outcome.skipped.push(skip(SkipReason::MissingDepartment));
            continue;
        };

        let Some(porter) = porters.get(&assignment.porter_id) else {
            warn!(
                assignment_id = assignment.id,
                porter_id = assignment.porter_id,
                "permanent assignment references a missing porter; skipped"
            );
            outcome.skipped.push(skip(SkipReason::MissingPorter));
            continue;
        };

        if !porter.is_active {
            debug!(porter_id = porter.id, "porter inactive; skipped");
            outcome.skipped.push(skip(SkipReason::InactivePorter));
            continue;
        }

        let shift_type = porter.shift_type();

        if department.department_category == DepartmentCategory::ShiftRotation {
            if let Some(group) = porter.shift_group.as_deref() {
                match calculator.phase(group) {
                    Ok(phase) => {
                        let status = RotationCore::calculate_shift_status(phase, date);
                        if !status.is_working {
                            debug!(
                                porter_id = porter.id,
                                shift_group = group,
                                cycle_day = status.cycle_day,
                                "porter off-cycle"
                            );
                            outcome.skipped.push(skip(SkipReason::OffCycle {
                                cycle_day: status.cycle_day,
                            }));
                            continue;
                        }
                    }
                    Err(_) => {
                        warn!(
                            porter_id = porter.id,
                            shift_group = group,
                            "shift group has no rotation phase; assignment kept"
                        );
                    }
                }
            }
        }

        if !emitted.insert((department.id, porter.id, shift_type)) {
            outcome.skipped.push(skip(SkipReason::Duplicate));
            continue;
        }

        outcome.records.push(DailyAssignmentRecord::pending(
            date,
            department.id,
            Some(porter.id),
            shift_type,
        ));
    }

    outcome
}

// ==========================================
// DailyAssignmentExpander
// ==========================================
pub struct DailyAssignmentExpander {
    store: Arc<dyn RotaStore>,
    calculator: Arc<ShiftCalculator>,
    cache: DailyAssignmentCache,
}

impl DailyAssignmentExpander {
    pub fn new(store: Arc<dyn RotaStore>, calculator: Arc<ShiftCalculator>) -> Self {
        Self {
            store,
            calculator,
            cache: DailyAssignmentCache::new(),
        }
    }

    pub fn calculator(&self) -> &Arc<ShiftCalculator> {
        &self.calculator
    }

    pub fn cache(&self) -> &DailyAssignmentCache {
        &self.cache
    }

    /// Records for `date`, optionally restricted to one shift type.
    #[instrument(skip(self))]
    pub async fn get_daily_assignments(
        &self,
        date: NaiveDate,
        shift_category: Option<ShiftCategory>,
    ) -> RotaResult<Vec<DailyAssignmentRecord>> {
        let records = self.records_for_date(date).await?;
        Ok(match shift_category {
            Some(category) => records.into_iter().filter(|r| r.shift_type == category).collect(),
            None => records,
        })
    }

    async fn records_for_date(&self, date: NaiveDate) -> RotaResult<Vec<DailyAssignmentRecord>> {
        if let Some(records) = self.cache.get(date).await {
            return Ok(records);
        }

        let _guard = self.cache.lock_date(date).await;
        // another caller may have finished while we waited
        if let Some(records) = self.cache.get(date).await {
            return Ok(records);
        }

        // a date with a stored expansion is never recomputed, even when its
        // records were all removed since
        let records = match self.store.load_daily_assignments(date).await? {
            Some(stored) => {
                debug!(count = stored.len(), "daily assignments loaded from store");
                stored
            }
            None => {
                let outcome = self.expand(date).await?;
                self.store.persist_daily_assignments(date, outcome.records).await?
            }
        };

        self.cache.insert(date, records.clone()).await;
        Ok(records)
    }

    /// Run the expansion for `date` against the store's current data.
    #[instrument(skip(self))]
    pub async fn expand(&self, date: NaiveDate) -> RotaResult<ExpansionOutcome> {
        let assignments = self.store.list_permanent_assignments().await?;
        let departments = self.store.list_departments().await?;
        let porters = self.store.list_porters().await?;

        let outcome =
            expand_assignments(date, &assignments, &departments, &porters, &self.calculator);
        info!(
            emitted = outcome.records.len(),
            skipped = outcome.skipped.len(),
            "daily assignments expanded"
        );
        Ok(outcome)
    }

    /// Manual override of one (date, department, shift) slot.
    ///
    /// The date is expanded first so the override lands on top of the
    /// derived records instead of suppressing them.
    #[instrument(skip(self))]
    pub async fn set_daily_assignment(
        &self,
        date: NaiveDate,
        department_id: i64,
        porter_id: Option<i64>,
        cover_porter_id: Option<i64>,
        shift_type: ShiftCategory,
    ) -> RotaResult<DailyAssignmentRecord> {
        let departments = self.store.list_departments().await?;
        if !departments.iter().any(|d| d.id == department_id) {
            return Err(RotaError::MissingDepartment { department_id });
        }

        let porters = self.store.list_porters().await?;
        for id in porter_id.into_iter().chain(cover_porter_id) {
            if !porters.iter().any(|p| p.id == id && p.is_active) {
                return Err(RotaError::MissingPorter { porter_id: id });
            }
        }

        self.records_for_date(date).await?;

        let _guard = self.cache.lock_date(date).await;
        let record = self
            .store
            .upsert_daily_assignment(date, department_id, shift_type, porter_id, cover_porter_id)
            .await?;
        self.cache.put_record(record.clone()).await;

        info!(record_id = record.id, "daily assignment set");
        Ok(record)
    }

    /// Delete one record. Returns false when it does not exist.
    #[instrument(skip(self))]
    pub async fn remove_daily_assignment(&self, id: i64) -> RotaResult<bool> {
        let Some(record) = self.store.find_daily_assignment(id).await? else {
            return Ok(false);
        };

        let _guard = self.cache.lock_date(record.date).await;
        let removed = self.store.remove_daily_assignment(id).await?;
        if removed {
            self.cache.remove_record(record.date, id).await;
        }
        Ok(removed)
    }

    /// Records joined with department and porters.
    ///
    /// A record whose department no longer exists fails the call; a missing
    /// porter just leaves the slot empty.
    pub async fn get_daily_assignments_with_details(
        &self,
        date: NaiveDate,
        shift_category: Option<ShiftCategory>,
    ) -> RotaResult<Vec<DailyAssignmentWithDetails>> {
        let records = self.get_daily_assignments(date, shift_category).await?;
        let departments: HashMap<i64, Department> = self
            .store
            .list_departments()
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();
        let porters: HashMap<i64, Porter> = self
            .store
            .list_porters()
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        records
            .into_iter()
            .map(|record| {
                let department = departments.get(&record.department_id).cloned().ok_or_else(|| {
                    error!(
                        record_id = record.id,
                        department_id = record.department_id,
                        "daily assignment references a missing department"
                    );
                    RotaError::MissingDepartment {
                        department_id: record.department_id,
                    }
                })?;

                let lookup = |id: Option<i64>| {
                    let id = id?;
                    let porter = porters.get(&id).cloned();
                    if porter.is_none() {
                        warn!(
                            record_id = record.id,
                            porter_id = id,
                            "porter missing; slot left empty"
                        );
                    }
                    porter
                };

                Ok(DailyAssignmentWithDetails {
                    porter: lookup(record.porter_id),
                    cover_porter: lookup(record.cover_porter_id),
                    department,
                    record,
                })
            })
            .collect()
    }
}
