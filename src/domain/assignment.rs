// ==========================================
// Porter Rota - Assignments
// ==========================================
// PermanentAssignment: standing intent ("this porter normally works here").
// DailyAssignmentRecord: concrete staffing fact for one date, derived from
// permanent assignments plus rotation state.
// ==========================================

use crate::domain::department::Department;
use crate::domain::porter::Porter;
use crate::domain::types::ShiftCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// PermanentAssignment
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermanentAssignment {
    pub id: i64,
    pub porter_id: i64,
    pub department_id: i64,
    pub is_permanent: bool,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl PermanentAssignment {
    pub fn new(id: i64, porter_id: i64, department_id: i64, start_date: NaiveDate) -> Self {
        Self {
            id,
            porter_id,
            department_id,
            is_permanent: true,
            start_date,
            end_date: None,
        }
    }

    pub fn ending(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// start_date <= date <= end_date (open-ended when end_date is None).
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| date <= end)
    }
}

/// Current assignment per porter on `date`: among the assignments active on
/// that date, the one with the latest start_date (ties go to the higher id).
pub fn current_assignments_by_porter(
    assignments: &[PermanentAssignment],
    date: NaiveDate,
) -> HashMap<i64, &PermanentAssignment> {
    let mut current: HashMap<i64, &PermanentAssignment> = HashMap::new();

    for assignment in assignments.iter().filter(|a| a.is_active_on(date)) {
        let newer = current.get(&assignment.porter_id).map_or(true, |existing| {
            (assignment.start_date, assignment.id) > (existing.start_date, existing.id)
        });
        if newer {
            current.insert(assignment.porter_id, assignment);
        }
    }

    current
}

/// Porters whose current assignment on `date` is `department_id`.
pub fn porters_assigned_to_department(
    assignments: &[PermanentAssignment],
    department_id: i64,
    date: NaiveDate,
) -> Vec<i64> {
    let mut ids: Vec<i64> = current_assignments_by_porter(assignments, date)
        .into_values()
        .filter(|a| a.department_id == department_id)
        .map(|a| a.porter_id)
        .collect();
    ids.sort_unstable();
    ids
}

// ==========================================
// DailyAssignmentRecord
// ==========================================
// One porter slot per record; cover_porter_id is a substitute, not a
// second worker. id == 0 until persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAssignmentRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub department_id: i64,
    pub porter_id: Option<i64>,
    pub cover_porter_id: Option<i64>,
    pub shift_type: ShiftCategory,
}

impl DailyAssignmentRecord {
    pub fn pending(
        date: NaiveDate,
        department_id: i64,
        porter_id: Option<i64>,
        shift_type: ShiftCategory,
    ) -> Self {
        Self {
            id: 0,
            date,
            department_id,
            porter_id,
            cover_porter_id: None,
            shift_type,
        }
    }

    /// Slot key used by manual overrides.
    pub fn slot_key(&self) -> (NaiveDate, i64, ShiftCategory) {
        (self.date, self.department_id, self.shift_type)
    }
}

/// Record joined with its department and porters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyAssignmentWithDetails {
    #[serde(flatten)]
    pub record: DailyAssignmentRecord,
    pub department: Department,
    pub porter: Option<Porter>,
    pub cover_porter: Option<Porter>,
}
