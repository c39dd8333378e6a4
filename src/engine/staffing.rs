// ==========================================
// Porter Rota - Staffing rollups
// ==========================================
// Pure summaries over a day's records:
// - per department / shift: filled slots vs min_porters_required
// - porter utilization by category from permanent assignments
// ==========================================

use crate::domain::assignment::{
    current_assignments_by_porter, DailyAssignmentRecord, PermanentAssignment,
};
use crate::domain::department::Department;
use crate::domain::porter::Porter;
use crate::domain::types::ShiftCategory;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingLine {
    pub department_id: i64,
    pub department_name: String,
    pub shift_type: ShiftCategory,
    pub assigned: u32,
    pub required: u32,
    pub shortfall: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryUtilization {
    pub assigned: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PorterUtilization {
    pub total: u32,
    pub assigned: u32,
    pub available: u32,
    pub by_category: BTreeMap<String, CategoryUtilization>,
}

/// Shift types a department is expected to staff.
fn expected_shifts(department: &Department) -> Vec<ShiftCategory> {
    if let Some(category) = department.rotation_category {
        vec![category]
    } else if department.operating_schedule.is_24_hour {
        ShiftCategory::ALL.to_vec()
    } else {
        vec![ShiftCategory::Day]
    }
}

/// One line per (department, shift) operating on `date`, in department order.
///
/// A slot counts as filled when it has a porter or a cover porter.
pub fn staffing_summary(
    date: NaiveDate,
    departments: &[Department],
    records: &[DailyAssignmentRecord],
) -> Vec<StaffingLine> {
    let weekday = date.weekday();
    let mut lines = Vec::new();

    for department in departments.iter().filter(|d| d.operating_schedule.operates_on(weekday)) {
        let mut shifts = expected_shifts(department);
        for record in records.iter().filter(|r| r.department_id == department.id) {
            if !shifts.contains(&record.shift_type) {
                shifts.push(record.shift_type);
            }
        }
        shifts.sort();

        for shift_type in shifts {
            let assigned = records
                .iter()
                .filter(|r| r.department_id == department.id && r.shift_type == shift_type)
                .filter(|r| r.porter_id.is_some() || r.cover_porter_id.is_some())
                .count() as u32;
            let required = department.min_porters_required;
            lines.push(StaffingLine {
                department_id: department.id,
                department_name: department.name.clone(),
                shift_type,
                assigned,
                required,
                shortfall: required.saturating_sub(assigned),
            });
        }
    }

    lines
}

/// Active porters with a current permanent assignment on `date`.
pub fn porter_utilization(
    porters: &[Porter],
    assignments: &[PermanentAssignment],
    date: NaiveDate,
) -> PorterUtilization {
    let current = current_assignments_by_porter(assignments, date);
    let mut by_category: BTreeMap<String, CategoryUtilization> = BTreeMap::new();
    let mut total = 0;
    let mut assigned = 0;

    for porter in porters.iter().filter(|p| p.is_active) {
        let entry = by_category
            .entry(porter.porter_category.as_str().to_string())
            .or_default();
        entry.total += 1;
        total += 1;
        if current.contains_key(&porter.id) {
            entry.assigned += 1;
            assigned += 1;
        }
    }

    PorterUtilization {
        total,
        assigned,
        available: total - assigned,
        by_category,
    }
}
