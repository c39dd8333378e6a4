// ==========================================
// Porter Rota - Shift group phases
// ==========================================
// A phase anchors one shift group's 4-on/4-off rotation to a reference date.
// Phases are seeded once (Day/Night x A/B) and never edited afterwards.
// ==========================================

use crate::domain::types::{GroupLabel, ShiftCategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ShiftGroupPhase
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftGroupPhase {
    pub id: i64,
    pub group_name: String,             // "Day Shift A"
    pub shift_category: ShiftCategory,  // derived at creation
    pub group_label: GroupLabel,        // derived at creation
    pub reference_date: NaiveDate,
    pub is_working_on_reference: bool,
}

impl ShiftGroupPhase {
    /// Build a phase with the canonical group name for its category and label.
    pub fn new(
        shift_category: ShiftCategory,
        group_label: GroupLabel,
        reference_date: NaiveDate,
        is_working_on_reference: bool,
    ) -> Self {
        Self {
            id: 0,
            group_name: canonical_group_name(shift_category, group_label),
            shift_category,
            group_label,
            reference_date,
            is_working_on_reference,
        }
    }

    /// The four seeded phases: A works on the reference date, B is off.
    pub fn default_phases(reference_date: NaiveDate) -> Vec<ShiftGroupPhase> {
        ShiftCategory::ALL
            .iter()
            .flat_map(|&category| {
                [
                    ShiftGroupPhase::new(category, GroupLabel::A, reference_date, true),
                    ShiftGroupPhase::new(category, GroupLabel::B, reference_date, false),
                ]
            })
            .collect()
    }
}

/// "Day Shift A", "Night Shift B", ...
pub fn canonical_group_name(category: ShiftCategory, label: GroupLabel) -> String {
    format!("{} Shift {}", category.title(), label.as_str())
}

// ==========================================
// Rotation results
// ==========================================

/// Status of one shift group on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftStatus {
    pub is_working: bool,
    pub cycle_day: u8, // 1..=8
    pub shift_type: ShiftCategory,
}

/// Which group of a category is on duty and which is off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingGroups {
    pub shift_category: ShiftCategory,
    pub working_group: String,
    pub off_group: String,
}

/// One group's line in a schedule rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupShiftStatus {
    pub shift_group: String,
    pub is_working: bool,
    pub shift_type: ShiftCategory,
    pub cycle_day: u8,
}

/// Per-day rollup produced by `get_shift_schedule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftScheduleDay {
    pub date: NaiveDate,
    pub shifts: Vec<GroupShiftStatus>,
}
