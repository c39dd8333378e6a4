// ==========================================
// Porter Rota - Department domain model
// ==========================================
// Department category drives eligibility; the operating schedule is
// informational (the expander never drops records on closed days).
// ==========================================

use crate::domain::types::{DepartmentCategory, ShiftCategory};
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

// ==========================================
// OperatingSchedule
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingSchedule {
    pub days_of_week: Vec<u32>, // 0 = Sunday; empty = every day
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_24_hour: bool,
    pub requires_shift_support: bool,
}

impl OperatingSchedule {
    /// Every day, around the clock.
    pub fn round_the_clock() -> Self {
        Self {
            days_of_week: Vec::new(),
            start_time: NaiveTime::MIN,
            end_time: NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN),
            is_24_hour: true,
            requires_shift_support: false,
        }
    }

    /// Fixed hours on the given days (0 = Sunday).
    pub fn hours(days_of_week: &[u32], start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            days_of_week: days_of_week.to_vec(),
            start_time,
            end_time,
            is_24_hour: false,
            requires_shift_support: false,
        }
    }

    pub fn with_shift_support(mut self) -> Self {
        self.requires_shift_support = true;
        self
    }

    pub fn operates_on(&self, weekday: Weekday) -> bool {
        self.days_of_week.is_empty()
            || self.days_of_week.contains(&weekday.num_days_from_sunday())
    }

    /// Whether the department is open at `time` on `weekday`.
    ///
    /// Windows whose end is before their start run past midnight.
    pub fn is_operating_at(&self, weekday: Weekday, time: NaiveTime) -> bool {
        if !self.operates_on(weekday) {
            return false;
        }
        if self.is_24_hour {
            return true;
        }
        if self.end_time < self.start_time {
            time >= self.start_time || time <= self.end_time
        } else {
            time >= self.start_time && time <= self.end_time
        }
    }

    /// "24 Hours", "All Days 07:00-19:00", "Mon, Tue 08:00-17:00".
    pub fn describe(&self) -> String {
        if self.is_24_hour {
            return "24 Hours".to_string();
        }

        let days = if self.days_of_week.is_empty() {
            "All Days".to_string()
        } else {
            self.days_of_week
                .iter()
                .filter_map(|d| DAY_NAMES.get(*d as usize).copied())
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "{} {}-{}",
            days,
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

// ==========================================
// Department
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub department_category: DepartmentCategory,
    pub operating_schedule: OperatingSchedule,
    pub min_porters_required: u32,
    pub display_order: i32,

    /// Day/night pairing of a shift_rotation department, derived from its name.
    pub rotation_category: Option<ShiftCategory>,
}

impl Department {
    pub fn new(
        id: i64,
        name: &str,
        department_category: DepartmentCategory,
        operating_schedule: OperatingSchedule,
        min_porters_required: u32,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            department_category,
            operating_schedule,
            min_porters_required,
            display_order: 0,
            rotation_category: derive_rotation_category(department_category, name),
        }
    }

    pub fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }

    /// Re-derive after a rename or category change.
    pub fn refresh_rotation_category(&mut self) {
        self.rotation_category = derive_rotation_category(self.department_category, &self.name);
    }

    pub fn requires_shift_support(&self) -> bool {
        self.department_category == DepartmentCategory::Emergency24h
            && self.operating_schedule.requires_shift_support
    }
}

/// Night Shift A/B pair with night porters; Day Shift A/B and PTS A/B with day porters.
pub fn derive_rotation_category(
    category: DepartmentCategory,
    name: &str,
) -> Option<ShiftCategory> {
    if category != DepartmentCategory::ShiftRotation {
        return None;
    }
    if name.contains("Night Shift") {
        Some(ShiftCategory::Night)
    } else if name.contains("Day Shift") || name.contains("PTS") {
        Some(ShiftCategory::Day)
    } else {
        None
    }
}
