// ==========================================
// Porter Rota - Porter domain model
// ==========================================
// Porters are soft-deleted (is_active = false) and never removed, so
// historical assignments keep resolving.
// ==========================================

use crate::domain::types::{PorterCategory, ShiftCategory};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BREAK_MINUTES: u32 = 30;

// ==========================================
// Porter
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Porter {
    pub id: i64,
    pub name: String,
    pub porter_category: PorterCategory,

    // ===== Rotation =====
    pub shift_group: Option<String>,            // ShiftGroupPhase.group_name
    pub shift_category: Option<ShiftCategory>,  // derived from shift_group

    // ===== Contract =====
    pub contracted_hours: Option<String>, // "0800-2000" / "20:00-08:00"
    pub break_duration_minutes: u32,

    pub is_active: bool,
}

impl Porter {
    /// Create an active porter with no shift group.
    pub fn new(id: i64, name: &str, porter_category: PorterCategory) -> Self {
        Self {
            id,
            name: name.to_string(),
            porter_category,
            shift_group: None,
            shift_category: None,
            contracted_hours: None,
            break_duration_minutes: DEFAULT_BREAK_MINUTES,
            is_active: true,
        }
    }

    /// Set the shift group and derive its category once.
    pub fn with_shift_group(mut self, shift_group: &str) -> Self {
        self.assign_shift_group(Some(shift_group));
        self
    }

    pub fn with_contracted_hours(mut self, hours: &str, break_minutes: u32) -> Self {
        self.contracted_hours = Some(hours.to_string());
        self.break_duration_minutes = break_minutes;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Replace (or clear) the shift group, keeping the derived category in step.
    pub fn assign_shift_group(&mut self, shift_group: Option<&str>) {
        let trimmed = shift_group.map(str::trim).filter(|s| !s.is_empty());
        self.shift_group = trimmed.map(str::to_string);
        self.shift_category = trimmed.and_then(ShiftCategory::from_group_name);
    }

    pub fn is_relief(&self) -> bool {
        self.porter_category == PorterCategory::Relief
    }

    /// Shift type for daily records: night only for night-group porters.
    pub fn shift_type(&self) -> ShiftCategory {
        match self.shift_category {
            Some(ShiftCategory::Night) => ShiftCategory::Night,
            _ => ShiftCategory::Day,
        }
    }

    /// Working minutes per shift after the break, if contracted hours parse.
    pub fn shift_working_minutes(&self) -> Option<u32> {
        let (start, end) = parse_contracted_hours(self.contracted_hours.as_deref()?)?;
        Some(working_minutes(start, end, self.break_duration_minutes))
    }

    /// "11h 30m" style summary of `shift_working_minutes`.
    pub fn shift_hours_label(&self) -> Option<String> {
        self.shift_working_minutes().map(format_minutes)
    }
}

// ==========================================
// Contracted hours helpers
// ==========================================

/// Parse "0800-2000", "08:00-20:00" or "8:00-20:00".
pub fn parse_contracted_hours(value: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (start, end) = value.trim().split_once('-')?;
    Some((parse_clock(start)?, parse_clock(end)?))
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ':').collect();
    if cleaned.len() < 3 || cleaned.len() > 4 || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let split = cleaned.len() - 2;
    let hours: u32 = cleaned[..split].parse().ok()?;
    let minutes: u32 = cleaned[split..].parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Minutes between start and end, wrapping midnight, minus the break.
pub fn working_minutes(start: NaiveTime, end: NaiveTime, break_minutes: u32) -> u32 {
    let start_min = start.hour() * 60 + start.minute();
    let mut end_min = end.hour() * 60 + end.minute();
    if end_min <= start_min {
        end_min += 24 * 60;
    }
    (end_min - start_min).saturating_sub(break_minutes)
}

pub fn format_minutes(total: u32) -> String {
    let hours = total / 60;
    let minutes = total % 60;
    if minutes == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, minutes)
    }
}

/// Night window: starts at or after 18:00 or ends at or before 10:00.
pub fn is_night_window(start: NaiveTime, end: NaiveTime) -> bool {
    start.hour() >= 18 || end.hour() <= 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_group_derives_category() {
        let porter = Porter::new(1, "Martin Hobson", PorterCategory::Regular)
            .with_shift_group("Night Shift A");
        assert_eq!(porter.shift_category, Some(ShiftCategory::Night));
        assert_eq!(porter.shift_type(), ShiftCategory::Night);

        let pts = Porter::new(2, "AJ", PorterCategory::Regular).with_shift_group("PTS A");
        assert_eq!(pts.shift_category, None);
        assert_eq!(pts.shift_type(), ShiftCategory::Day);
    }

    #[test]
    fn test_clearing_shift_group() {
        let mut porter = Porter::new(1, "Kevin Gaskell", PorterCategory::Regular)
            .with_shift_group("Day Shift B");
        porter.assign_shift_group(Some("  "));
        assert_eq!(porter.shift_group, None);
        assert_eq!(porter.shift_category, None);
    }

    #[test]
    fn test_contracted_hours_day_and_overnight() {
        let day =
            Porter::new(1, "A", PorterCategory::Regular).with_contracted_hours("0800-2000", 30);
        assert_eq!(day.shift_working_minutes(), Some(690));
        assert_eq!(day.shift_hours_label().as_deref(), Some("11h 30m"));

        let night =
            Porter::new(2, "B", PorterCategory::Regular).with_contracted_hours("20:00-08:00", 0);
        assert_eq!(night.shift_hours_label().as_deref(), Some("12h"));
    }

    #[test]
    fn test_unparseable_hours() {
        assert!(parse_contracted_hours("days").is_none());
        assert!(parse_contracted_hours("2500-0100").is_none());
        let porter = Porter::new(1, "A", PorterCategory::Relief);
        assert_eq!(porter.shift_working_minutes(), None);
    }

    #[test]
    fn test_night_window() {
        let (start, end) = parse_contracted_hours("2000-0800").unwrap();
        assert!(is_night_window(start, end));
        let (start, end) = parse_contracted_hours("0800-2000").unwrap();
        assert!(!is_night_window(start, end));
    }
}
