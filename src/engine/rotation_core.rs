// ==========================================
// Porter Rota - Rotation Core pure functions
// ==========================================
// 8-day cycle: 4 days on, 4 days off, day 0 aligned to the phase's
// reference date.
// Rule: stateless, no side effects, no I/O.
// ==========================================

use crate::domain::shift::{ShiftGroupPhase, ShiftStatus};
use chrono::NaiveDate;

pub const CYCLE_LENGTH_DAYS: i64 = 8;
pub const WORKING_DAYS: i64 = 4;

// ==========================================
// RotationCore
// ==========================================
pub struct RotationCore;

impl RotationCore {
    /// Signed whole-day difference `target - reference`.
    ///
    /// Calendar-date arithmetic only: no DST or clock effects.
    pub fn days_between(reference: NaiveDate, target: NaiveDate) -> i64 {
        (target - reference).num_days()
    }

    /// Position in the cycle, always in `0..8`, also for dates before the reference.
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use porter_rota::engine::RotationCore;
    ///
    /// let reference = NaiveDate::from_ymd_opt(2025, 5, 27).unwrap();
    /// let week_before = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
    /// assert_eq!(RotationCore::cycle_position(reference, week_before), 1);
    /// ```
    pub fn cycle_position(reference: NaiveDate, target: NaiveDate) -> i64 {
        Self::days_between(reference, target).rem_euclid(CYCLE_LENGTH_DAYS)
    }

    /// Whether a group with the given reference phase works at `position`.
    pub fn is_working_at(position: i64, is_working_on_reference: bool) -> bool {
        let in_first_half = position < WORKING_DAYS;
        if is_working_on_reference {
            in_first_half
        } else {
            !in_first_half
        }
    }

    /// 1-indexed cycle day for display.
    pub fn cycle_day(position: i64) -> u8 {
        // position is in 0..8
        (position + 1) as u8
    }

    /// Shift status of one phase on `target`.
    pub fn calculate_shift_status(phase: &ShiftGroupPhase, target: NaiveDate) -> ShiftStatus {
        let position = Self::cycle_position(phase.reference_date, target);
        ShiftStatus {
            is_working: Self::is_working_at(position, phase.is_working_on_reference),
            cycle_day: Self::cycle_day(position),
            shift_type: phase.shift_category,
        }
    }
}
