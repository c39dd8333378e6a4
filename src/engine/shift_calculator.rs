// ==========================================
// Porter Rota - Shift calculator
// ==========================================
// Holds the seeded shift group phases and answers rotation questions:
// - status of one group on one date
// - which group of a category is on duty
// - per-day schedule rollups over a range
// - which porters are working / off on a date
// Rule: no storage access after construction.
// ==========================================

use crate::domain::porter::Porter;
use crate::domain::shift::{
    GroupShiftStatus, ShiftGroupPhase, ShiftScheduleDay, ShiftStatus, WorkingGroups,
};
use crate::domain::types::{GroupLabel, ShiftCategory};
use crate::engine::error::{RotaError, RotaResult};
use crate::engine::rotation_core::RotationCore;
use crate::engine::store::RotaStore;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Longest span `get_shift_schedule` will roll up, in days (inclusive).
pub const MAX_SCHEDULE_DAYS: i64 = 366;

// ==========================================
// ShiftCalculator
// ==========================================
#[derive(Debug, Clone)]
pub struct ShiftCalculator {
    phases: HashMap<String, ShiftGroupPhase>,
}

impl ShiftCalculator {
    pub fn new(phases: Vec<ShiftGroupPhase>) -> Self {
        let phases = phases
            .into_iter()
            .map(|phase| (phase.group_name.clone(), phase))
            .collect();
        Self { phases }
    }

    /// Build from the phases currently held by the store.
    pub async fn load(store: &dyn RotaStore) -> RotaResult<Self> {
        let phases = store.list_shift_group_phases().await?;
        debug!(count = phases.len(), "shift group phases loaded");
        Ok(Self::new(phases))
    }

    pub fn phase(&self, group_name: &str) -> RotaResult<&ShiftGroupPhase> {
        self.phases
            .get(group_name)
            .ok_or_else(|| RotaError::UnknownShiftGroup {
                group_name: group_name.to_string(),
            })
    }

    /// Phases ordered by group name.
    pub fn phases(&self) -> Vec<&ShiftGroupPhase> {
        let mut phases: Vec<&ShiftGroupPhase> = self.phases.values().collect();
        phases.sort_by(|a, b| a.group_name.cmp(&b.group_name));
        phases
    }

    fn phase_for(&self, category: ShiftCategory, label: GroupLabel) -> Option<&ShiftGroupPhase> {
        self.phases
            .values()
            .find(|p| p.shift_category == category && p.group_label == label)
    }

    pub fn calculate_shift_status(
        &self,
        group_name: &str,
        date: NaiveDate,
    ) -> RotaResult<ShiftStatus> {
        let phase = self.phase(group_name)?;
        Ok(RotationCore::calculate_shift_status(phase, date))
    }

    /// Which of the category's two groups is on duty.
    ///
    /// The cycle position is computed once from the A phase and the result
    /// branched, so exactly one group is reported working.
    pub fn resolve_working_group(
        &self,
        category: ShiftCategory,
        date: NaiveDate,
    ) -> RotaResult<WorkingGroups> {
        let missing = |label: GroupLabel| RotaError::UnknownShiftGroup {
            group_name: crate::domain::shift::canonical_group_name(category, label),
        };
        let first = self
            .phase_for(category, GroupLabel::A)
            .ok_or_else(|| missing(GroupLabel::A))?;
        let second = self
            .phase_for(category, GroupLabel::B)
            .ok_or_else(|| missing(GroupLabel::B))?;

        let position = RotationCore::cycle_position(first.reference_date, date);
        let first_working = RotationCore::is_working_at(position, first.is_working_on_reference);

        let (working, off) = if first_working {
            (first, second)
        } else {
            (second, first)
        };

        Ok(WorkingGroups {
            shift_category: category,
            working_group: working.group_name.clone(),
            off_group: off.group_name.clone(),
        })
    }

    /// Per-day rollup from `start` to `end` inclusive, for one group or all.
    #[instrument(skip(self))]
    pub fn get_shift_schedule(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        group_name: Option<&str>,
    ) -> RotaResult<Vec<ShiftScheduleDay>> {
        if end < start {
            return Err(RotaError::InvalidDateRange { start, end });
        }
        if (end - start).num_days() + 1 > MAX_SCHEDULE_DAYS {
            return Err(RotaError::DateRangeTooLong {
                start,
                end,
                max_days: MAX_SCHEDULE_DAYS,
            });
        }

        let phases: Vec<&ShiftGroupPhase> = match group_name {
            Some(name) => vec![self.phase(name)?],
            None => self.phases(),
        };

        let schedule = start
            .iter_days()
            .take_while(|date| *date <= end)
            .map(|date| ShiftScheduleDay {
                date,
                shifts: phases
                    .iter()
                    .map(|phase| {
                        let status = RotationCore::calculate_shift_status(phase, date);
                        GroupShiftStatus {
                            shift_group: phase.group_name.clone(),
                            is_working: status.is_working,
                            shift_type: status.shift_type,
                            cycle_day: status.cycle_day,
                        }
                    })
                    .collect(),
            })
            .collect();

        Ok(schedule)
    }

    /// Rotation status of a porter's group; None when the porter has no
    /// group or the group has no phase.
    pub fn porter_status(&self, porter: &Porter, date: NaiveDate) -> Option<ShiftStatus> {
        let group = porter.shift_group.as_deref()?;
        let phase = self.phases.get(group)?;
        Some(RotationCore::calculate_shift_status(phase, date))
    }

    pub fn working_porters(
        &self,
        porters: &[Porter],
        date: NaiveDate,
        category: Option<ShiftCategory>,
    ) -> Vec<Porter> {
        self.porters_by_duty(porters, date, category, true)
    }

    pub fn off_duty_porters(
        &self,
        porters: &[Porter],
        date: NaiveDate,
        category: Option<ShiftCategory>,
    ) -> Vec<Porter> {
        self.porters_by_duty(porters, date, category, false)
    }

    fn porters_by_duty(
        &self,
        porters: &[Porter],
        date: NaiveDate,
        category: Option<ShiftCategory>,
        working: bool,
    ) -> Vec<Porter> {
        let mut selected: Vec<Porter> = porters
            .iter()
            .filter(|p| p.is_active)
            .filter_map(|p| {
                let status = self.porter_status(p, date)?;
                let category_matches = category.map_or(true, |c| status.shift_type == c);
                (category_matches && status.is_working == working).then(|| p.clone())
            })
            .collect();
        selected.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PorterCategory;
    use chrono::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn calculator() -> ShiftCalculator {
        ShiftCalculator::new(ShiftGroupPhase::default_phases(d(2025, 5, 27)))
    }

    #[test]
    fn test_unknown_group_is_error() {
        let err = calculator()
            .calculate_shift_status("Evening Shift A", d(2025, 5, 27))
            .unwrap_err();
        assert!(matches!(
            err,
            RotaError::UnknownShiftGroup { group_name } if group_name == "Evening Shift A"
        ));
    }

    #[test]
    fn test_resolve_working_group_flips_every_four_days() {
        let calc = calculator();
        let on_reference = calc.resolve_working_group(ShiftCategory::Day, d(2025, 5, 27)).unwrap();
        assert_eq!(on_reference.working_group, "Day Shift A");
        assert_eq!(on_reference.off_group, "Day Shift B");

        let later = calc.resolve_working_group(ShiftCategory::Night, d(2025, 5, 31)).unwrap();
        assert_eq!(later.working_group, "Night Shift B");
        assert_eq!(later.off_group, "Night Shift A");
    }

    #[test]
    fn test_resolver_agrees_with_per_group_status() {
        let calc = calculator();
        for offset in -30..30 {
            let date = d(2025, 5, 27) + Duration::days(offset);
            for category in ShiftCategory::ALL {
                let groups = calc.resolve_working_group(category, date).unwrap();
                assert_ne!(groups.working_group, groups.off_group);
                let working = calc.calculate_shift_status(&groups.working_group, date).unwrap();
                let off = calc.calculate_shift_status(&groups.off_group, date).unwrap();
                assert!(working.is_working);
                assert!(!off.is_working);
                assert_eq!(groups, calc.resolve_working_group(category, date).unwrap());
            }
        }
    }

    #[test]
    fn test_resolver_missing_partner_phase() {
        let phases = vec![ShiftGroupPhase::new(
            ShiftCategory::Day,
            GroupLabel::A,
            d(2025, 5, 27),
            true,
        )];
        let calc = ShiftCalculator::new(phases);
        let err = calc.resolve_working_group(ShiftCategory::Day, d(2025, 5, 27)).unwrap_err();
        assert!(matches!(
            err,
            RotaError::UnknownShiftGroup { group_name } if group_name == "Day Shift B"
        ));
    }

    #[test]
    fn test_schedule_range() {
        let calc = calculator();
        let all = calc.get_shift_schedule(d(2025, 5, 27), d(2025, 6, 3), None).unwrap();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0].shifts.len(), 4);
        assert_eq!(all[7].shifts[0].cycle_day, 8);

        let single = calc
            .get_shift_schedule(d(2025, 5, 27), d(2025, 5, 27), Some("Night Shift B"))
            .unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].shifts.len(), 1);
        assert!(!single[0].shifts[0].is_working);
    }

    #[test]
    fn test_schedule_rejects_reversed_range() {
        let err = calculator()
            .get_shift_schedule(d(2025, 6, 1), d(2025, 5, 31), None)
            .unwrap_err();
        assert!(matches!(err, RotaError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_schedule_span_is_capped() {
        let calc = calculator();
        let start = d(2024, 1, 1);

        // 2024 is a leap year: 366 days is the longest accepted span
        let year = calc.get_shift_schedule(start, d(2024, 12, 31), None).unwrap();
        assert_eq!(year.len() as i64, MAX_SCHEDULE_DAYS);

        let err = calc.get_shift_schedule(start, d(2025, 1, 1), None).unwrap_err();
        assert!(matches!(err, RotaError::DateRangeTooLong { max_days: 366, .. }));

        let err = calc
            .get_shift_schedule(NaiveDate::MIN, NaiveDate::MAX, None)
            .unwrap_err();
        assert!(matches!(err, RotaError::DateRangeTooLong { .. }));
    }

    #[test]
    fn test_working_and_off_duty_porters() {
        let porters = vec![
            Porter::new(1, "Zoe", PorterCategory::Regular).with_shift_group("Day Shift A"),
            Porter::new(2, "Adam", PorterCategory::Regular).with_shift_group("Day Shift B"),
            Porter::new(3, "Nia", PorterCategory::Regular).with_shift_group("Night Shift A"),
            Porter::new(4, "Rex", PorterCategory::Relief),
            Porter::new(5, "Ola", PorterCategory::Regular)
                .with_shift_group("Day Shift A")
                .inactive(),
            Porter::new(6, "Pat", PorterCategory::Regular).with_shift_group("PTS A"),
        ];
        let calc = calculator();
        let date = d(2025, 5, 27);

        let working: Vec<i64> = calc
            .working_porters(&porters, date, None)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(working, vec![3, 1]);

        let day_working: Vec<i64> = calc
            .working_porters(&porters, date, Some(ShiftCategory::Day))
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(day_working, vec![1]);

        let off: Vec<i64> = calc
            .off_duty_porters(&porters, date, None)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(off, vec![2]);
    }
}
