// ==========================================
// Porter Rota - Department eligibility
// ==========================================
// Which porters may be assigned to a department on a date.
// Rule per department category:
//   shift_rotation  same rotation category as the department, or Relief
//   relief          Relief only
//   emergency_24h   Regular / Relief, plus on-duty rotation groups when the
//                   department asks for shift support
//   standard_hours  Regular / Relief
//   on_demand       everyone
// Inactive and already-assigned porters are always excluded.
// ==========================================

use crate::domain::department::Department;
use crate::domain::porter::Porter;
use crate::domain::types::{DepartmentCategory, PorterCategory, ShiftCategory};
use crate::engine::error::RotaResult;
use crate::engine::shift_calculator::ShiftCalculator;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

const EMERGENCY_NOTE: &str =
    "Emergency departments operate 24/7 and can draw on shift porters for support";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRecommendation {
    pub recommended: Vec<Porter>,
    pub additional: Vec<Porter>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentValidation {
    pub valid: bool,
    pub reason: Option<String>,
}

impl AssignmentValidation {
    pub fn ok() -> Self {
        Self { valid: true, reason: None }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

// ==========================================
// EligibilityRules - pure rule set
// ==========================================
pub struct EligibilityRules;

impl EligibilityRules {
    /// Category rule alone (no activity, assignment or shift-support checks).
    ///
    /// For shift_rotation departments only the day/night category is
    /// compared, so a "Day Shift B" porter is a candidate for "Day Shift A"
    /// as well as "Day Shift B".
    pub fn matches_department(department: &Department, porter: &Porter) -> bool {
        match department.department_category {
            DepartmentCategory::ShiftRotation => match department.rotation_category {
                Some(category) => porter.is_relief() || porter.shift_category == Some(category),
                None => true,
            },
            DepartmentCategory::Relief => porter.is_relief(),
            DepartmentCategory::Emergency24h | DepartmentCategory::StandardHours => {
                porter.porter_category.is_direct_staff()
            }
            DepartmentCategory::OnDemand => true,
        }
    }

    /// Apply the department rule, add shift-support porters, drop inactive
    /// and already-assigned porters, dedupe, sort by name.
    ///
    /// `support_groups` are the group names currently on duty; it is only
    /// consulted when the department requires shift support.
    pub fn filter(
        department: &Department,
        porters: &[Porter],
        already_assigned: &HashSet<i64>,
        support_groups: &[String],
    ) -> Vec<Porter> {
        let use_support = department.requires_shift_support() && !support_groups.is_empty();
        let mut seen = HashSet::new();

        let mut eligible: Vec<Porter> = porters
            .iter()
            .filter(|p| p.is_active && !already_assigned.contains(&p.id))
            .filter(|p| {
                Self::matches_department(department, p)
                    || (use_support
                        && p.shift_group
                            .as_ref()
                            .map_or(false, |g| support_groups.contains(g)))
            })
            .filter(|p| seen.insert(p.id))
            .cloned()
            .collect();

        eligible.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        eligible
    }

    /// Split an eligible list into recommended and additional porters.
    pub fn recommend(department: &Department, eligible: &[Porter]) -> AssignmentRecommendation {
        let (recommended, additional, note): (Vec<Porter>, Vec<Porter>, String) =
            match department.department_category {
                DepartmentCategory::ShiftRotation => {
                    let recommended = eligible
                        .iter()
                        .filter(|p| match department.rotation_category {
                            Some(category) => p.shift_category == Some(category),
                            None => p.shift_category.is_some(),
                        })
                        .cloned()
                        .collect();
                    let additional = eligible.iter().filter(|p| p.is_relief()).cloned().collect();
                    (
                        recommended,
                        additional,
                        "Shift rotation departments follow a 4-on/4-off schedule".to_string(),
                    )
                }
                DepartmentCategory::Emergency24h => {
                    let (recommended, rest): (Vec<Porter>, Vec<Porter>) = eligible
                        .iter()
                        .cloned()
                        .partition(|p| p.porter_category == PorterCategory::Regular);
                    let additional = rest
                        .into_iter()
                        .filter(|p| p.is_relief() || p.shift_group.is_some())
                        .collect();
                    (
                        recommended,
                        additional,
                        EMERGENCY_NOTE.to_string(),
                    )
                }
                DepartmentCategory::StandardHours => {
                    let recommended = eligible
                        .iter()
                        .filter(|p| p.porter_category == PorterCategory::Regular)
                        .cloned()
                        .collect();
                    let additional = eligible.iter().filter(|p| p.is_relief()).cloned().collect();
                    (
                        recommended,
                        additional,
                        format!("Operating {}", department.operating_schedule.describe()),
                    )
                }
                DepartmentCategory::Relief => (
                    eligible.iter().filter(|p| p.is_relief()).cloned().collect(),
                    Vec::new(),
                    "Relief porters provide coverage across all departments".to_string(),
                ),
                DepartmentCategory::OnDemand => {
                    let split = (department.min_porters_required as usize).min(eligible.len());
                    (
                        eligible[..split].to_vec(),
                        eligible[split..].to_vec(),
                        "On-demand departments operate as needed".to_string(),
                    )
                }
            };

        AssignmentRecommendation {
            recommended,
            additional,
            notes: vec![note],
        }
    }

    /// A porter is a valid assignment iff it is in the eligible list.
    pub fn validate(
        department: &Department,
        porter: &Porter,
        eligible: &[Porter],
    ) -> AssignmentValidation {
        if eligible.iter().any(|p| p.id == porter.id) {
            AssignmentValidation::ok()
        } else {
            AssignmentValidation::rejected(format!(
                "{} is not suitable for {} ({})",
                porter.name, department.name, department.department_category
            ))
        }
    }
}

// ==========================================
// EligibilityFilter - rules + live rotation state
// ==========================================
pub struct EligibilityFilter {
    calculator: Arc<ShiftCalculator>,
}

impl EligibilityFilter {
    pub fn new(calculator: Arc<ShiftCalculator>) -> Self {
        Self { calculator }
    }

    /// Group names on duty on `date` across both categories.
    pub fn on_duty_groups(&self, date: NaiveDate) -> RotaResult<Vec<String>> {
        ShiftCategory::ALL
            .iter()
            .map(|&category| {
                self.calculator
                    .resolve_working_group(category, date)
                    .map(|groups| groups.working_group)
            })
            .collect()
    }

    #[instrument(
        skip(self, department, porters, already_assigned),
        fields(department_id = department.id)
    )]
    pub fn eligible_porters(
        &self,
        department: &Department,
        porters: &[Porter],
        date: Option<NaiveDate>,
        already_assigned: &HashSet<i64>,
    ) -> RotaResult<Vec<Porter>> {
        let support_groups = match date {
            Some(date) if department.requires_shift_support() => self.on_duty_groups(date)?,
            _ => Vec::new(),
        };

        let eligible =
            EligibilityRules::filter(department, porters, already_assigned, &support_groups);
        debug!(
            eligible = eligible.len(),
            support_groups = ?support_groups,
            "eligibility evaluated"
        );
        Ok(eligible)
    }
}
