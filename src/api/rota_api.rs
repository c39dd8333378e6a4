// ==========================================
// Porter Rota - Rota API
// ==========================================
// Caller-facing surface for the UI / HTTP layer.
// Dates cross this boundary as YYYY-MM-DD strings, shift categories as
// "day" / "night".
// ==========================================

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ShiftSettings;
use crate::domain::assignment::{
    porters_assigned_to_department, DailyAssignmentRecord, DailyAssignmentWithDetails,
};
use crate::domain::department::Department;
use crate::domain::porter::{
    format_minutes, is_night_window, parse_contracted_hours, working_minutes, Porter,
};
use crate::domain::shift::{ShiftScheduleDay, ShiftStatus, WorkingGroups};
use crate::domain::types::ShiftCategory;
use crate::engine::{
    porter_utilization, staffing_summary, AssignmentRecommendation, AssignmentValidation,
    DailyAssignmentExpander, EligibilityFilter, EligibilityRules, PorterUtilization,
    RotaStore, ShiftCalculator, StaffingLine,
};

// ==========================================
// DTOs
// ==========================================

/// Shift status of one group on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftStatusInfo {
    pub shift_group: String,
    pub date: NaiveDate,
    pub is_working: bool,
    pub cycle_day: u8,
    pub shift_type: ShiftCategory,
}

/// Working window of a porter for one shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PorterShiftHours {
    pub porter_id: i64,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub break_minutes: u32,
    pub working_minutes: u32,
    pub label: String,
    pub is_night: bool,
    pub from_contract: bool,
}

// ==========================================
// Input parsing
// ==========================================

pub fn parse_date(field: &str, value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ApiError::InvalidInput(format!("{} must be a YYYY-MM-DD date, got '{}'", field, value))
    })
}

fn parse_optional_date(field: &str, value: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    value.map(|v| parse_date(field, v)).transpose()
}

pub fn parse_shift_category(value: &str) -> ApiResult<ShiftCategory> {
    value
        .parse::<ShiftCategory>()
        .map_err(ApiError::InvalidInput)
}

fn parse_optional_category(value: Option<&str>) -> ApiResult<Option<ShiftCategory>> {
    value.map(parse_shift_category).transpose()
}

fn ensure_id(field: &str, id: i64) -> ApiResult<()> {
    if id <= 0 {
        return Err(ApiError::InvalidInput(format!("{} must be positive, got {}", field, id)));
    }
    Ok(())
}

// ==========================================
// RotaApi
// ==========================================
pub struct RotaApi {
    store: Arc<dyn RotaStore>,
    expander: Arc<DailyAssignmentExpander>,
    eligibility: EligibilityFilter,
    settings: ShiftSettings,
}

impl RotaApi {
    pub fn new(
        store: Arc<dyn RotaStore>,
        expander: Arc<DailyAssignmentExpander>,
        settings: ShiftSettings,
    ) -> Self {
        let eligibility = EligibilityFilter::new(expander.calculator().clone());
        Self {
            store,
            expander,
            eligibility,
            settings,
        }
    }

    fn calculator(&self) -> &ShiftCalculator {
        self.expander.calculator()
    }

    async fn find_department(&self, department_id: i64) -> ApiResult<Department> {
        ensure_id("department_id", department_id)?;
        self.store
            .list_departments()
            .await?
            .into_iter()
            .find(|d| d.id == department_id)
            .ok_or_else(|| {
                ApiError::NotFound(format!("department {} does not exist", department_id))
            })
    }

    // ==========================================
    // Daily assignments
    // ==========================================

    pub async fn get_daily_assignments(
        &self,
        date: &str,
        shift_category: Option<&str>,
    ) -> ApiResult<Vec<DailyAssignmentRecord>> {
        let date = parse_date("date", date)?;
        let category = parse_optional_category(shift_category)?;
        Ok(self.expander.get_daily_assignments(date, category).await?)
    }

    pub async fn get_daily_assignments_with_details(
        &self,
        date: &str,
        shift_category: Option<&str>,
    ) -> ApiResult<Vec<DailyAssignmentWithDetails>> {
        let date = parse_date("date", date)?;
        let category = parse_optional_category(shift_category)?;
        Ok(self
            .expander
            .get_daily_assignments_with_details(date, category)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn set_daily_assignment(
        &self,
        date: &str,
        department_id: i64,
        porter_id: Option<i64>,
        cover_porter_id: Option<i64>,
        shift_type: &str,
    ) -> ApiResult<DailyAssignmentRecord> {
        let date = parse_date("date", date)?;
        let shift_type = parse_shift_category(shift_type)?;
        ensure_id("department_id", department_id)?;
        if let Some(id) = porter_id {
            ensure_id("porter_id", id)?;
        }
        if let Some(id) = cover_porter_id {
            ensure_id("cover_porter_id", id)?;
        }
        if porter_id.is_some() && porter_id == cover_porter_id {
            return Err(ApiError::InvalidInput(
                "a porter cannot cover their own slot".to_string(),
            ));
        }

        Ok(self
            .expander
            .set_daily_assignment(date, department_id, porter_id, cover_porter_id, shift_type)
            .await?)
    }

    pub async fn remove_daily_assignment(&self, id: i64) -> ApiResult<bool> {
        ensure_id("id", id)?;
        Ok(self.expander.remove_daily_assignment(id).await?)
    }

    // ==========================================
    // Rotation
    // ==========================================

    pub fn calculate_shift_status(
        &self,
        shift_group_name: &str,
        date: &str,
    ) -> ApiResult<ShiftStatusInfo> {
        if shift_group_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("shift group name must not be empty".to_string()));
        }
        let date = parse_date("date", date)?;
        let ShiftStatus {
            is_working,
            cycle_day,
            shift_type,
        } = self.calculator().calculate_shift_status(shift_group_name.trim(), date)?;

        Ok(ShiftStatusInfo {
            shift_group: shift_group_name.trim().to_string(),
            date,
            is_working,
            cycle_day,
            shift_type,
        })
    }

    pub fn resolve_working_group(
        &self,
        shift_category: &str,
        date: &str,
    ) -> ApiResult<WorkingGroups> {
        let category = parse_shift_category(shift_category)?;
        let date = parse_date("date", date)?;
        Ok(self.calculator().resolve_working_group(category, date)?)
    }

    pub fn get_shift_schedule(
        &self,
        start_date: &str,
        end_date: &str,
        shift_group_name: Option<&str>,
    ) -> ApiResult<Vec<ShiftScheduleDay>> {
        let start = parse_date("start_date", start_date)?;
        let end = parse_date("end_date", end_date)?;
        Ok(self
            .calculator()
            .get_shift_schedule(start, end, shift_group_name.map(str::trim))?)
    }

    pub async fn get_working_porters(
        &self,
        date: &str,
        shift_category: Option<&str>,
    ) -> ApiResult<Vec<Porter>> {
        let date = parse_date("date", date)?;
        let category = parse_optional_category(shift_category)?;
        let porters = self.store.list_porters().await?;
        Ok(self.calculator().working_porters(&porters, date, category))
    }

    pub async fn get_off_duty_porters(
        &self,
        date: &str,
        shift_category: Option<&str>,
    ) -> ApiResult<Vec<Porter>> {
        let date = parse_date("date", date)?;
        let category = parse_optional_category(shift_category)?;
        let porters = self.store.list_porters().await?;
        Ok(self.calculator().off_duty_porters(&porters, date, category))
    }

    // ==========================================
    // Eligibility
    // ==========================================

    /// Porters whose current permanent assignment is `department_id`.
    pub async fn assigned_porter_ids(
        &self,
        department_id: i64,
        date: NaiveDate,
    ) -> ApiResult<HashSet<i64>> {
        let assignments = self.store.list_permanent_assignments().await?;
        Ok(porters_assigned_to_department(&assignments, department_id, date)
            .into_iter()
            .collect())
    }

    async fn eligible_for(
        &self,
        department: &Department,
        date: Option<NaiveDate>,
    ) -> ApiResult<Vec<Porter>> {
        let reference_day = date.unwrap_or_else(|| Local::now().date_naive());
        let already_assigned = self.assigned_porter_ids(department.id, reference_day).await?;
        let porters = self.store.list_porters().await?;
        Ok(self
            .eligibility
            .eligible_porters(department, &porters, date, &already_assigned)?)
    }

    pub async fn get_eligible_porters(
        &self,
        department_id: i64,
        date: Option<&str>,
    ) -> ApiResult<Vec<Porter>> {
        let date = parse_optional_date("date", date)?;
        let department = self.find_department(department_id).await?;
        self.eligible_for(&department, date).await
    }

    pub async fn get_assignment_recommendations(
        &self,
        department_id: i64,
        date: Option<&str>,
    ) -> ApiResult<AssignmentRecommendation> {
        let date = parse_optional_date("date", date)?;
        let department = self.find_department(department_id).await?;
        let eligible = self.eligible_for(&department, date).await?;
        Ok(EligibilityRules::recommend(&department, &eligible))
    }

    pub async fn validate_assignment(
        &self,
        porter_id: i64,
        department_id: i64,
        date: Option<&str>,
    ) -> ApiResult<AssignmentValidation> {
        let date = parse_optional_date("date", date)?;
        ensure_id("porter_id", porter_id)?;
        ensure_id("department_id", department_id)?;

        let porter = self
            .store
            .list_porters()
            .await?
            .into_iter()
            .find(|p| p.id == porter_id);
        let department = self
            .store
            .list_departments()
            .await?
            .into_iter()
            .find(|d| d.id == department_id);

        let (Some(porter), Some(department)) = (porter, department) else {
            return Ok(AssignmentValidation::rejected("Porter or department not found"));
        };

        let eligible = self.eligible_for(&department, date).await?;
        Ok(EligibilityRules::validate(&department, &porter, &eligible))
    }

    // ==========================================
    // Staffing
    // ==========================================

    pub async fn get_staffing_summary(&self, date: &str) -> ApiResult<Vec<StaffingLine>> {
        let date = parse_date("date", date)?;
        let records = self.expander.get_daily_assignments(date, None).await?;
        let departments = self.store.list_departments().await?;
        Ok(staffing_summary(date, &departments, &records))
    }

    pub async fn get_porter_utilization(&self, date: Option<&str>) -> ApiResult<PorterUtilization> {
        let date = parse_optional_date("date", date)?.unwrap_or_else(|| Local::now().date_naive());
        let porters = self.store.list_porters().await?;
        let assignments = self.store.list_permanent_assignments().await?;
        Ok(porter_utilization(&porters, &assignments, date))
    }

    /// Contracted window, or the standard window of the porter's shift
    /// category with the configured default break. None when neither applies.
    pub async fn get_porter_shift_hours(
        &self,
        porter_id: i64,
    ) -> ApiResult<Option<PorterShiftHours>> {
        ensure_id("porter_id", porter_id)?;
        let porter = self
            .store
            .list_porters()
            .await?
            .into_iter()
            .find(|p| p.id == porter_id)
            .ok_or_else(|| ApiError::NotFound(format!("porter {} does not exist", porter_id)))?;

        let contracted = porter.contracted_hours.as_deref().and_then(parse_contracted_hours);
        let (start, end, break_minutes, from_contract) = match (contracted, porter.shift_category) {
            (Some((start, end)), _) => (start, end, porter.break_duration_minutes, true),
            (None, Some(ShiftCategory::Day)) => (
                self.settings.day_shift_start,
                self.settings.night_shift_start,
                self.settings.default_break_minutes,
                false,
            ),
            (None, Some(ShiftCategory::Night)) => (
                self.settings.night_shift_start,
                self.settings.day_shift_start,
                self.settings.default_break_minutes,
                false,
            ),
            (None, None) => return Ok(None),
        };

        let minutes = working_minutes(start, end, break_minutes);
        Ok(Some(PorterShiftHours {
            porter_id,
            start,
            end,
            break_minutes,
            working_minutes: minutes,
            label: format_minutes(minutes),
            is_night: is_night_window(start, end),
            from_contract,
        }))
    }

    // ==========================================
    // Departments
    // ==========================================

    pub async fn list_departments_operating_on(&self, date: &str) -> ApiResult<Vec<Department>> {
        let weekday = parse_date("date", date)?.weekday();
        Ok(self
            .store
            .list_departments()
            .await?
            .into_iter()
            .filter(|d| d.operating_schedule.operates_on(weekday))
            .collect())
    }

    pub async fn list_departments_requiring_shift_support(&self) -> ApiResult<Vec<Department>> {
        Ok(self
            .store
            .list_departments()
            .await?
            .into_iter()
            .filter(Department::requires_shift_support)
            .collect())
    }
}
