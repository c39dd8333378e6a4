// ==========================================
// Porter Rota - Engine layer
// ==========================================
// Rotation math, eligibility rules and daily expansion.
// Rule: engines never build SQL; storage goes through `RotaStore`.
// ==========================================

pub mod assignment_cache;
pub mod daily_assignment;
pub mod eligibility;
pub mod error;
pub mod rotation_core;
pub mod shift_calculator;
pub mod staffing;
pub mod store;

// Re-exports
pub use assignment_cache::{DailyAssignmentCache, DateLockGuard};
pub use daily_assignment::{
    expand_assignments, DailyAssignmentExpander, ExpansionOutcome, SkipReason, SkippedAssignment,
};
pub use eligibility::{
    AssignmentRecommendation, AssignmentValidation, EligibilityFilter, EligibilityRules,
};
pub use error::{RotaError, RotaResult};
pub use rotation_core::{RotationCore, CYCLE_LENGTH_DAYS, WORKING_DAYS};
pub use shift_calculator::{ShiftCalculator, MAX_SCHEDULE_DAYS};
pub use staffing::{
    porter_utilization, staffing_summary, CategoryUtilization, PorterUtilization, StaffingLine,
};
pub use store::{RotaStore, SqliteRotaStore};
