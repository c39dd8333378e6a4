// ==========================================
// Porter Rota - Domain layer
// ==========================================
// Entities and value types only: no storage access, no rotation logic.
// ==========================================

pub mod assignment;
pub mod department;
pub mod porter;
pub mod shift;
pub mod types;

pub use assignment::{
    current_assignments_by_porter, porters_assigned_to_department, DailyAssignmentRecord,
    DailyAssignmentWithDetails, PermanentAssignment,
};
pub use department::{Department, OperatingSchedule};
pub use porter::Porter;
pub use shift::{
    canonical_group_name, GroupShiftStatus, ShiftGroupPhase, ShiftScheduleDay, ShiftStatus,
    WorkingGroups,
};
pub use types::{DepartmentCategory, GroupLabel, PorterCategory, ShiftCategory};
