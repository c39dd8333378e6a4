// ==========================================
// Porter Rota - Repository layer
// ==========================================
// Rule: repositories hold no business logic.
// All queries are parameterised.
// ==========================================

pub mod assignment_repo;
pub mod daily_assignment_repo;
pub mod department_repo;
pub mod error;
pub mod porter_repo;
pub mod row_utils;
pub mod shift_pattern_repo;

// Re-exports
pub use assignment_repo::PermanentAssignmentRepository;
pub use daily_assignment_repo::DailyAssignmentRepository;
pub use department_repo::DepartmentRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use porter_repo::PorterRepository;
pub use shift_pattern_repo::ShiftPatternRepository;
