// ==========================================
// Porter Rota - Core library
// ==========================================
// Hospital porter staffing: 4-on/4-off shift rotation, department
// eligibility and daily assignment derivation.
// Stack: Rust + SQLite
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain - entities and value types
pub mod domain;

// Repository - data access
pub mod repository;

// Engine - rotation and staffing rules
pub mod engine;

// Configuration
pub mod config;

// Database infrastructure (connection setup / schema)
pub mod db;

// Logging
pub mod logging;

// API - caller-facing operations
pub mod api;

// Application wiring
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    DailyAssignmentRecord, Department, DepartmentCategory, GroupLabel, OperatingSchedule,
    PermanentAssignment, Porter, PorterCategory, ShiftCategory, ShiftGroupPhase, ShiftStatus,
};

pub use engine::{
    DailyAssignmentExpander, EligibilityFilter, RotaError, RotaStore, RotationCore,
    ShiftCalculator, SqliteRotaStore,
};

pub use api::{ApiError, RotaApi};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Porter Rota";
