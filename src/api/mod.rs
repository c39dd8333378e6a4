// ==========================================
// Porter Rota - API layer
// ==========================================
// Business API consumed by the UI / HTTP layer.
// ==========================================

pub mod error;
pub mod rota_api;

// Re-exports
pub use error::{ApiError, ApiResult};
pub use rota_api::{parse_date, parse_shift_category, PorterShiftHours, RotaApi, ShiftStatusInfo};
