// ==========================================
// Porter Rota - Engine error type
// ==========================================
// Unknown shift groups and bad date ranges propagate to the caller.
// Missing departments / porters during expansion are logged and skipped;
// they only surface as errors where a record must resolve (details join).
// ==========================================

use crate::repository::RepositoryError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotaError {
    #[error("unknown shift group: {group_name}")]
    UnknownShiftGroup { group_name: String },

    #[error("department {department_id} does not exist")]
    MissingDepartment { department_id: i64 },

    #[error("porter {porter_id} does not exist or is inactive")]
    MissingPorter { porter_id: i64 },

    #[error("invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("date range {start}..={end} spans more than {max_days} days")]
    DateRangeTooLong {
        start: NaiveDate,
        end: NaiveDate,
        max_days: i64,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type RotaResult<T> = Result<T, RotaError>;
