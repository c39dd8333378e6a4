// ==========================================
// Porter Rota - Rotation configuration reader trait
// ==========================================
// Read-only view of the settings the rotation engine needs.
// Implemented by ConfigManager (config_kv table).
// ==========================================

use crate::repository::RepositoryResult;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

#[async_trait]
pub trait RotaConfigReader: Send + Sync {
    /// Anchor date for the seeded shift group phases.
    ///
    /// # Default
    /// - 2025-05-27
    async fn get_rotation_reference_date(&self) -> RepositoryResult<NaiveDate>;

    /// Start of the day shift (default 07:00).
    async fn get_day_shift_start(&self) -> RepositoryResult<NaiveTime>;

    /// Start of the night shift (default 19:00).
    async fn get_night_shift_start(&self) -> RepositoryResult<NaiveTime>;

    /// Break applied when a porter has no contracted hours (default 30).
    async fn get_default_break_minutes(&self) -> RepositoryResult<u32>;
}

// ==========================================
// ShiftSettings - resolved once at start-up
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftSettings {
    pub day_shift_start: NaiveTime,
    pub night_shift_start: NaiveTime,
    pub default_break_minutes: u32,
}

impl ShiftSettings {
    pub async fn load<C>(config: &C) -> RepositoryResult<Self>
    where
        C: RotaConfigReader + ?Sized,
    {
        Ok(Self {
            day_shift_start: config.get_day_shift_start().await?,
            night_shift_start: config.get_night_shift_start().await?,
            default_break_minutes: config.get_default_break_minutes().await?,
        })
    }
}

impl Default for ShiftSettings {
    fn default() -> Self {
        Self {
            day_shift_start: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
            night_shift_start: NaiveTime::from_hms_opt(19, 0, 0).unwrap_or(NaiveTime::MIN),
            default_break_minutes: 30,
        }
    }
}
