// ==========================================
// Porter Rota - Configuration layer
// ==========================================
// Storage: config_kv table
// ==========================================

pub mod config_manager;
pub mod rota_config_trait;

// Re-exports
pub use config_manager::{config_defaults, config_keys, ConfigManager};
pub use rota_config_trait::{RotaConfigReader, ShiftSettings};
