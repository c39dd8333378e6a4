// ==========================================
// Porter Rota - Application layer
// ==========================================
// Wires the layers together for the binary and embedding callers.
// ==========================================

pub mod state;

// Re-exports
pub use state::{get_default_db_path, AppState};
