// ==========================================
// 垃圾清运车队调度 - 应用层
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
