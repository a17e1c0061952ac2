// ==========================================
// 垃圾清运车队调度 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{ApiResult, WasteWrangler};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "WASTE_WRANGLER_DB_PATH";

/// 默认数据库文件名
const DB_FILE_NAME: &str = "waste_wrangler.db";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 调度API
    pub wrangler: Arc<WasteWrangler>,
}

impl AppState {
    /// 打开数据库（必要时建表）并创建API实例
    pub fn new(db_path: String) -> ApiResult<Self> {
        tracing::info!(db_path = %db_path, "初始化AppState");
        let wrangler = WasteWrangler::open(&db_path)?;
        Ok(Self {
            db_path,
            wrangler: Arc::new(wrangler),
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 WASTE_WRANGLER_DB_PATH → 用户数据目录/waste-wrangler/ → ./waste_wrangler.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("waste-wrangler");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}
