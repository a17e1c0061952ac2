// ==========================================
// 垃圾清运车队调度 - 配置层
// ==========================================
// 职责: 调度参数管理，支持 config_kv 覆写
// ==========================================

pub mod config_manager;
pub mod scheduling_config;

pub use config_manager::{config_keys, ConfigManager};
pub use scheduling_config::SchedulingConfig;
