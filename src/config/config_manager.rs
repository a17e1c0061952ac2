// ==========================================
// 垃圾清运车队调度 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::scheduling_config::SchedulingConfig;
use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveTime;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// 全局 scope
const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path, e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 的配置值 (UPSERT)
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 获取 global 配置快照（JSON）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| RepositoryError::InternalError(e.to_string()))
    }

    /// 加载调度参数
    ///
    /// 缺失或格式错误的键回退到默认值（格式错误会记 warn）
    pub fn load_scheduling_config(&self) -> RepositoryResult<SchedulingConfig> {
        let defaults = SchedulingConfig::default();

        let average_speed_kmh = self
            .get_parsed::<f64>(config_keys::AVERAGE_SPEED_KMH)?
            .filter(|v| *v > 0.0)
            .unwrap_or(defaults.average_speed_kmh);
        let buffer_minutes = self
            .get_parsed::<i64>(config_keys::BUFFER_MINUTES)?
            .filter(|v| *v >= 0)
            .unwrap_or(defaults.buffer_minutes);
        let trip_gap_minutes = self
            .get_parsed::<i64>(config_keys::TRIP_GAP_MINUTES)?
            .filter(|v| *v >= 0)
            .unwrap_or(defaults.trip_gap_minutes);
        let work_start = self
            .get_time(config_keys::WORK_START)?
            .unwrap_or(defaults.working_hours.start);
        let work_end = self
            .get_time(config_keys::WORK_END)?
            .unwrap_or(defaults.working_hours.end);
        let maintenance_interval_days = self
            .get_parsed::<i64>(config_keys::MAINTENANCE_INTERVAL_DAYS)?
            .filter(|v| *v >= 0)
            .unwrap_or(defaults.maintenance_interval_days);
        let maintenance_lookahead_days = self
            .get_parsed::<i64>(config_keys::MAINTENANCE_LOOKAHEAD_DAYS)?
            .filter(|v| *v >= 0)
            .unwrap_or(defaults.maintenance_lookahead_days);
        let max_search_days = self
            .get_parsed::<i64>(config_keys::MAX_SEARCH_DAYS)?
            .filter(|v| *v > 0)
            .unwrap_or(defaults.max_search_days);

        let mut config = SchedulingConfig {
            average_speed_kmh,
            buffer_minutes,
            trip_gap_minutes,
            working_hours: defaults.working_hours,
            maintenance_interval_days,
            maintenance_lookahead_days,
            max_search_days,
        };
        if work_start < work_end {
            config.working_hours.start = work_start;
            config.working_hours.end = work_end;
        } else {
            warn!(?work_start, ?work_end, "作业时段配置无效，使用默认值");
        }

        Ok(config)
    }

    fn get_parsed<T: FromStr>(&self, key: &str) -> RepositoryResult<Option<T>> {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(None),
        };
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(Some(v)),
            Err(_) => {
                warn!(key, value = %raw, "配置值格式错误，使用默认值");
                Ok(None)
            }
        }
    }

    fn get_time(&self, key: &str) -> RepositoryResult<Option<NaiveTime>> {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(None),
        };
        match NaiveTime::parse_from_str(raw.trim(), "%H:%M") {
            Ok(t) => Ok(Some(t)),
            Err(_) => {
                warn!(key, value = %raw, "时间配置格式错误（期望 HH:MM），使用默认值");
                Ok(None)
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const AVERAGE_SPEED_KMH: &str = "schedule/average_speed_kmh";
    pub const BUFFER_MINUTES: &str = "schedule/buffer_minutes";
    pub const TRIP_GAP_MINUTES: &str = "schedule/trip_gap_minutes";
    pub const WORK_START: &str = "schedule/work_start";
    pub const WORK_END: &str = "schedule/work_end";
    pub const MAINTENANCE_INTERVAL_DAYS: &str = "maintenance/interval_days";
    pub const MAINTENANCE_LOOKAHEAD_DAYS: &str = "maintenance/lookahead_days";
    pub const MAX_SEARCH_DAYS: &str = "maintenance/max_search_days";
}
