// ==========================================
// 垃圾清运车队调度 - 调度参数
// ==========================================
// 职责: 承载引擎使用的全部常量，可由 config_kv 覆写
// ==========================================

use crate::domain::schedule::WorkingHours;
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// 调度参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// 平均车速 (km/h)，单趟时长 = 线路长度 / 车速
    pub average_speed_kmh: f64,
    /// 出车前后缓冲 (分钟)
    pub buffer_minutes: i64,
    /// 批量排车时相邻两趟间隔 (分钟)
    pub trip_gap_minutes: i64,
    /// 作业时段
    pub working_hours: WorkingHours,
    /// 维保周期 (天)：上次维保早于 D - N 天才需排维保
    pub maintenance_interval_days: i64,
    /// 维保前瞻窗口 (天)：[D, D+N] 内已有维保则不再排
    pub maintenance_lookahead_days: i64,
    /// 维保逐日搜索上限 (天)
    pub max_search_days: i64,
}

impl SchedulingConfig {
    // 超出 Duration 范围的配置值按 Duration::MAX 处理
    pub fn buffer(&self) -> Duration {
        Duration::try_minutes(self.buffer_minutes).unwrap_or(Duration::MAX)
    }

    pub fn trip_gap(&self) -> Duration {
        Duration::try_minutes(self.trip_gap_minutes).unwrap_or(Duration::MAX)
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            average_speed_kmh: 5.0,
            buffer_minutes: 30,
            trip_gap_minutes: 30,
            working_hours: WorkingHours {
                start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
                end: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or(NaiveTime::MIN),
            },
            maintenance_interval_days: 90,
            maintenance_lookahead_days: 10,
            max_search_days: 365,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_minutes_saturate() {
        let config = SchedulingConfig {
            buffer_minutes: i64::MAX,
            ..SchedulingConfig::default()
        };
        assert_eq!(config.buffer(), Duration::MAX);
        assert_eq!(config.trip_gap(), Duration::minutes(30));
    }
}
