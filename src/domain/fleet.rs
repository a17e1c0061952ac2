// ==========================================
// 垃圾清运车队调度 - 车队/线路/设施实体
// ==========================================
// 对齐: schema.sql route / truck / truck_type / facility 表
// ==========================================

use crate::domain::types::{FacilityId, RouteId, TruckId};
use chrono::Duration;
use serde::{Deserialize, Serialize};

// ==========================================
// Route - 清运线路
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub rid: RouteId,
    pub waste_type: String,
    pub length: f64, // km
}

impl Route {
    /// 按平均车速计算单趟时长（length / speed 小时）
    ///
    /// 长度非有限值或时长超出可表示范围时返回 None
    pub fn trip_duration(&self, speed_kmh: f64) -> Option<Duration> {
        travel_time(self.length, speed_kmh)
    }
}

/// 按平均车速推算行驶时长（毫秒精度）
pub fn travel_time(length_km: f64, speed_kmh: f64) -> Option<Duration> {
    let millis = (length_km / speed_kmh * 3_600_000.0).round();
    if !millis.is_finite() || millis < 0.0 || millis >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

// ==========================================
// Truck - 车辆
// ==========================================
// 可承运垃圾类型由 truck_type 决定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub tid: TruckId,
    pub truck_type: String,
    pub capacity: f64,
}

// ==========================================
// Facility - 处置设施
// ==========================================
// 接收能力视为无限
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub fid: FacilityId,
    pub address: String,
    pub waste_type: String,
}
