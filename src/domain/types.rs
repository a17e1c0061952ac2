// ==========================================
// 垃圾清运车队调度 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 线路 ID (route.rid)
pub type RouteId = i64;
/// 车辆 ID (truck.tid)
pub type TruckId = i64;
/// 员工 ID (employee.eid)
pub type EmployeeId = i64;
/// 处置设施 ID (facility.fid)
pub type FacilityId = i64;

// ==========================================
// 资源类别 (Resource Kind)
// ==========================================
// 可用性判定按类别走不同规则：
// - Truck: 出车时段(含缓冲) + 当日维保
// - Driver: 出车时段(含缓冲)
// - Technician: 当日维保(无缓冲)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    Truck,
    Driver,
    Technician,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Truck => write!(f, "TRUCK"),
            ResourceKind::Driver => write!(f, "DRIVER"),
            ResourceKind::Technician => write!(f, "TECHNICIAN"),
        }
    }
}
