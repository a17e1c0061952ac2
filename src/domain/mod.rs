// ==========================================
// 垃圾清运车队调度 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、时间窗
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod fleet;
pub mod schedule;
pub mod staff;
pub mod types;

// 重导出核心类型
pub use fleet::{Facility, Route, Truck};
pub use schedule::{Maintenance, TimeWindow, Trip, WorkingHours};
pub use staff::{DriverCandidate, Employee, QualificationRecord};
pub use types::{EmployeeId, FacilityId, ResourceKind, RouteId, TruckId};
