// ==========================================
// 垃圾清运车队调度 - 引擎层
// ==========================================
// 职责: 车辆/司机/技师/设施的分配规则，不拼 SQL
// 红线: 引擎借用调用方连接（事务），不自行提交
// ==========================================

pub mod availability;
pub mod maintenance_scheduler;
pub mod reroute;
pub mod selector;
pub mod trip_scheduler;
pub mod unit_of_work;
pub mod workmate;

// 重导出核心引擎
pub use availability::AvailabilityOracle;
pub use maintenance_scheduler::MaintenanceScheduler;
pub use reroute::{RerouteChange, RerouteEngine};
pub use selector::CandidateSelector;
pub use trip_scheduler::{TripDecision, TripRejectReason, TripScheduler};
pub use unit_of_work::run_in_transaction;
pub use workmate::WorkmateGraph;
