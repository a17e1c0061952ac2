// ==========================================
// 垃圾清运车队调度 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 车辆/司机/设施/技师分配引擎（贪心首次适配）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分配规则
pub mod engine;

// 导入层 - 外部资质文件
pub mod importer;

// 配置层 - 调度参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 对外操作
pub mod api;

// 应用层 - 共享状态
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{ApiError, ApiResult, WasteWrangler};
pub use config::SchedulingConfig;
pub use domain::{
    Employee, Facility, Maintenance, QualificationRecord, ResourceKind, Route, TimeWindow, Trip,
    Truck,
};
pub use engine::{
    AvailabilityOracle, CandidateSelector, MaintenanceScheduler, RerouteEngine, TripDecision,
    TripRejectReason, TripScheduler, WorkmateGraph,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "垃圾清运车队调度";
