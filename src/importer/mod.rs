// ==========================================
// 垃圾清运车队调度 - 导入层
// ==========================================
// 职责: 外部技师资质文件 → technician 表
// ==========================================

pub mod employee_resolver;
pub mod error;
pub mod qualification_importer;
pub mod qualification_parser;

// 重导出核心类型
pub use employee_resolver::{EmployeeResolver, StoreEmployeeResolver};
pub use error::{ImportError, ImportResult};
pub use qualification_importer::{QualificationImportReport, QualificationImporter, SkipReason};
pub use qualification_parser::QualificationParser;
