// ==========================================
// 垃圾清运车队调度 - API 层
// ==========================================
// 职责: 对外暴露排车/维保/改派/资质/同事圈操作
// ==========================================

pub mod error;
pub mod wrangler_api;

pub use error::{ApiError, ApiResult};
pub use wrangler_api::WasteWrangler;
