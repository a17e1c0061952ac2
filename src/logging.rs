// ==========================================
// 日志系统初始化
// ==========================================
// tracing + tracing-subscriber，RUST_LOG 控制级别
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认日志过滤器
pub const DEFAULT_FILTER: &str = "info";

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=waste_wrangler::engine=debug
///
/// # 示例
/// ```no_run
/// use waste_wrangler::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // 重复初始化（例如 CLI 被当作库嵌入时）不视为错误
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .try_init();
}
