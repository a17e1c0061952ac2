// ==========================================
// 垃圾清运车队调度 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 格式错误 =====
    #[error("姓名行格式错误 (行 {line}): 需至少包含名和姓，实际 {content:?}")]
    MalformedNameLine { line: usize, content: String },

    #[error("缺少车型行 (行 {line}): 姓名行之后文件已结束")]
    MissingTruckTypeLine { line: usize },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
