use thiserror::Error;

/// Lookout 核心错误类型
#[derive(Error, Debug)]
pub enum LookoutError {
    /// 命令引用了注册表中不存在的目标
    #[error("Site {0} not found.")]
    TargetNotFound(String),

    /// 目标名称重复
    #[error("Duplicate target: {0}")]
    DuplicateTarget(String),

    /// 目标定义无效
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// 命令参数无效
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// 调度器错误
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, LookoutError>;

impl LookoutError {
    pub fn invalid_target(msg: impl Into<String>) -> Self {
        LookoutError::InvalidTarget(msg.into())
    }
}
