use thiserror::Error;

/// 探测错误
#[derive(Error, Debug)]
pub enum ProbeError {
    /// HTTP 客户端错误（超时、连接失败等）
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 非 2xx 响应
    #[error("Unexpected status: {0}")]
    Status(u16),

    /// 对端 ID 无效
    #[error("Invalid peer id: {0}")]
    InvalidPeer(String),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
