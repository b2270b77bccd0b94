use thiserror::Error;

/// 通知错误
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 之前发布的消息已不存在
    #[error("Message not found: {0}")]
    MessageGone(String),

    #[error("Webhook rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid webhook response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, NotifyError>;
