use crate::report::Report;
use anyhow::Result;
use async_trait::async_trait;

/// 状态消息发布者
///
/// 负责"创建一次、之后编辑"的语义，以及消息丢失后的重建。
#[async_trait]
pub trait Publisher: Send + Sync {
    /// 启动时调用一次，可在首次检查前放置占位消息
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }

    async fn publish(&self, report: &Report) -> Result<()>;

    fn name(&self) -> &str;
}

/// 告警发送者，核心不重试失败的发送
#[async_trait]
pub trait Alerter: Send + Sync {
    async fn alert(&self, recipient: &str, message: &str) -> Result<()>;

    fn name(&self) -> &str;
}

/// 目标离线告警文本
pub fn offline_alert(target: &str) -> String {
    format!("Attention: {} is offline!", target)
}
