use async_trait::async_trait;
use lookout_core::{Alerter, Publisher, Report};
use tracing::{info, warn};

/// 只写日志的发布者，未配置 webhook 时使用
#[derive(Debug, Default)]
pub struct LogPublisher;

#[async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, report: &Report) -> anyhow::Result<()> {
        for entry in &report.entries {
            info!(target_name = %entry.target.name, state = ?entry.state, "Status");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// 只写日志的告警者
#[derive(Debug, Default)]
pub struct LogAlerter;

#[async_trait]
impl Alerter for LogAlerter {
    async fn alert(&self, recipient: &str, message: &str) -> anyhow::Result<()> {
        warn!(recipient = %recipient, "{}", message);
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
