use crate::{NotifyError, Result};
use async_trait::async_trait;
use lookout_core::Alerter;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// 告警配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// 告警 webhook 地址
    pub webhook_url: String,

    /// 固定接收人 ID
    pub recipient: String,

    /// 单次 webhook 请求超时（秒）
    #[serde(default = "crate::publisher::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AlertConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Webhook 告警发送者，消息中提及接收人
pub struct WebhookAlerter {
    webhook_url: String,
    client: reqwest::Client,
}

impl WebhookAlerter {
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            webhook_url: webhook_url.into(),
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    fn build_message(&self, recipient: &str, message: &str) -> serde_json::Value {
        serde_json::json!({
            "content": format!("<@{}> {}", recipient, message),
            "allowed_mentions": { "users": [recipient] }
        })
    }

    pub async fn send(&self, recipient: &str, message: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&self.build_message(recipient, message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(recipient = %recipient, "Alert delivered");
        Ok(())
    }
}

#[async_trait]
impl Alerter for WebhookAlerter {
    async fn alert(&self, recipient: &str, message: &str) -> anyhow::Result<()> {
        self.send(recipient, message).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
