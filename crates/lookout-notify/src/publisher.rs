use crate::embed::StatusEmbed;
use crate::{NotifyError, Result};
use async_trait::async_trait;
use lookout_core::{Publisher, Report};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// 状态消息发布配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// 频道 webhook 地址
    pub webhook_url: String,

    /// 已存在的状态消息 ID，重启后继续编辑同一条消息
    #[serde(default)]
    pub message_id: Option<String>,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub footer: Option<String>,

    /// 单次 webhook 请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_title() -> String {
    "Service Status".to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    10
}

impl PublisherConfig {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            message_id: None,
            title: default_title(),
            footer: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
struct CreatedMessage {
    id: String,
}

/// Webhook 状态消息发布者
///
/// 首次发布时创建消息，之后编辑同一条消息。消息被删除（编辑返回 404）时，
/// 在同一次发布中重新创建。
pub struct WebhookPublisher {
    config: PublisherConfig,
    client: reqwest::Client,
    message_id: Mutex<Option<String>>,
}

impl WebhookPublisher {
    pub fn new(config: PublisherConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
        let message_id = Mutex::new(config.message_id.clone());
        Ok(Self {
            config,
            client,
            message_id,
        })
    }

    /// 当前正在编辑的消息 ID
    pub async fn message_id(&self) -> Option<String> {
        self.message_id.lock().await.clone()
    }

    fn base_url(&self) -> &str {
        self.config.webhook_url.trim_end_matches('/')
    }

    async fn create(&self, embed: &StatusEmbed) -> Result<String> {
        let response = self
            .client
            .post(format!("{}?wait=true", self.base_url()))
            .json(&embed.to_payload())
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

        let created: CreatedMessage = response
            .json()
            .await
            .map_err(|e| NotifyError::InvalidResponse(e.to_string()))?;

        info!(message_id = %created.id, "Status message created");
        Ok(created.id)
    }

    async fn edit(&self, message_id: &str, embed: &StatusEmbed) -> Result<()> {
        let response = self
            .client
            .patch(format!("{}/messages/{}", self.base_url(), message_id))
            .json(&embed.to_payload())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(NotifyError::MessageGone(message_id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// 编辑已有消息，不存在时重新创建
    pub async fn deliver(&self, embed: &StatusEmbed) -> Result<()> {
        let mut current = self.message_id.lock().await;

        if let Some(id) = current.clone() {
            match self.edit(&id, embed).await {
                Ok(()) => return Ok(()),
                Err(NotifyError::MessageGone(id)) => {
                    warn!(message_id = %id, "Status message not found, creating a new one");
                    *current = None;
                }
                Err(e) => return Err(e),
            }
        }

        let id = self.create(embed).await?;
        *current = Some(id);
        Ok(())
    }
}

#[async_trait]
impl Publisher for WebhookPublisher {
    async fn prepare(&self) -> anyhow::Result<()> {
        let mut current = self.message_id.lock().await;
        if current.is_none() {
            let embed = StatusEmbed::pending(&self.config.title, self.config.footer.as_deref());
            *current = Some(self.create(&embed).await?);
        }
        Ok(())
    }

    async fn publish(&self, report: &Report) -> anyhow::Result<()> {
        let embed = StatusEmbed::from_report(report, &self.config.title, self.config.footer.as_deref());
        self.deliver(&embed).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
