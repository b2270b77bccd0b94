use chrono::{DateTime, Utc};
use lookout_core::{Report, PENDING_DESCRIPTION};
use serde::Serialize;

/// 状态颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedColor {
    Healthy,
    Degraded,
}

impl EmbedColor {
    pub fn value(&self) -> u32 {
        match self {
            EmbedColor::Healthy => 0x00FF00,
            EmbedColor::Degraded => 0xFF0000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// 状态消息（与 Discord embed 结构兼容）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusEmbed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

impl StatusEmbed {
    pub fn from_report(report: &Report, title: &str, footer: Option<&str>) -> Self {
        let color = if report.failure_count() > 0 {
            EmbedColor::Degraded
        } else {
            EmbedColor::Healthy
        };

        Self {
            title: title.to_string(),
            description: report.description(),
            color: color.value(),
            timestamp: report.generated_at,
            footer: footer.map(|text| EmbedFooter {
                text: text.to_string(),
            }),
        }
    }

    /// 首次检查前的占位消息
    pub fn pending(title: &str, footer: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            description: PENDING_DESCRIPTION.to_string(),
            color: EmbedColor::Healthy.value(),
            timestamp: Utc::now(),
            footer: footer.map(|text| EmbedFooter {
                text: text.to_string(),
            }),
        }
    }

    /// 消息请求体
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({ "embeds": [self] })
    }
}
