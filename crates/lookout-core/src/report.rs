use crate::status::DisplayState;
use crate::target::Target;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 首次检查完成前展示的占位文本
pub const PENDING_DESCRIPTION: &str = "Waiting for the first check...";

/// 报告条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub target: Target,
    pub state: DisplayState,
}

/// 一次检查生成的状态报告，按注册表顺序排列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new(generated_at: DateTime<Utc>, entries: Vec<ReportEntry>) -> Self {
        Self {
            generated_at,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state_of(&self, target: &str) -> Option<&DisplayState> {
        self.entries
            .iter()
            .find(|e| e.target.name == target)
            .map(|e| &e.state)
    }

    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|e| e.state.is_failure()).count()
    }

    /// 渲染为消息正文，每个目标一行
    pub fn description(&self) -> String {
        if self.entries.is_empty() {
            return PENDING_DESCRIPTION.to_string();
        }

        self.entries
            .iter()
            .map(|e| render_line(&e.target.name, &e.state))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// 渲染单行状态
pub fn render_line(name: &str, state: &DisplayState) -> String {
    match state {
        DisplayState::Maintenance { .. } => format!("**{} (Maintenance) 🟠**", name),
        DisplayState::Problem { issue } => format!("**{} (Problem: {}) ❗**", name, issue),
        DisplayState::Observing { hours_remaining } => format!(
            "**{} under observation for {} more hours 🕒**",
            name, hours_remaining
        ),
        DisplayState::Online => format!("**{} 🟢 Online**", name),
        DisplayState::Offline => format!("**{} 🔴 Offline**", name),
        DisplayState::Up { latency_ms } => format!("**{} 🟢 (Ping: {} ms)**", name, latency_ms),
        DisplayState::Down => format!("**{} 🔴**", name),
    }
}
