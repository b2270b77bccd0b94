use crate::annotation::AnnotationStore;
use crate::clock::{Clock, SystemClock};
use crate::scheduler::PassTrigger;
use crate::target::TargetRegistry;
use crate::{LookoutError, Result};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// 运维命令
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Command {
    ScheduleMaintenance {
        site: String,
        time: String,
        reason: String,
    },
    ReportProblem {
        site: String,
        issue: String,
    },
    StartObservation {
        site: String,
        duration_hours: u32,
    },
    ClearAnnotations {
        site: String,
    },
}

impl Command {
    pub fn site(&self) -> &str {
        match self {
            Command::ScheduleMaintenance { site, .. }
            | Command::ReportProblem { site, .. }
            | Command::StartObservation { site, .. }
            | Command::ClearAnnotations { site } => site,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Command::ScheduleMaintenance { .. } => "schedule-maintenance",
            Command::ReportProblem { .. } => "report-problem",
            Command::StartObservation { .. } => "start-observation",
            Command::ClearAnnotations { .. } => "clear-annotations",
        }
    }
}

/// 命令服务
///
/// 先对照注册表校验目标，再修改标注存储，成功后请求一次立即检查。
pub struct CommandService {
    registry: Arc<TargetRegistry>,
    annotations: Arc<RwLock<AnnotationStore>>,
    trigger: PassTrigger,
    clock: Arc<dyn Clock>,
}

impl CommandService {
    pub fn new(
        registry: Arc<TargetRegistry>,
        annotations: Arc<RwLock<AnnotationStore>>,
        trigger: PassTrigger,
    ) -> Self {
        Self {
            registry,
            annotations,
            trigger,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 执行命令，返回给操作员的确认文本
    pub async fn execute(&self, command: Command) -> Result<String> {
        let site = command.site().to_string();
        if !self.registry.contains(&site) {
            warn!(command = command.kind(), site = %site, "Command rejected, unknown site");
            return Err(LookoutError::TargetNotFound(site));
        }

        let reply = {
            let mut store = self.annotations.write().await;
            match &command {
                Command::ScheduleMaintenance { time, reason, .. } => {
                    store.add_maintenance(&site, time.as_str(), reason.as_str());
                    format!(
                        "Maintenance scheduled for {} at {} for the following reason: {}",
                        site, time, reason
                    )
                }
                Command::ReportProblem { issue, .. } => {
                    store.add_problem(&site, issue.as_str());
                    format!("Problem reported for {}: {}", site, issue)
                }
                Command::StartObservation { duration_hours, .. } => {
                    let ends_at = store
                        .add_observation(&site, *duration_hours, self.clock.now())
                        .map_err(|e| {
                            warn!(site = %site, error = %e, "Command rejected");
                            e
                        })?;
                    info!(site = %site, ends_at = %ends_at, "Observation window opened");
                    format!("{} is under observation for {} hours.", site, duration_hours)
                }
                Command::ClearAnnotations { .. } => {
                    let removed = store.remove_all(&site);
                    info!(site = %site, removed, "Annotations cleared");
                    format!("Annotations for {} removed.", site)
                }
            }
        };

        info!(command = command.kind(), site = %site, "Command applied");
        if !self.trigger.request(command.kind()) {
            warn!("Pass scheduler is not running, status will refresh on restart");
        }

        Ok(reply)
    }

    pub async fn schedule_maintenance(
        &self,
        site: impl Into<String>,
        time: impl Into<String>,
        reason: impl Into<String>,
    ) -> Result<String> {
        self.execute(Command::ScheduleMaintenance {
            site: site.into(),
            time: time.into(),
            reason: reason.into(),
        })
        .await
    }

    pub async fn report_problem(
        &self,
        site: impl Into<String>,
        issue: impl Into<String>,
    ) -> Result<String> {
        self.execute(Command::ReportProblem {
            site: site.into(),
            issue: issue.into(),
        })
        .await
    }

    pub async fn start_observation(&self, site: impl Into<String>, duration_hours: u32) -> Result<String> {
        self.execute(Command::StartObservation {
            site: site.into(),
            duration_hours,
        })
        .await
    }

    pub async fn clear_annotations(&self, site: impl Into<String>) -> Result<String> {
        self.execute(Command::ClearAnnotations { site: site.into() })
            .await
    }
}
