use crate::{LookoutError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// 计划维护
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceAnnotation {
    pub target: String,
    /// 维护时间，自由文本，仅用于展示
    pub scheduled_time: String,
    pub reason: String,
}

/// 问题报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemAnnotation {
    pub target: String,
    pub issue: String,
}

/// 观察期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationWindow {
    pub target: String,
    pub ends_at: DateTime<Utc>,
}

impl ObservationWindow {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.ends_at > now
    }

    /// 剩余小时数，向上取整
    pub fn hours_remaining(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.ends_at - now).num_milliseconds();
        if millis <= 0 {
            return 0;
        }
        (millis + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR
    }
}

/// 运维标注存储
///
/// 三类标注互相独立，同一目标可以同时出现在多个集合中。
/// 插入时不去重，查询取第一条匹配。
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    maintenance: Vec<MaintenanceAnnotation>,
    problems: Vec<ProblemAnnotation>,
    observations: Vec<ObservationWindow>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_maintenance(
        &mut self,
        target: impl Into<String>,
        scheduled_time: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.maintenance.push(MaintenanceAnnotation {
            target: target.into(),
            scheduled_time: scheduled_time.into(),
            reason: reason.into(),
        });
    }

    pub fn add_problem(&mut self, target: impl Into<String>, issue: impl Into<String>) {
        self.problems.push(ProblemAnnotation {
            target: target.into(),
            issue: issue.into(),
        });
    }

    /// 添加观察期，返回结束时间
    ///
    /// 结束时间超出可表示范围时返回错误，存储不变。
    pub fn add_observation(
        &mut self,
        target: impl Into<String>,
        duration_hours: u32,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        let ends_at = now
            .checked_add_signed(Duration::hours(i64::from(duration_hours)))
            .ok_or_else(|| {
                LookoutError::InvalidCommand(format!(
                    "observation of {} hours ends beyond the supported date range",
                    duration_hours
                ))
            })?;
        self.observations.push(ObservationWindow {
            target: target.into(),
            ends_at,
        });
        Ok(ends_at)
    }

    /// 删除目标的全部标注，返回删除条数
    pub fn remove_all(&mut self, target: &str) -> usize {
        let before = self.len();
        self.maintenance.retain(|m| m.target != target);
        self.problems.retain(|p| p.target != target);
        self.observations.retain(|o| o.target != target);
        before - self.len()
    }

    pub fn active_maintenance(&self, target: &str) -> Option<&MaintenanceAnnotation> {
        self.maintenance.iter().find(|m| m.target == target)
    }

    pub fn active_problem(&self, target: &str) -> Option<&ProblemAnnotation> {
        self.problems.iter().find(|p| p.target == target)
    }

    pub fn active_observation(&self, target: &str, now: DateTime<Utc>) -> Option<&ObservationWindow> {
        self.observations
            .iter()
            .find(|o| o.target == target && o.is_active(now))
    }

    /// 清理已过期的观察期
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.observations.len();
        self.observations.retain(|o| o.is_active(now));
        before - self.observations.len()
    }

    pub fn len(&self) -> usize {
        self.maintenance.len() + self.problems.len() + self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
