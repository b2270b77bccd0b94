use crate::annotation::AnnotationStore;
use crate::probe::ProbeOutcome;
use crate::target::Target;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 单个目标在一次检查中的展示状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayState {
    /// 计划维护
    Maintenance { time: String, reason: String },
    /// 已报告问题
    Problem { issue: String },
    /// 观察期内
    Observing { hours_remaining: i64 },
    /// 机器人在线
    Online,
    /// 机器人离线
    Offline,
    /// 站点可达
    Up { latency_ms: u64 },
    /// 站点不可达
    Down,
}

impl DisplayState {
    /// 是否为需要告警的失败状态
    pub fn is_failure(&self) -> bool {
        matches!(self, DisplayState::Offline | DisplayState::Down)
    }
}

/// 只按标注解析：维护 > 问题 > 观察期
pub fn resolve_annotation(
    target: &Target,
    store: &AnnotationStore,
    now: DateTime<Utc>,
) -> Option<DisplayState> {
    if let Some(m) = store.active_maintenance(&target.name) {
        return Some(DisplayState::Maintenance {
            time: m.scheduled_time.clone(),
            reason: m.reason.clone(),
        });
    }

    if let Some(p) = store.active_problem(&target.name) {
        return Some(DisplayState::Problem {
            issue: p.issue.clone(),
        });
    }

    store
        .active_observation(&target.name, now)
        .map(|o| DisplayState::Observing {
            hours_remaining: o.hours_remaining(now),
        })
}

/// 由探测结果推导状态
pub fn probe_state(target: &Target, probe: ProbeOutcome) -> DisplayState {
    if target.category.is_presence_based() {
        return if probe.is_failure() {
            DisplayState::Offline
        } else {
            DisplayState::Online
        };
    }

    match probe {
        ProbeOutcome::Reachable { latency_ms } => DisplayState::Up { latency_ms },
        ProbeOutcome::Online => DisplayState::Up { latency_ms: 0 },
        ProbeOutcome::Offline | ProbeOutcome::Unreachable => DisplayState::Down,
    }
}

/// 计算目标的展示状态，人工标注总是覆盖自动探测
pub fn resolve(
    target: &Target,
    store: &AnnotationStore,
    probe: ProbeOutcome,
    now: DateTime<Utc>,
) -> DisplayState {
    resolve_annotation(target, store, now).unwrap_or_else(|| probe_state(target, probe))
}
