use crate::status::DisplayState;
use std::collections::HashSet;

/// 通知门状态转换
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    /// 新进入失败状态，需要发送一次告警
    Alert,
    /// 从失败中恢复，静默清除
    Cleared,
    /// 无变化
    Unchanged,
}

/// 通知门
///
/// 每个目标在一次连续故障期间最多告警一次。状态只保存在内存中，进程重启后丢失。
#[derive(Debug, Default)]
pub struct NotificationGate {
    notified: HashSet<String>,
}

impl NotificationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录目标本次的状态，返回状态转换
    ///
    /// 返回 `Alert` 时目标已被标记为已通知，无论告警最终是否送达。
    pub fn observe(&mut self, target: &str, state: &DisplayState) -> GateTransition {
        if state.is_failure() {
            if self.notified.insert(target.to_string()) {
                GateTransition::Alert
            } else {
                GateTransition::Unchanged
            }
        } else if self.notified.remove(target) {
            GateTransition::Cleared
        } else {
            GateTransition::Unchanged
        }
    }

    pub fn is_notified(&self, target: &str) -> bool {
        self.notified.contains(target)
    }

    pub fn notified_count(&self) -> usize {
        self.notified.len()
    }
}
