use lookout_core::{CommandService, PassDriver};
use lookout_probe::HeartbeatPresence;
use std::sync::Arc;

/// API 应用状态
#[derive(Clone)]
pub struct AppState {
    /// 运维命令服务
    pub commands: Arc<CommandService>,

    /// 检查驱动器，用于读取注册表和最近的报告
    pub driver: Arc<PassDriver>,

    /// 心跳在线状态来源
    pub presence: Arc<HeartbeatPresence>,
}

impl AppState {
    pub fn new(
        commands: Arc<CommandService>,
        driver: Arc<PassDriver>,
        presence: Arc<HeartbeatPresence>,
    ) -> Self {
        Self {
            commands,
            driver,
            presence,
        }
    }
}
