use crate::{LookoutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 目标类别，决定使用哪种探测方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// HTTP 站点
    Web,
    /// 对端机器人进程（通过在线状态判断）
    Bot,
    /// 游戏服务器（HTTP 地址）
    Minecraft,
}

impl Category {
    /// 是否通过对端在线状态探测
    pub fn is_presence_based(&self) -> bool {
        matches!(self, Category::Bot)
    }
}

/// 被监控的目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// 唯一名称
    pub name: String,

    /// 类别
    pub category: Category,

    /// URL 或对端 ID，含义取决于类别
    pub address: String,
}

impl Target {
    pub fn new(name: impl Into<String>, category: Category, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            address: address.into(),
        }
    }

    pub fn web(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(name, Category::Web, url)
    }

    pub fn bot(name: impl Into<String>, peer_id: impl Into<String>) -> Self {
        Self::new(name, Category::Bot, peer_id)
    }
}

/// 目标注册表
///
/// 进程启动时确定，之后只读。顺序即报告顺序。
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: Vec<Target>,
}

impl TargetRegistry {
    /// 创建注册表，拒绝空名称和重复名称
    pub fn new(targets: Vec<Target>) -> Result<Self> {
        let mut seen = HashSet::new();
        for target in &targets {
            if target.name.trim().is_empty() {
                return Err(LookoutError::invalid_target("target name must not be empty"));
            }
            if target.address.trim().is_empty() {
                return Err(LookoutError::invalid_target(format!(
                    "target {} has an empty address",
                    target.name
                )));
            }
            if !seen.insert(target.name.as_str()) {
                return Err(LookoutError::DuplicateTarget(target.name.clone()));
            }
        }

        Ok(Self { targets })
    }

    pub fn all(&self) -> &[Target] {
        &self.targets
    }

    pub fn find(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
