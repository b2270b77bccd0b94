use crate::target::Target;
use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// 单次探测结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProbeOutcome {
    /// 对端在线
    Online,
    /// 对端离线或无法确认
    Offline,
    /// HTTP 可达
    Reachable { latency_ms: u64 },
    /// HTTP 不可达（超时、连接失败、非 2xx）
    Unreachable,
}

impl ProbeOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ProbeOutcome::Offline | ProbeOutcome::Unreachable)
    }
}

/// HTTP 可达性探测
#[async_trait]
pub trait HttpProber: Send + Sync {
    /// 请求地址，成功时返回耗时（毫秒）
    async fn probe(&self, url: &str) -> Result<u64>;
}

/// 对端在线状态来源
#[async_trait]
pub trait PresenceSource: Send + Sync {
    async fn is_peer_online(&self, peer_id: &str) -> Result<bool>;

    fn name(&self) -> &str;
}

/// 探测分发器
///
/// 按目标类别选择探测方式。任何探测错误都折叠为失败结果，不向上传播。
#[derive(Clone)]
pub struct ProbeDispatcher {
    http: Arc<dyn HttpProber>,
    presence: Arc<dyn PresenceSource>,
}

impl ProbeDispatcher {
    pub fn new(http: Arc<dyn HttpProber>, presence: Arc<dyn PresenceSource>) -> Self {
        Self { http, presence }
    }

    pub async fn probe(&self, target: &Target) -> ProbeOutcome {
        if target.category.is_presence_based() {
            return match self.presence.is_peer_online(&target.address).await {
                Ok(true) => ProbeOutcome::Online,
                Ok(false) => {
                    debug!(target = %target.name, "Peer is not online");
                    ProbeOutcome::Offline
                }
                Err(e) => {
                    warn!(
                        target = %target.name,
                        source = %self.presence.name(),
                        error = %e,
                        "Presence lookup failed"
                    );
                    ProbeOutcome::Offline
                }
            };
        }

        match self.http.probe(&target.address).await {
            Ok(latency_ms) => {
                debug!(target = %target.name, latency_ms, "Target is up");
                ProbeOutcome::Reachable { latency_ms }
            }
            Err(e) => {
                warn!(target = %target.name, error = %e, "Target is down");
                ProbeOutcome::Unreachable
            }
        }
    }

    /// 并发探测多个目标，结果顺序与输入一致
    pub async fn probe_all(&self, targets: &[&Target]) -> Vec<ProbeOutcome> {
        join_all(targets.iter().map(|t| self.probe(t))).await
    }
}
