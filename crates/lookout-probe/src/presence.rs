use crate::ProbeError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lookout_core::{Clock, PresenceSource, SystemClock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// 心跳在线状态
///
/// 对端（或其旁路进程）定期上报心跳，超时未上报即视为离线。
pub struct HeartbeatPresence {
    /// 对端最后心跳时间
    last_heartbeat: RwLock<HashMap<String, DateTime<Utc>>>,

    /// 超时时间
    timeout: Duration,

    clock: Arc<dyn Clock>,
}

impl HeartbeatPresence {
    pub fn new(timeout: Duration) -> Self {
        Self {
            last_heartbeat: RwLock::new(HashMap::new()),
            timeout,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 记录心跳
    pub async fn heartbeat(&self, peer_id: &str) -> crate::Result<DateTime<Utc>> {
        if peer_id.trim().is_empty() {
            return Err(ProbeError::InvalidPeer(peer_id.to_string()));
        }

        let now = self.clock.now();
        let previous = self
            .last_heartbeat
            .write()
            .await
            .insert(peer_id.to_string(), now);

        if previous.is_none() {
            debug!(peer_id = %peer_id, "First heartbeat from peer");
        }
        Ok(now)
    }

    pub async fn last_seen(&self, peer_id: &str) -> Option<DateTime<Utc>> {
        self.last_heartbeat.read().await.get(peer_id).copied()
    }
}

#[async_trait]
impl PresenceSource for HeartbeatPresence {
    async fn is_peer_online(&self, peer_id: &str) -> anyhow::Result<bool> {
        let Some(last) = self.last_seen(peer_id).await else {
            return Ok(false);
        };

        let elapsed = self.clock.now().signed_duration_since(last);
        Ok(elapsed.num_milliseconds() <= self.timeout.as_millis() as i64)
    }

    fn name(&self) -> &str {
        "heartbeat"
    }
}

/// 组合在线状态：任一来源报告在线即在线
///
/// 单个来源出错只记录日志，视为该来源未看到对端。
#[derive(Default)]
pub struct CompositePresence {
    sources: Vec<Arc<dyn PresenceSource>>,
}

impl CompositePresence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn PresenceSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl PresenceSource for CompositePresence {
    async fn is_peer_online(&self, peer_id: &str) -> anyhow::Result<bool> {
        for source in &self.sources {
            match source.is_peer_online(peer_id).await {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(e) => {
                    warn!(source = %source.name(), peer_id = %peer_id, error = %e, "Presence source failed");
                }
            }
        }
        Ok(false)
    }

    fn name(&self) -> &str {
        "composite"
    }
}
