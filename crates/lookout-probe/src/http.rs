use crate::{ProbeError, Result};
use async_trait::async_trait;
use lookout_core::HttpProber;
use std::time::{Duration, Instant};
use tracing::debug;

/// 基于 reqwest 的 HTTP 可达性探测
///
/// 每次请求都有超时上限；超时、连接失败和非 2xx 响应一律视为不可达，不在内部重试。
pub struct HttpProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lookout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 请求一次地址，返回耗时
    pub async fn check(&self, url: &str) -> Result<Duration> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let elapsed = start.elapsed();

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        debug!(url = %url, status = %status, elapsed = ?elapsed, "HTTP probe succeeded");
        Ok(elapsed)
    }
}

#[async_trait]
impl HttpProber for HttpProbe {
    async fn probe(&self, url: &str) -> anyhow::Result<u64> {
        let elapsed = self.check(url).await?;
        Ok(elapsed.as_millis() as u64)
    }
}
