use crate::driver::PassDriver;
use crate::{LookoutError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// 额外检查请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassRequest {
    pub reason: String,
}

/// 检查触发器，命令处理完成后通过它请求立即检查
#[derive(Debug, Clone)]
pub struct PassTrigger {
    tx: mpsc::UnboundedSender<PassRequest>,
}

impl PassTrigger {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PassRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// 请求一次检查，调度器已停止时返回 false
    pub fn request(&self, reason: impl Into<String>) -> bool {
        self.tx
            .send(PassRequest {
                reason: reason.into(),
            })
            .is_ok()
    }
}

/// 可取消的周期调度器
///
/// 启动后立即执行一次检查，之后按固定周期执行；收到触发请求时插入额外检查。
/// 检查进行期间积压的多个请求合并为一次。
pub struct PassScheduler {
    driver: Arc<PassDriver>,
    period: Duration,
}

impl PassScheduler {
    pub fn new(driver: Arc<PassDriver>, period: Duration) -> Self {
        Self { driver, period }
    }

    /// 启动调度任务
    pub fn spawn(self, mut requests: mpsc::UnboundedReceiver<PassRequest>) -> SchedulerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let driver = self.driver;
        let period = self.period;

        let join = tokio::spawn(async move {
            info!(period = ?period, "Pass scheduler started");
            driver.prepare().await;

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut requests_open = true;

            loop {
                tokio::select! {
                    biased;

                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {
                        debug!("Periodic pass");
                        driver.run_pass().await;
                    }
                    request = requests.recv(), if requests_open => match request {
                        Some(request) => {
                            let mut coalesced = 0usize;
                            while requests.try_recv().is_ok() {
                                coalesced += 1;
                            }
                            debug!(reason = %request.reason, coalesced, "Requested pass");
                            driver.run_pass().await;
                        }
                        None => requests_open = false,
                    },
                }
            }

            info!("Pass scheduler stopped");
        });

        SchedulerHandle { stop_tx, join }
    }
}

/// 调度器句柄
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// 停止调度器并等待当前检查结束
    pub async fn stop(self) -> Result<()> {
        let _ = self.stop_tx.send(true);
        self.join
            .await
            .map_err(|e| LookoutError::Scheduler(e.to_string()))
    }
}
