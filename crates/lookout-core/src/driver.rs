use crate::annotation::AnnotationStore;
use crate::clock::{Clock, SystemClock};
use crate::gate::{GateTransition, NotificationGate};
use crate::notifier::{offline_alert, Alerter, Publisher};
use crate::probe::ProbeDispatcher;
use crate::report::{Report, ReportEntry};
use crate::status::{probe_state, resolve_annotation, DisplayState};
use crate::target::TargetRegistry;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

/// 检查驱动器
///
/// 一次检查：清理过期观察期、解析每个目标、更新通知门、发布报告。
/// 通知门的锁在整个检查期间持有，因此同一时刻最多只有一次检查在运行。
pub struct PassDriver {
    registry: Arc<TargetRegistry>,
    annotations: Arc<RwLock<AnnotationStore>>,
    gate: Mutex<NotificationGate>,
    dispatcher: ProbeDispatcher,
    publisher: Arc<dyn Publisher>,
    alerter: Arc<dyn Alerter>,
    recipient: String,
    clock: Arc<dyn Clock>,
    last_report: RwLock<Option<Report>>,
}

impl PassDriver {
    pub fn new(
        registry: Arc<TargetRegistry>,
        annotations: Arc<RwLock<AnnotationStore>>,
        dispatcher: ProbeDispatcher,
        publisher: Arc<dyn Publisher>,
        alerter: Arc<dyn Alerter>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            annotations,
            gate: Mutex::new(NotificationGate::new()),
            dispatcher,
            publisher,
            alerter,
            recipient: recipient.into(),
            clock: Arc::new(SystemClock),
            last_report: RwLock::new(None),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &Arc<TargetRegistry> {
        &self.registry
    }

    pub fn annotations(&self) -> &Arc<RwLock<AnnotationStore>> {
        &self.annotations
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// 最近一次检查的报告
    pub async fn last_report(&self) -> Option<Report> {
        self.last_report.read().await.clone()
    }

    /// 目标当前是否处于已告警状态
    pub async fn is_notified(&self, target: &str) -> bool {
        self.gate.lock().await.is_notified(target)
    }

    /// 准备发布者（放置占位消息），失败只记录日志
    pub async fn prepare(&self) {
        if let Err(e) = self.publisher.prepare().await {
            error!(publisher = %self.publisher.name(), error = %e, "Failed to prepare status message");
        }
    }

    /// 执行一次完整检查
    pub async fn run_pass(&self) -> Report {
        let mut gate = self.gate.lock().await;
        let now = self.clock.now();
        let targets = self.registry.all();

        // 先读标注快照，探测期间不持有锁
        let annotated: Vec<Option<DisplayState>> = {
            let mut store = self.annotations.write().await;
            let purged = store.purge_expired(now);
            if purged > 0 {
                debug!(purged, "Expired observation windows removed");
            }
            targets
                .iter()
                .map(|t| resolve_annotation(t, &store, now))
                .collect()
        };

        let states = join_all(targets.iter().zip(annotated).map(|(target, annotated)| async move {
            match annotated {
                Some(state) => state,
                None => probe_state(target, self.dispatcher.probe(target).await),
            }
        }))
        .await;

        let mut entries = Vec::with_capacity(targets.len());
        for (target, state) in targets.iter().zip(states) {
            match gate.observe(&target.name, &state) {
                GateTransition::Alert => self.send_alert(&target.name).await,
                GateTransition::Cleared => {
                    info!(target = %target.name, state = ?state, "Target recovered");
                }
                GateTransition::Unchanged => {}
            }
            entries.push(ReportEntry {
                target: target.clone(),
                state,
            });
        }
        drop(gate);

        let report = Report::new(now, entries);
        info!(
            targets = report.len(),
            failures = report.failure_count(),
            "Status pass completed"
        );

        *self.last_report.write().await = Some(report.clone());

        if let Err(e) = self.publisher.publish(&report).await {
            error!(publisher = %self.publisher.name(), error = %e, "Failed to publish status report");
        }

        report
    }

    async fn send_alert(&self, target: &str) {
        warn!(target = %target, recipient = %self.recipient, "Target went down, alerting");
        let message = offline_alert(target);
        if let Err(e) = self.alerter.alert(&self.recipient, &message).await {
            error!(
                target = %target,
                alerter = %self.alerter.name(),
                error = %e,
                "Failed to deliver alert"
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    pub struct RecordingPublisher {
        pub reports: StdMutex<Vec<Report>>,
        pub prepared: AtomicBool,
        pub fail: AtomicBool,
    }

    impl RecordingPublisher {
        pub fn count(&self) -> usize {
            self.reports.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Publisher for RecordingPublisher {
        async fn prepare(&self) -> anyhow::Result<()> {
            self.prepared.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn publish(&self, report: &Report) -> anyhow::Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("message channel unavailable");
            }
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[derive(Default)]
    pub struct RecordingAlerter {
        pub sent: StdMutex<Vec<(String, String)>>,
        pub fail: AtomicBool,
    }

    impl RecordingAlerter {
        pub fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Alerter for RecordingAlerter {
        async fn alert(&self, recipient: &str, message: &str) -> anyhow::Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((recipient.to_string(), message.to_string()));
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("recipient unreachable");
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }
}
