use crate::signal::SignalHandler;
use anyhow::{Context, Result};
use axum::Router;
use lookout_api::{create_router, AppState};
use lookout_config::AppConfig;
use lookout_core::{
    Alerter, AnnotationStore, CommandService, PassDriver, PassRequest, PassScheduler, PassTrigger,
    ProbeDispatcher, Publisher,
};
use lookout_notify::{LogAlerter, LogPublisher, WebhookAlerter, WebhookPublisher};
use lookout_probe::{CompositePresence, HeartbeatPresence, HttpProbe};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::RwLock;
use tracing::info;

/// 组装完成的服务
pub struct Lookout {
    config: AppConfig,
    driver: Arc<PassDriver>,
    commands: Arc<CommandService>,
    presence: Arc<HeartbeatPresence>,
    requests: UnboundedReceiver<PassRequest>,
}

impl Lookout {
    /// 按配置组装各组件
    pub fn build(config: AppConfig) -> Result<Self> {
        let registry = Arc::new(config.registry().context("invalid target list")?);
        let annotations = Arc::new(RwLock::new(AnnotationStore::new()));

        let http = Arc::new(HttpProbe::new(config.monitor.probe_timeout())?);
        let presence = Arc::new(HeartbeatPresence::new(config.presence.heartbeat_timeout()));
        let sources = CompositePresence::new().with_source(presence.clone());
        let dispatcher = ProbeDispatcher::new(http, Arc::new(sources));

        let publisher: Arc<dyn Publisher> = match &config.publisher {
            Some(publisher) => Arc::new(WebhookPublisher::new(publisher.clone())?),
            None => Arc::new(LogPublisher),
        };
        let alerter: Arc<dyn Alerter> = match &config.alert {
            Some(alert) => Arc::new(WebhookAlerter::new(alert.webhook_url.clone(), alert.timeout())?),
            None => Arc::new(LogAlerter),
        };

        let driver = Arc::new(PassDriver::new(
            registry.clone(),
            annotations.clone(),
            dispatcher,
            publisher.clone(),
            alerter.clone(),
            config.recipient(),
        ));

        let (trigger, requests) = PassTrigger::channel();
        let commands = Arc::new(CommandService::new(registry.clone(), annotations, trigger));

        info!(
            targets = registry.len(),
            publisher = %publisher.name(),
            alerter = %alerter.name(),
            "Lookout assembled"
        );

        Ok(Self {
            config,
            driver,
            commands,
            presence,
            requests,
        })
    }

    pub fn driver(&self) -> &Arc<PassDriver> {
        &self.driver
    }

    pub fn router(&self) -> Router {
        create_router(AppState::new(
            self.commands.clone(),
            self.driver.clone(),
            self.presence.clone(),
        ))
    }

    /// 启动调度器和 API，直到收到关闭信号
    pub async fn run(self, signals: SignalHandler) -> Result<()> {
        let listener = TcpListener::bind(self.config.api.bind_address())
            .await
            .with_context(|| format!("failed to bind {}", self.config.api.bind_address()))?;
        self.serve(listener, signals).await
    }

    /// 在已绑定的监听器上运行
    pub async fn serve(self, listener: TcpListener, signals: SignalHandler) -> Result<()> {
        let router = self.router();
        let mut shutdown = signals.subscribe();

        let scheduler = PassScheduler::new(self.driver.clone(), self.config.monitor.interval())
            .spawn(self.requests);

        info!(address = %listener.local_addr()?, "Command API listening");
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        scheduler.stop().await?;
        info!("Lookout stopped");
        Ok(())
    }
}
