pub mod app;
pub mod loader;

pub use app::{ApiConfig, AppConfig, LogFormat, LoggingConfig, MonitorConfig, PresenceConfig};
pub use loader::ConfigLoader;
