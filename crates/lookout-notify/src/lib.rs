pub mod alerter;
pub mod embed;
pub mod error;
pub mod log;
pub mod publisher;

pub use alerter::{AlertConfig, WebhookAlerter};
pub use embed::{EmbedColor, StatusEmbed};
pub use error::{NotifyError, Result};
pub use log::{LogAlerter, LogPublisher};
pub use publisher::{PublisherConfig, WebhookPublisher};

#[cfg(test)]
pub(crate) mod testing;
