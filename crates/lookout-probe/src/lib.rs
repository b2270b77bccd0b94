pub mod error;
pub mod http;
pub mod presence;

pub use error::{ProbeError, Result};
pub use http::HttpProbe;
pub use presence::{CompositePresence, HeartbeatPresence};
