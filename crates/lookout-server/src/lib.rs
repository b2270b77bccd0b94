pub mod app;
pub mod logging;
pub mod signal;

pub use app::Lookout;
pub use logging::init_logging;
pub use signal::{ShutdownSignal, SignalHandler};
