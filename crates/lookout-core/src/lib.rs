pub mod annotation;
pub mod clock;
pub mod command;
pub mod driver;
pub mod error;
pub mod gate;
pub mod notifier;
pub mod probe;
pub mod report;
pub mod scheduler;
pub mod status;
pub mod target;

pub use annotation::{AnnotationStore, MaintenanceAnnotation, ObservationWindow, ProblemAnnotation};
pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{Command, CommandService};
pub use driver::PassDriver;
pub use error::{LookoutError, Result};
pub use gate::{GateTransition, NotificationGate};
pub use notifier::{offline_alert, Alerter, Publisher};
pub use probe::{HttpProber, PresenceSource, ProbeDispatcher, ProbeOutcome};
pub use report::{render_line, Report, ReportEntry, PENDING_DESCRIPTION};
pub use scheduler::{PassRequest, PassScheduler, PassTrigger, SchedulerHandle};
pub use status::{probe_state, resolve, resolve_annotation, DisplayState};
pub use target::{Category, Target, TargetRegistry};
