pub mod events;
pub mod installer;
pub mod stage;

pub use events::{AlertLevel, EventSink, FnSink, InstallEvent, NullSink};
pub use installer::InstallationPipeline;
pub use stage::{InstallReport, PipelineState, Stage, StageFailure};
