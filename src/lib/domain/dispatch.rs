//! Dispatch module: jobs, the engine that drives them, progress
//! reporting, and delivery records.

mod engine;
mod history;
mod job;
mod progress;
mod record;

pub mod errors;

pub use engine::{DispatchCanceller, DispatchEngine, DispatchHandle, EngineConfig};
pub use history::{HistoryError, HistorySink, InMemoryHistory};
pub use job::{DispatchJob, DispatchOutcome, JobState};
pub use progress::{ChannelSink, ProgressEvent, ProgressSink};
pub use record::{DeliveryFailure, DeliveryRecord, DeliveryStatus};
