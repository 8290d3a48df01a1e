//! Dispatch errors

use thiserror::Error;

use crate::domain::communication::ConfigurationError;

/// An error that aborts a dispatch before or outside the send loop.
///
/// Per-recipient transport failures are not represented here: they are
/// captured into the job's outcome map and never alter control flow.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The transport configuration cannot support a dispatch. Raised
    /// before any recipient is contacted.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The job has no recipients
    #[error("dispatch job has no recipients")]
    NoRecipients,

    /// The dispatch worker task failed to complete
    #[error("dispatch worker failed")]
    Worker(#[source] anyhow::Error),
}
