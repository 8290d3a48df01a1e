//! Transport error taxonomy

use lettre::address::AddressError;
use lettre::error::Error as LettreError;
use lettre::transport::smtp::Error as SmtpError;
use thiserror::Error;

/// An error local to a single send attempt.
///
/// These never abort a dispatch job; the engine captures them into the
/// failing recipient's outcome and continues. Payloads are plain strings
/// so outcomes stay cloneable and comparable for diagnostics.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The transport rejected the sender's credentials
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The SMTP session could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// The send did not complete within the per-send timeout
    #[error("send timed out")]
    Timeout,

    /// The transport refused this recipient
    #[error("recipient rejected: {0}")]
    RecipientRejected(String),

    /// Any other transport failure
    #[error("transport error: {0}")]
    Unknown(String),
}

impl From<SmtpError> for TransportError {
    fn from(err: SmtpError) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_permanent() {
            Self::RecipientRejected(err.to_string())
        } else if err.is_transient() {
            Self::Connect(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }
}

impl From<AddressError> for TransportError {
    fn from(err: AddressError) -> Self {
        Self::RecipientRejected(err.to_string())
    }
}

impl From<LettreError> for TransportError {
    fn from(err: LettreError) -> Self {
        Self::Unknown(err.to_string())
    }
}
