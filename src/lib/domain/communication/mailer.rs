//! Mail transport capability

mod config;
mod errors;
mod message;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::recipients::EmailAddress;

pub use config::{ConfigurationError, TlsMode, TransportConfig};
pub use errors::TransportError;
pub use message::{Message, RenderedMessage};

/// Mail sending capability.
///
/// The engine depends on the transport only through this operation; the
/// actual SMTP session (host, port, TLS) is the implementation's concern.
/// Credentials always travel in the [`TransportConfig`] argument; there
/// is no ambient or environment-based credential path.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send one rendered message to one recipient
    ///
    /// # Arguments
    /// * `to` - The [`EmailAddress`] to send the message to.
    /// * `message` - The rendered, per-recipient subject and body.
    /// * `config` - The [`TransportConfig`] for the SMTP session.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] when the transport accepted the
    /// message, or an [`Err`] containing the [`TransportError`].
    async fn send(
        &self,
        to: &EmailAddress,
        message: &RenderedMessage,
        config: &TransportConfig,
    ) -> Result<(), TransportError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    #[async_trait]
    impl Mailer for Mailer {
        async fn send(
            &self,
            to: &EmailAddress,
            message: &RenderedMessage,
            config: &TransportConfig,
        ) -> Result<(), TransportError>;
    }
}
