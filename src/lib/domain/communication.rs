//! Mail transport module

pub mod mailer;

pub use mailer::{
    ConfigurationError, Mailer, Message, RenderedMessage, TlsMode, TransportConfig,
    TransportError,
};

#[cfg(test)]
pub mod tests {
    pub use super::mailer::MockMailer;
}
