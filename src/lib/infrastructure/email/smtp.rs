//! SMTP mail transport implementation

use async_trait::async_trait;
use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::communication::{
    Mailer, RenderedMessage, TlsMode, TransportConfig, TransportError,
};
use crate::domain::recipients::EmailAddress;

/// SMTP mailer backed by lettre's async transport.
///
/// Stateless: every send builds its session from the job's
/// [`TransportConfig`], so concurrent jobs with different transports
/// can share one mailer.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmtpMailer;

impl SmtpMailer {
    /// Create a new SMTP mailer
    pub fn new() -> Self {
        Self
    }

    fn transport(
        &self,
        config: &TransportConfig,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, TransportError> {
        let credentials = Credentials::new(
            config.sender_email.clone(),
            config.sender_secret.clone(),
        );

        let builder = match config.tls_mode() {
            TlsMode::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            }
            TlsMode::Wrapper => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };

        Ok(builder.credentials(credentials).port(config.port).build())
    }

    fn build_message(
        to: &EmailAddress,
        message: &RenderedMessage,
        config: &TransportConfig,
    ) -> Result<Message, TransportError> {
        let from: Mailbox = config
            .sender_email
            .parse()
            .map_err(|err: lettre::address::AddressError| TransportError::Unknown(err.to_string()))?;

        let builder = Message::builder()
            .from(from)
            .to(to.as_str().parse::<Mailbox>()?)
            .subject(message.subject.clone());

        let email = if message.is_html {
            builder.singlepart(SinglePart::html(message.body.clone()))?
        } else {
            builder.singlepart(SinglePart::plain(message.body.clone()))?
        };

        Ok(email)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        to: &EmailAddress,
        message: &RenderedMessage,
        config: &TransportConfig,
    ) -> Result<(), TransportError> {
        let email = Self::build_message(to, message, config)?;

        self.transport(config)?.send(email).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn config() -> TransportConfig {
        TransportConfig {
            sender_email: "sender@example.com".into(),
            sender_secret: "app-password".into(),
            host: "smtp.example.com".into(),
            port: 587,
            use_ssl: false,
            use_starttls: true,
        }
    }

    #[test]
    fn test_html_message_carries_html_content_type() -> TestResult {
        let rendered = RenderedMessage {
            subject: "Hi Ann".into(),
            body: "<p>Hello</p>".into(),
            is_html: true,
        };

        let email = SmtpMailer::build_message(
            &EmailAddress::new("ann@x.com")?,
            &rendered,
            &config(),
        )?;

        let formatted = String::from_utf8(email.formatted())?;
        assert!(formatted.contains("text/html"));
        assert!(formatted.contains("Hi Ann"));

        Ok(())
    }

    #[test]
    fn test_plain_message_carries_plain_content_type() -> TestResult {
        let rendered = RenderedMessage {
            subject: "Hi Ann".into(),
            body: "Hello".into(),
            is_html: false,
        };

        let email = SmtpMailer::build_message(
            &EmailAddress::new("ann@x.com")?,
            &rendered,
            &config(),
        )?;

        let formatted = String::from_utf8(email.formatted())?;
        assert!(formatted.contains("text/plain"));

        Ok(())
    }

    #[test]
    fn test_malformed_sender_address_is_rejected() {
        let rendered = RenderedMessage {
            subject: "Hi".into(),
            body: "Hello".into(),
            is_html: false,
        };

        let mut config = config();
        config.sender_email = "not an address".into();

        let result = SmtpMailer::build_message(
            &EmailAddress::new_unchecked("ann@x.com"),
            &rendered,
            &config,
        );

        assert!(matches!(result, Err(TransportError::Unknown(_))));
    }
}
