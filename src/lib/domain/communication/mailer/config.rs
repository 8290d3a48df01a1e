//! SMTP transport configuration

use thiserror::Error;

/// An error raised when the transport configuration cannot support a
/// dispatch. Fatal to the whole job: no recipient is contacted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No sender email address is configured
    #[error("sender email is not configured")]
    MissingSenderEmail,

    /// No sender credential is configured
    #[error("sender credential is not configured")]
    MissingSenderSecret,

    /// No SMTP host is configured
    #[error("SMTP host is not configured")]
    MissingHost,
}

/// How the SMTP session negotiates TLS
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TlsMode {
    /// Plain connection, no TLS
    None,
    /// Implicit TLS from the first byte (SMTPS)
    Wrapper,
    /// Plain connection upgraded via STARTTLS
    StartTls,
}

/// SMTP transport configuration for one dispatch job.
///
/// Owned by the job and read-only while it runs.
#[derive(Clone, Debug, Default)]
pub struct TransportConfig {
    /// The sender ("from") email address
    pub sender_email: String,

    /// The sender's SMTP credential
    pub sender_secret: String,

    /// The SMTP host
    pub host: String,

    /// The SMTP port
    pub port: u16,

    /// Use implicit TLS (SMTPS)
    pub use_ssl: bool,

    /// Upgrade the connection via STARTTLS
    pub use_starttls: bool,
}

impl TransportConfig {
    /// The effective TLS mode.
    ///
    /// STARTTLS takes precedence when both `use_ssl` and `use_starttls`
    /// are set; setting both is not a validation error.
    pub fn tls_mode(&self) -> TlsMode {
        if self.use_starttls {
            TlsMode::StartTls
        } else if self.use_ssl {
            TlsMode::Wrapper
        } else {
            TlsMode::None
        }
    }

    /// Check that the configuration can support a dispatch
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] when sender email, credential, and
    /// host are all present, or an [`Err`] containing the first
    /// [`ConfigurationError`] found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.sender_email.trim().is_empty() {
            return Err(ConfigurationError::MissingSenderEmail);
        }

        if self.sender_secret.trim().is_empty() {
            return Err(ConfigurationError::MissingSenderSecret);
        }

        if self.host.trim().is_empty() {
            return Err(ConfigurationError::MissingHost);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
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
    fn test_valid_config_passes_validation() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_missing_sender_email_fails_validation() {
        let mut config = config();
        config.sender_email = "  ".into();

        assert_eq!(
            config.validate(),
            Err(ConfigurationError::MissingSenderEmail)
        );
    }

    #[test]
    fn test_missing_secret_fails_validation() {
        let mut config = config();
        config.sender_secret = String::new();

        assert_eq!(
            config.validate(),
            Err(ConfigurationError::MissingSenderSecret)
        );
    }

    #[test]
    fn test_missing_host_fails_validation() {
        let mut config = config();
        config.host = String::new();

        assert_eq!(config.validate(), Err(ConfigurationError::MissingHost));
    }

    #[test]
    fn test_starttls_wins_when_both_tls_flags_are_set() {
        let mut config = config();
        config.use_ssl = true;
        config.use_starttls = true;

        assert_eq!(config.tls_mode(), TlsMode::StartTls);
    }

    #[test]
    fn test_ssl_alone_selects_wrapper_mode() {
        let mut config = config();
        config.use_ssl = true;
        config.use_starttls = false;

        assert_eq!(config.tls_mode(), TlsMode::Wrapper);
    }

    #[test]
    fn test_no_tls_flags_selects_plain_mode() {
        let mut config = config();
        config.use_ssl = false;
        config.use_starttls = false;

        assert_eq!(config.tls_mode(), TlsMode::None);
    }
}
