#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Command-line bulk dispatch

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use bulkmail::domain::communication::{Message, TransportConfig};
use bulkmail::domain::dispatch::{
    ChannelSink, DispatchEngine, DispatchJob, EngineConfig, InMemoryHistory,
};
use bulkmail::domain::recipients::{EmailAddress, EmailAddressError, Recipient, RecipientList};
use bulkmail::infrastructure::email::SmtpMailer;

/// SMTP transport settings
#[derive(Debug, Parser)]
pub struct TransportSettings {
    /// The sender email address
    #[clap(long, env = "SENDER_EMAIL")]
    pub sender_email: String,

    /// The sender's SMTP password or app password
    #[clap(long, env = "EMAIL_PASSWORD", hide_env_values = true)]
    pub email_password: String,

    /// The SMTP host
    #[clap(long, env = "SMTP_HOST")]
    pub smtp_host: String,

    /// The SMTP port
    #[clap(long, env = "SMTP_PORT", default_value = "587")]
    pub smtp_port: u16,

    /// Use implicit TLS (SMTPS)
    #[clap(long, env = "ENABLE_SSL", default_value = "false")]
    pub enable_ssl: bool,

    /// Upgrade the connection via STARTTLS; wins over `--enable-ssl`
    #[clap(long, env = "ENABLE_STARTTLS", default_value = "true")]
    pub enable_starttls: bool,
}

impl From<TransportSettings> for TransportConfig {
    fn from(settings: TransportSettings) -> Self {
        Self {
            sender_email: settings.sender_email,
            sender_secret: settings.email_password,
            host: settings.smtp_host,
            port: settings.smtp_port,
            use_ssl: settings.enable_ssl,
            use_starttls: settings.enable_starttls,
        }
    }
}

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The SMTP transport settings
    #[clap(flatten)]
    pub transport: TransportSettings,

    /// Recipient, repeatable: `"Name <user@example.com>"` or a bare email
    #[clap(long = "to", required = true)]
    pub to: Vec<String>,

    /// Subject line; `{name}`, `{email}`, and `{company}` are substituted
    #[clap(long)]
    pub subject: String,

    /// Message body; the same placeholders are substituted
    #[clap(long)]
    pub body: String,

    /// Treat the body as HTML
    #[clap(long, default_value = "false")]
    pub html: bool,

    /// Milliseconds to wait between consecutive sends
    #[clap(long, default_value = "1000")]
    pub pacing_ms: u64,

    /// Per-send timeout in seconds
    #[clap(long, default_value = "30")]
    pub send_timeout_secs: u64,
}

fn parse_recipient(raw: &str) -> Result<Recipient, EmailAddressError> {
    match (raw.find('<'), raw.rfind('>')) {
        (Some(open), Some(close)) if open < close => {
            let email = EmailAddress::new(&raw[open + 1..close])?;
            let name = raw[..open].trim();
            Ok(Recipient::new(
                (!name.is_empty()).then(|| name.to_string()),
                email,
            ))
        }
        _ => Ok(Recipient::new(None, EmailAddress::new(raw)?)),
    }
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; settings may come from flags or the
    // process environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // Invalid and duplicate entries are excluded here, before the
    // engine ever sees them.
    let mut recipients = RecipientList::new();
    for raw in &args.to {
        match parse_recipient(raw) {
            Ok(recipient) => {
                if !recipients.push(recipient) {
                    tracing::warn!(entry = %raw, "duplicate recipient skipped");
                }
            }
            Err(err) => {
                tracing::warn!(entry = %raw, error = %err, "invalid recipient skipped");
            }
        }
    }

    let message = if args.html {
        Message::html(&args.subject, &args.body)
    } else {
        Message::plain(&args.subject, &args.body)
    };

    let job = DispatchJob::new(recipients, message, args.transport.into());

    let engine = DispatchEngine::new(
        Arc::new(SmtpMailer::new()),
        Arc::new(InMemoryHistory::new()),
        EngineConfig {
            pacing: Duration::from_millis(args.pacing_ms),
            send_timeout: Duration::from_secs(args.send_timeout_secs),
        },
    );

    let (sink, mut progress) = ChannelSink::new();
    let handle = engine.spawn(job, sink);

    let printer = tokio::spawn(async move {
        while let Some(event) = progress.recv().await {
            tracing::info!(
                recipient = %event.recipient_email,
                outcome = ?event.outcome,
                "processed {} of {}",
                event.index + 1,
                event.total
            );
        }
    });

    let canceller = handle.canceller();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("cancellation requested, finishing the current send");
            canceller.cancel();
        }
    });

    let record = handle.wait().await?;

    printer.await?;

    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}
