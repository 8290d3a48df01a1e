//! Message template and per-recipient rendering

use crate::domain::recipients::Recipient;

/// Fallback for `{name}` when the recipient has no name
const NAME_FALLBACK: &str = "Valued Customer";

/// Fallback for `{company}` when the recipient has no company
const COMPANY_FALLBACK: &str = "your organization";

/// A message template to dispatch to a recipient list.
///
/// Subject and body may contain the placeholders `{name}`, `{email}`,
/// and `{company}`; anything else in braces is left verbatim.
#[derive(Clone, Debug)]
pub struct Message {
    /// The subject line
    pub subject: String,

    /// The message body
    pub body: String,

    /// Whether the body is HTML rather than plain text
    pub is_html: bool,
}

impl Message {
    /// Create a plain text message
    pub fn plain(subject: &str, body: &str) -> Self {
        Self {
            subject: subject.to_string(),
            body: body.to_string(),
            is_html: false,
        }
    }

    /// Create an HTML message
    pub fn html(subject: &str, body: &str) -> Self {
        Self {
            subject: subject.to_string(),
            body: body.to_string(),
            is_html: true,
        }
    }

    /// Render the template for one recipient.
    ///
    /// Pure: the template itself is never mutated. Rendering output that
    /// contains no further placeholders is a fixed point, so rendering
    /// twice yields the same result.
    pub fn render(&self, recipient: &Recipient) -> RenderedMessage {
        RenderedMessage {
            subject: substitute(&self.subject, recipient),
            body: substitute(&self.body, recipient),
            is_html: self.is_html,
        }
    }
}

/// A message personalized for a single recipient
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedMessage {
    /// The rendered subject line
    pub subject: String,

    /// The rendered body
    pub body: String,

    /// Whether the body is HTML rather than plain text
    pub is_html: bool,
}

fn substitute(text: &str, recipient: &Recipient) -> String {
    text.replace("{name}", recipient.name().unwrap_or(NAME_FALLBACK))
        .replace("{email}", recipient.email().as_str())
        .replace("{company}", recipient.company().unwrap_or(COMPANY_FALLBACK))
}
