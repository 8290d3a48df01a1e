//! Dispatch job model

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::communication::{Message, TransportConfig, TransportError};
use crate::domain::recipients::RecipientList;

/// The lifecycle state of a [`DispatchJob`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    /// Created but not yet started
    Created,
    /// The engine is working through the recipient list
    Running,
    /// Every recipient has an outcome
    Completed,
    /// Stopped early by a cancellation signal
    Cancelled,
}

/// The outcome of one recipient's send attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The transport accepted the message
    Sent,
    /// The send failed; the reason is retained for diagnostics
    Failed(TransportError),
}

impl DispatchOutcome {
    /// Whether this outcome is a successful send
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// One logical "send this message to this recipient list" operation.
///
/// A job makes exactly one pass over its recipients; retrying failures
/// means building a new job from the failed subset. Outcomes accumulate
/// while the job runs and the job is immutable once terminal.
#[derive(Debug)]
pub struct DispatchJob {
    id: Uuid,
    recipients: RecipientList,
    message: Message,
    transport: TransportConfig,
    outcomes: HashMap<String, DispatchOutcome>,
    state: JobState,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl DispatchJob {
    /// Create a new job in the [`JobState::Created`] state
    pub fn new(recipients: RecipientList, message: Message, transport: TransportConfig) -> Self {
        Self {
            id: Uuid::now_v7(),
            recipients,
            message,
            transport,
            outcomes: HashMap::new(),
            state: JobState::Created,
            started_at: None,
            completed_at: None,
        }
    }

    /// The job's unique identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The recipient list, in dispatch order
    pub fn recipients(&self) -> &RecipientList {
        &self.recipients
    }

    /// The message template
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// The transport configuration. Read-only for the duration of the job.
    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// The job's lifecycle state
    pub fn state(&self) -> JobState {
        self.state
    }

    /// When the engine started the job
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When the job reached a terminal state
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// The outcome recorded for an email address, if processed yet
    pub fn outcome(&self, email: &str) -> Option<&DispatchOutcome> {
        self.outcomes.get(email)
    }

    /// How many recipients were successfully sent to so far
    pub fn successful_count(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_sent()).count()
    }

    /// How many recipients failed so far
    pub fn failed_count(&self) -> usize {
        self.outcomes.values().filter(|o| !o.is_sent()).count()
    }

    /// Whether the job is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, JobState::Completed | JobState::Cancelled)
    }

    pub(crate) fn start(&mut self, at: DateTime<Utc>) {
        self.state = JobState::Running;
        self.started_at = Some(at);
    }

    pub(crate) fn record_outcome(&mut self, email: &str, outcome: DispatchOutcome) {
        self.outcomes.insert(email.to_string(), outcome);
    }

    pub(crate) fn finish(&mut self, at: DateTime<Utc>, cancelled: bool) {
        self.state = if cancelled {
            JobState::Cancelled
        } else {
            JobState::Completed
        };
        self.completed_at = Some(at);
    }
}
