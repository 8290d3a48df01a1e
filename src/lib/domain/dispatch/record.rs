//! Delivery record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::dispatch::job::{DispatchJob, DispatchOutcome, JobState};

/// The terminal status of a delivery
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    /// Composed but never dispatched
    Draft,
    /// Handed to the transport, delivery unknown
    Sent,
    /// At least one recipient was successfully sent to
    Delivered,
    /// No recipient was successfully sent to
    Failed,
    /// Rejected after acceptance
    Bounced,
    /// The job was cancelled before completing its recipient list
    Cancelled,
}

/// One recipient's failure, retained for diagnostics
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFailure {
    /// The recipient that failed
    pub email: String,

    /// Why the send failed
    pub reason: String,
}

/// The immutable summary of a finished [`DispatchJob`].
///
/// Built exactly once, when the job reaches a terminal state, and then
/// handed to the history sink. Serializable because the history
/// collaborator persists records as JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// Unique identifier of the record
    pub id: Uuid,

    /// The subject line of the dispatched message template
    pub subject: String,

    /// Recipient emails in dispatch order
    pub recipient_emails: Vec<String>,

    /// The sender address the job was configured with
    pub sender_email: String,

    /// The terminal status of the job
    pub status: DeliveryStatus,

    /// When the job started sending
    pub sent_at: DateTime<Utc>,

    /// When the job completed, only set when `status` is
    /// [`DeliveryStatus::Delivered`]
    pub delivered_at: Option<DateTime<Utc>>,

    /// How many recipients were successfully sent to
    pub successful_count: usize,

    /// How many recipients failed
    pub failed_count: usize,

    /// Per-recipient failure reasons
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryRecord {
    /// Build the record for a terminal job
    pub(crate) fn from_job(job: &DispatchJob, completed_at: DateTime<Utc>) -> Self {
        let successful_count = job.successful_count();

        let status = if job.state() == JobState::Cancelled {
            DeliveryStatus::Cancelled
        } else if successful_count > 0 {
            DeliveryStatus::Delivered
        } else {
            DeliveryStatus::Failed
        };

        let recipient_emails = job.recipients().emails();
        let failures = recipient_emails
            .iter()
            .filter_map(|email| match job.outcome(email) {
                Some(DispatchOutcome::Failed(reason)) => Some(DeliveryFailure {
                    email: email.clone(),
                    reason: reason.to_string(),
                }),
                _ => None,
            })
            .collect();

        Self {
            id: job.id(),
            subject: job.message().subject.clone(),
            recipient_emails,
            sender_email: job.transport().sender_email.clone(),
            status,
            sent_at: job.started_at().unwrap_or(completed_at),
            delivered_at: (status == DeliveryStatus::Delivered).then_some(completed_at),
            successful_count,
            failed_count: job.failed_count(),
            failures,
        }
    }

    /// The total number of recipients in the job
    pub fn total_recipients(&self) -> usize {
        self.recipient_emails.len()
    }

    /// The percentage of recipients successfully sent to, 0.0 for an
    /// empty recipient list
    pub fn success_rate(&self) -> f64 {
        let total = self.total_recipients();
        if total == 0 {
            return 0.0;
        }

        self.successful_count as f64 / total as f64 * 100.0
    }
}
