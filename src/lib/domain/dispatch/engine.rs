//! Dispatch engine

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use uuid::Uuid;

use crate::domain::communication::{Mailer, TransportError};
use crate::domain::dispatch::errors::DispatchError;
use crate::domain::dispatch::history::HistorySink;
use crate::domain::dispatch::job::{DispatchJob, DispatchOutcome};
use crate::domain::dispatch::progress::{ProgressEvent, ProgressSink};
use crate::domain::dispatch::record::DeliveryRecord;

/// Engine tuning, passed in explicitly at construction.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Wait between consecutive sends. Deliberate backpressure towards
    /// the transport, not an incidental delay.
    pub pacing: Duration,

    /// Upper bound on one send attempt; an elapsed timeout is recorded
    /// as that recipient's failure, never left pending.
    pub send_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pacing: Duration::from_secs(1),
            send_timeout: Duration::from_secs(30),
        }
    }
}

/// Drives a [`DispatchJob`] through its recipient list.
///
/// Strictly sequential per job: one recipient is contacted, fully
/// resolved, reported, and paced before the next begins, so progress is
/// monotonic and the reported order matches the input order. A transport
/// failure never stops the remaining recipients; only a configuration
/// error (checked before any send) aborts the job.
#[derive(Debug)]
pub struct DispatchEngine<M, H> {
    mailer: Arc<M>,
    history: Arc<H>,
    config: EngineConfig,
}

impl<M, H> Clone for DispatchEngine<M, H> {
    fn clone(&self) -> Self {
        Self {
            mailer: Arc::clone(&self.mailer),
            history: Arc::clone(&self.history),
            config: self.config.clone(),
        }
    }
}

impl<M, H> DispatchEngine<M, H>
where
    M: Mailer,
    H: HistorySink,
{
    /// Create an engine from its collaborators
    pub fn new(mailer: Arc<M>, history: Arc<H>, config: EngineConfig) -> Self {
        Self {
            mailer,
            history,
            config,
        }
    }

    /// Run a job to a terminal state on the current task.
    ///
    /// Long-running: UI-adjacent callers should prefer [`Self::spawn`],
    /// which keeps the calling context responsive. The cancellation
    /// signal is polled between recipients, never mid-send; a cancelled
    /// job still finalizes a (partial) [`DeliveryRecord`].
    ///
    /// # Arguments
    /// * `job` - The job to drive. Consumed; one pass per job instance.
    /// * `sink` - Receives one [`ProgressEvent`] per recipient.
    /// * `cancel` - Cancellation signal, `true` to stop issuing sends.
    ///
    /// # Returns
    /// A [`Result`] containing the finalized [`DeliveryRecord`], or a
    /// [`DispatchError`] when the job could not start at all.
    #[tracing::instrument(skip_all, fields(job_id = %job.id(), recipients = job.recipients().len()))]
    pub async fn run<S: ProgressSink>(
        &self,
        mut job: DispatchJob,
        sink: &S,
        cancel: watch::Receiver<bool>,
    ) -> Result<DeliveryRecord, DispatchError> {
        // Fail fast on configuration problems: zero sends attempted.
        job.transport().validate()?;

        if job.recipients().is_empty() {
            return Err(DispatchError::NoRecipients);
        }

        job.start(Utc::now());

        let recipients: Vec<_> = job.recipients().iter().cloned().collect();
        let total = recipients.len();
        let mut cancelled = false;

        for (index, recipient) in recipients.iter().enumerate() {
            if *cancel.borrow() {
                cancelled = true;
                tracing::info!(processed = index, total, "cancellation observed, stopping");
                break;
            }

            let rendered = job.message().render(recipient);
            let email = recipient.email().clone();

            let outcome = match time::timeout(
                self.config.send_timeout,
                self.mailer.send(&email, &rendered, job.transport()),
            )
            .await
            {
                Ok(Ok(())) => DispatchOutcome::Sent,
                Ok(Err(err)) => DispatchOutcome::Failed(err),
                Err(_) => DispatchOutcome::Failed(TransportError::Timeout),
            };

            match &outcome {
                DispatchOutcome::Sent => {
                    tracing::info!(recipient = %email, sent = index + 1, total, "message sent");
                }
                DispatchOutcome::Failed(reason) => {
                    tracing::warn!(recipient = %email, error = %reason, "send failed, continuing");
                }
            }

            job.record_outcome(email.as_str(), outcome.clone());

            sink.publish(ProgressEvent {
                index,
                total,
                recipient_email: email.as_str().to_string(),
                outcome,
                fraction_complete: (index + 1) as f64 / total as f64,
            })
            .await;

            // Pace before the next recipient so the transport's abuse
            // detection is never triggered by a burst.
            if index + 1 < total {
                time::sleep(self.config.pacing).await;
            }
        }

        let completed_at = Utc::now();
        job.finish(completed_at, cancelled);

        let record = DeliveryRecord::from_job(&job, completed_at);

        // The record is the caller's auditable result; a sink failure
        // must not drop it.
        if let Err(err) = self.history.append(&record).await {
            tracing::error!(error = %err, "failed to append delivery record to history");
        }

        tracing::info!(
            successful = record.successful_count,
            failed = record.failed_count,
            status = ?record.status,
            "dispatch finished"
        );

        Ok(record)
    }

    /// Run a job on a dedicated worker task.
    ///
    /// Returns immediately; progress reaches the sink asynchronously,
    /// so the caller's context stays responsive for the whole job.
    pub fn spawn<S: ProgressSink>(&self, job: DispatchJob, sink: S) -> DispatchHandle {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let engine = self.clone();
        let job_id = job.id();

        let worker = tokio::spawn(async move { engine.run(job, &sink, cancel_rx).await });

        DispatchHandle {
            job_id,
            canceller: DispatchCanceller {
                cancel: Arc::new(cancel_tx),
            },
            worker,
        }
    }
}

/// Cancellation trigger detached from the worker handle, so a signal
/// handler or UI action can cancel while another task awaits the record
#[derive(Clone, Debug)]
pub struct DispatchCanceller {
    cancel: Arc<watch::Sender<bool>>,
}

impl DispatchCanceller {
    /// Request cancellation.
    ///
    /// Observed between recipients: the in-flight send (if any) still
    /// resolves, and the job finalizes a partial record with the
    /// cancelled status.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }
}

/// Handle to a dispatch worker started with [`DispatchEngine::spawn`]
#[derive(Debug)]
pub struct DispatchHandle {
    job_id: Uuid,
    canceller: DispatchCanceller,
    worker: JoinHandle<Result<DeliveryRecord, DispatchError>>,
}

impl DispatchHandle {
    /// The identifier of the job this handle controls
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// A cancellation trigger usable independently of this handle
    pub fn canceller(&self) -> DispatchCanceller {
        self.canceller.clone()
    }

    /// Request cancellation; see [`DispatchCanceller::cancel`]
    pub fn cancel(&self) {
        self.canceller.cancel();
    }

    /// Wait for the worker and take the finalized record
    pub async fn wait(self) -> Result<DeliveryRecord, DispatchError> {
        self.worker
            .await
            .map_err(|err| DispatchError::Worker(err.into()))?
    }
}
