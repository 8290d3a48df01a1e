//! Progress reporting

use async_trait::async_trait;
use tokio::sync::mpsc;

#[cfg(test)]
use mockall::mock;

use crate::domain::dispatch::job::DispatchOutcome;

/// One per-recipient progress update.
///
/// The engine publishes exactly one event per recipient, in dispatch
/// order, immediately after the recipient's outcome is recorded.
#[derive(Clone, Debug)]
pub struct ProgressEvent {
    /// Zero-based position of the recipient in the dispatch order
    pub index: usize,

    /// Total number of recipients in the job
    pub total: usize,

    /// The recipient this event is about
    pub recipient_email: String,

    /// The recipient's outcome
    pub outcome: DispatchOutcome,

    /// Fraction of the job finished so far, in `(0, 1]`
    pub fraction_complete: f64,
}

/// Caller-supplied consumer of progress events.
///
/// The engine is thread- and UI-agnostic: whoever owns the observing
/// context (a UI loop, a logger, a test) decides what publishing means.
#[async_trait]
pub trait ProgressSink: Send + Sync + 'static {
    /// Publish one progress event
    async fn publish(&self, event: ProgressEvent);
}

#[cfg(test)]
mock! {
    pub ProgressSink {}

    #[async_trait]
    impl ProgressSink for ProgressSink {
        async fn publish(&self, event: ProgressEvent);
    }
}

/// A [`ProgressSink`] that forwards events over an unbounded channel,
/// decoupling the dispatch worker from the observer's context.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiving half for the observer
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ProgressSink for ChannelSink {
    async fn publish(&self, event: ProgressEvent) {
        // A dropped receiver means the observer went away; the job
        // still runs to completion.
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_delivers_events_in_order() {
        let (sink, mut rx) = ChannelSink::new();

        for index in 0..3 {
            sink.publish(ProgressEvent {
                index,
                total: 3,
                recipient_email: format!("r{index}@x.com"),
                outcome: DispatchOutcome::Sent,
                fraction_complete: (index + 1) as f64 / 3.0,
            })
            .await;
        }

        for index in 0..3 {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.index, index);
            assert_eq!(event.recipient_email, format!("r{index}@x.com"));
        }
    }

    #[tokio::test]
    async fn test_publish_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);

        sink.publish(ProgressEvent {
            index: 0,
            total: 1,
            recipient_email: "ann@x.com".into(),
            outcome: DispatchOutcome::Sent,
            fraction_complete: 1.0,
        })
        .await;
    }
}
