//! Delivery history sink

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

#[cfg(test)]
use mockall::mock;

use crate::domain::dispatch::record::DeliveryRecord;

/// An error that can occur while appending to the history store
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The underlying store rejected the append
    #[error("failed to persist delivery record")]
    Storage(#[source] anyhow::Error),
}

/// Append-only store of delivery records.
///
/// The engine calls [`HistorySink::append`] exactly once per finished
/// job; querying and filtering history is the presentation layer's
/// concern. Implementations shared across concurrent jobs must
/// serialize appends.
#[async_trait]
pub trait HistorySink: Send + Sync + 'static {
    /// Append one completed delivery record
    async fn append(&self, record: &DeliveryRecord) -> Result<(), HistoryError>;
}

#[cfg(test)]
mock! {
    pub HistorySink {}

    #[async_trait]
    impl HistorySink for HistorySink {
        async fn append(&self, record: &DeliveryRecord) -> Result<(), HistoryError>;
    }
}

/// In-process history store. The mutex gives appends the single-writer
/// discipline required when jobs run concurrently.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    records: Mutex<Vec<DeliveryRecord>>,
}

impl InMemoryHistory {
    /// Create an empty history store
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of all appended records, oldest first
    pub async fn records(&self) -> Vec<DeliveryRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl HistorySink for InMemoryHistory {
    async fn append(&self, record: &DeliveryRecord) -> Result<(), HistoryError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::domain::dispatch::record::DeliveryStatus;

    use super::*;

    fn record(subject: &str) -> DeliveryRecord {
        DeliveryRecord {
            id: Uuid::now_v7(),
            subject: subject.into(),
            recipient_emails: vec!["ann@x.com".into()],
            sender_email: "sender@example.com".into(),
            status: DeliveryStatus::Delivered,
            sent_at: Utc::now(),
            delivered_at: Some(Utc::now()),
            successful_count: 1,
            failed_count: 0,
            failures: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_appends_are_kept_in_order() {
        let history = InMemoryHistory::new();

        history.append(&record("first")).await.unwrap();
        history.append(&record("second")).await.unwrap();

        let records = history.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].subject, "first");
        assert_eq!(records[1].subject, "second");
    }
}
