//! In-memory implementation of the `EventRepository` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use roundkeeper_core::error::DomainError;
use roundkeeper_core::repository::{EventRepository, StoredEvent};

/// Event repository holding every aggregate stream in process memory.
///
/// Streams are append-only. An append is accepted only when
/// `expected_version` equals the stream's current length, which gives the
/// same optimistic concurrency guarantee as a unique
/// `(aggregate_id, sequence_number)` constraint.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    streams: RwLock<HashMap<Uuid, Vec<StoredEvent>>>,
}

impl InMemoryEventRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.streams.read().await;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut streams = self.streams.write().await;
        let current_len = streams.get(&aggregate_id).map_or(0, Vec::len);
        let actual = i64::try_from(current_len)
            .map_err(|e| DomainError::Infrastructure(format!("stream too long: {e}")))?;

        if actual != expected_version {
            warn!(%aggregate_id, expected_version, actual, "rejecting stale append");
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        for (offset, event) in (1_i64..).zip(events) {
            if event.aggregate_id != aggregate_id || event.sequence_number != actual + offset {
                return Err(DomainError::Infrastructure(format!(
                    "event {} does not continue stream {aggregate_id} at sequence {}",
                    event.event_id,
                    actual + offset
                )));
            }
        }

        let stream = streams.entry(aggregate_id).or_default();
        stream.extend_from_slice(events);
        debug!(%aggregate_id, appended = events.len(), version = stream.len(), "events appended");
        Ok(())
    }
}
