//! Driver event sinks
//!
//! `GlusterDriver` reports every check, creation and mount through the
//! `EventPublisher` port. The binary logs them and can also keep them in
//! memory to print a run summary; tests inspect the in-memory sink directly.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::domain::events::DomainEvent;
use crate::domain::ports::EventPublisher;
use crate::error::{Error, Result};

/// Emits each event as one structured `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEventPublisher {
    verbose: bool,
}

impl LoggingEventPublisher {
    /// Events at `info`.
    pub fn info_level() -> Self {
        Self { verbose: true }
    }

    /// Events at `debug`, for callers that already log each step.
    pub fn debug_level() -> Self {
        Self { verbose: false }
    }
}

#[async_trait]
impl EventPublisher for LoggingEventPublisher {
    async fn publish(&self, event: DomainEvent) -> Result<()> {
        let payload = serde_json::to_string(&event)
            .map_err(|e| Error::Internal(format!("event encoding: {}", e)))?;
        let kind = event.event_type();
        let volume = event.volume_name();

        if self.verbose {
            info!(kind, volume, %payload, "gluster volume event");
        } else {
            debug!(kind, volume, %payload, "gluster volume event");
        }
        Ok(())
    }
}

/// Keeps every event in publication order.
#[derive(Debug, Default)]
pub struct InMemoryEventCollector {
    events: RwLock<Vec<DomainEvent>>,
}

impl InMemoryEventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.read().clone()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<DomainEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .cloned()
            .collect()
    }

    /// Event type names, oldest first.
    pub fn timeline(&self) -> Vec<&'static str> {
        self.events.read().iter().map(DomainEvent::event_type).collect()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventCollector {
    async fn publish(&self, event: DomainEvent) -> Result<()> {
        self.events.write().push(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<DomainEvent>) -> Result<()> {
        self.events.write().extend(events);
        Ok(())
    }
}

/// Fans events out to several sinks.
///
/// Every sink sees every event even if an earlier one fails; the first
/// failure is returned.
#[derive(Default, Clone)]
pub struct CompositeEventPublisher {
    sinks: Vec<Arc<dyn EventPublisher>>,
}

impl CompositeEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_publisher<P: EventPublisher + 'static>(self, publisher: P) -> Self {
        self.with_shared(Arc::new(publisher))
    }

    /// Add a sink the caller keeps a handle to.
    pub fn with_shared(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.sinks.push(publisher);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl std::fmt::Debug for CompositeEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeEventPublisher")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

#[async_trait]
impl EventPublisher for CompositeEventPublisher {
    async fn publish(&self, event: DomainEvent) -> Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.publish(event.clone()).await {
                warn!("event sink rejected {}: {}", event.event_type(), e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn publish_all(&self, events: Vec<DomainEvent>) -> Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.publish_all(events.clone()).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Peer;

    struct FailingSink;

    #[async_trait]
    impl EventPublisher for FailingSink {
        async fn publish(&self, _event: DomainEvent) -> Result<()> {
            Err(Error::Internal("sink offline".to_string()))
        }
    }

    #[test]
    fn test_logging_publisher() {
        let publisher = LoggingEventPublisher::debug_level();
        let event = DomainEvent::volume_checked("data", false);

        tokio_test::block_on(publisher.publish(event)).unwrap();
    }

    #[tokio::test]
    async fn test_in_memory_collector_timeline() {
        let collector = InMemoryEventCollector::new();
        assert!(collector.is_empty());

        collector
            .publish(DomainEvent::volume_checked("data", false))
            .await
            .unwrap();
        collector
            .publish_all(vec![
                DomainEvent::volume_created("data", &[Peer::new("node1")]),
                DomainEvent::volume_mounted("data", "/mnt/data"),
            ])
            .await
            .unwrap();

        assert_eq!(collector.len(), 3);
        assert_eq!(
            collector.timeline(),
            vec!["VolumeChecked", "VolumeCreated", "VolumeMounted"]
        );
        assert_eq!(collector.events_of_type("VolumeCreated").len(), 1);
        assert_eq!(collector.events()[0].volume_name(), "data");
    }

    #[tokio::test]
    async fn test_composite_reaches_every_sink() {
        let first = Arc::new(InMemoryEventCollector::new());
        let second = Arc::new(InMemoryEventCollector::new());
        let composite = CompositeEventPublisher::new()
            .with_publisher(LoggingEventPublisher::debug_level())
            .with_shared(first.clone())
            .with_shared(second.clone());
        assert_eq!(composite.len(), 3);

        composite
            .publish(DomainEvent::volume_stopped("data"))
            .await
            .unwrap();
        composite
            .publish_all(vec![
                DomainEvent::volume_checked("data", true),
                DomainEvent::volume_mounted("data", "/mnt/data"),
            ])
            .await
            .unwrap();

        assert_eq!(first.timeline(), vec!["VolumeStopped", "VolumeChecked", "VolumeMounted"]);
        assert_eq!(first.timeline(), second.timeline());
    }

    #[tokio::test]
    async fn test_composite_continues_past_failing_sink() {
        let collector = Arc::new(InMemoryEventCollector::new());
        let composite = CompositeEventPublisher::new()
            .with_publisher(FailingSink)
            .with_shared(collector.clone());

        let err = composite
            .publish(DomainEvent::volume_checked("data", false))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Internal(_)));
        assert_eq!(collector.len(), 1);
    }

    #[tokio::test]
    async fn test_default_publish_all_goes_through_publish() {
        let composite = CompositeEventPublisher::new().with_publisher(FailingSink);

        assert!(composite
            .publish_all(vec![DomainEvent::volume_stopped("data")])
            .await
            .is_err());
    }
}
