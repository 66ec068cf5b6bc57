use std::future::Future;

use serde_json::Value;
use uuid::Uuid;

use crate::database::Database;
use crate::models::AnalyticsEventType;

/// Destination for interaction events. Abstracted so the recorder's
/// swallow-on-failure policy can be exercised without a live store.
pub trait EventSink: Send + Sync {
    fn insert_event(
        &self,
        provider_id: Uuid,
        event_type: AnalyticsEventType,
        metadata: Option<Value>,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
}

impl EventSink for Database {
    async fn insert_event(
        &self,
        provider_id: Uuid,
        event_type: AnalyticsEventType,
        metadata: Option<Value>,
    ) -> Result<(), sqlx::Error> {
        self.insert_analytics_event(provider_id, event_type, metadata)
            .await
            .map(|_| ())
    }
}

/// Best-effort recorder for interaction events.
///
/// Every insert is attempted, every failure is logged and swallowed: an
/// analytics write must never fail or delay the user-facing action it
/// accompanies.
#[derive(Clone)]
pub struct Recorder<S: EventSink> {
    sink: S,
}

pub type EngagementRecorder = Recorder<Database>;

impl<S: EventSink> Recorder<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub async fn record(
        &self,
        provider_id: Uuid,
        event_type: AnalyticsEventType,
        metadata: Option<Value>,
    ) {
        if let Err(err) = self.sink.insert_event(provider_id, event_type, metadata).await {
            log::warn!("Dropping {event_type:?} event for provider {provider_id}: {err:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FailingSink {
        attempts: Arc<AtomicUsize>,
    }

    impl EventSink for FailingSink {
        async fn insert_event(
            &self,
            _provider_id: Uuid,
            _event_type: AnalyticsEventType,
            _metadata: Option<Value>,
        ) -> Result<(), sqlx::Error> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(sqlx::Error::PoolClosed)
        }
    }

    #[actix_rt::test]
    async fn store_failure_is_attempted_then_swallowed() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let recorder = Recorder::new(FailingSink {
            attempts: attempts.clone(),
        });

        // Must complete normally even though every insert fails.
        recorder
            .record(Uuid::new_v4(), AnalyticsEventType::View, None)
            .await;
        recorder
            .record(
                Uuid::new_v4(),
                AnalyticsEventType::EnquiryClick,
                Some(serde_json::json!({"source": "detail_page"})),
            )
            .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
