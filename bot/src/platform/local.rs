//! In-process implementations of the platform traits. The test suite runs
//! on these; embedders can use them to exercise tracking logic without a
//! live gateway.

use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use super::{AudioBroadcaster, SpeakingUpdate, SubscriptionId, VoiceGateway};
use crate::engine::member::{GroupId, MemberId};

/// In-memory voice gateway: per-group subscriber lists fed by
/// [`emit`](Self::emit).
#[derive(Default)]
pub struct LocalVoiceGateway {
    subscribers: DashMap<GroupId, Vec<GatewaySubscriber>>,
}

struct GatewaySubscriber {
    id: SubscriptionId,
    sink: mpsc::UnboundedSender<SpeakingUpdate>,
}

impl LocalVoiceGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a speaking update to every live subscriber of `group`.
    /// Closed sinks are skipped, never removed — removal is the
    /// subscriber's job via `unsubscribe`. Returns the number of deliveries.
    pub fn emit(&self, group: GroupId, speaker: MemberId, speaking: bool) -> usize {
        let Some(subscribers) = self.subscribers.get(&group) else {
            return 0;
        };
        let update = SpeakingUpdate { speaker, speaking };
        subscribers
            .iter()
            .filter(|s| s.sink.send(update).is_ok())
            .count()
    }

    /// Live subscriptions for `group`.
    pub fn subscriber_count(&self, group: GroupId) -> usize {
        self.subscribers.get(&group).map_or(0, |subscribers| {
            subscribers.iter().filter(|s| !s.sink.is_closed()).count()
        })
    }

    /// Live subscriptions across every group.
    pub fn total_subscribers(&self) -> usize {
        self.subscribers
            .iter()
            .map(|subscribers| subscribers.iter().filter(|s| !s.sink.is_closed()).count())
            .sum()
    }
}

impl VoiceGateway for LocalVoiceGateway {
    fn subscribe(
        &self,
        group: GroupId,
        sink: mpsc::UnboundedSender<SpeakingUpdate>,
    ) -> Result<SubscriptionId, String> {
        let id = Uuid::new_v4();
        self.subscribers
            .entry(group)
            .or_default()
            .push(GatewaySubscriber { id, sink });
        Ok(id)
    }

    fn unsubscribe(&self, group: GroupId, subscription: SubscriptionId) -> Result<(), String> {
        let Some(mut subscribers) = self.subscribers.get_mut(&group) else {
            return Err(format!("no subscriptions for group {group}"));
        };
        let before = subscribers.len();
        subscribers.retain(|s| s.id != subscription);
        if subscribers.len() == before {
            return Err(format!("unknown subscription for group {group}"));
        }
        Ok(())
    }
}

/// Discards every push. Useful when wiring the tracker without real audio.
pub struct NullBroadcaster;

#[async_trait]
impl AudioBroadcaster for NullBroadcaster {
    async fn push_audio(&self, group: GroupId) -> Result<(), String> {
        debug!(group, "discarding audio push");
        Ok(())
    }
}

/// Records every pushed group, for assertions in tests and dry runs.
#[derive(Default)]
pub struct RecordingBroadcaster {
    pushes: Mutex<Vec<GroupId>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushes(&self) -> Vec<GroupId> {
        self.pushes.lock().unwrap().clone()
    }

    pub fn push_count(&self) -> usize {
        self.pushes.lock().unwrap().len()
    }
}

#[async_trait]
impl AudioBroadcaster for RecordingBroadcaster {
    async fn push_audio(&self, group: GroupId) -> Result<(), String> {
        self.pushes.lock().unwrap().push(group);
        Ok(())
    }
}
