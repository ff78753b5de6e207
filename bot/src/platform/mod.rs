//! Boundary traits for the chat-platform collaborators. The embedding SDK
//! adapter implements these against the real platform; [`local`] provides
//! in-process implementations for tests, dry runs and simulations.

pub mod local;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::engine::member::{GroupId, MemberId};

/// Handle for one voice-activity subscription. Returned by
/// [`VoiceGateway::subscribe`] and required to unsubscribe.
pub type SubscriptionId = Uuid;

/// A speaking-state change for one member of a group's voice channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpeakingUpdate {
    pub speaker: MemberId,
    pub speaking: bool,
}

/// Voice-activity event source, keyed by group. Registration is synchronous;
/// updates arrive asynchronously through the registered sink.
pub trait VoiceGateway: Send + Sync {
    /// Register `sink` for speaking updates in `group`.
    fn subscribe(
        &self,
        group: GroupId,
        sink: mpsc::UnboundedSender<SpeakingUpdate>,
    ) -> Result<SubscriptionId, String>;

    /// Drop a subscription previously returned by
    /// [`subscribe`](Self::subscribe).
    fn unsubscribe(&self, group: GroupId, subscription: SubscriptionId) -> Result<(), String>;
}

/// Pushes bot audio into a group's voice channel. Implementations do network
/// I/O; calls may suspend.
#[async_trait]
pub trait AudioBroadcaster: Send + Sync {
    async fn push_audio(&self, group: GroupId) -> Result<(), String>;
}
