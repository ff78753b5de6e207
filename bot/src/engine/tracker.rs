use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::member::{GroupId, Member, MemberId};
use crate::platform::{AudioBroadcaster, SpeakingUpdate, SubscriptionId, VoiceGateway};

/// Owns the single member currently being stalked and the voice-activity
/// subscription armed for them. One instance per process, shared by every
/// command call site; construct it at the composition root and inject the
/// platform collaborators.
pub struct TargetTracker {
    state: Arc<Mutex<TargetState>>,
    gateway: Arc<dyn VoiceGateway>,
    broadcaster: Arc<dyn AudioBroadcaster>,
}

/// All tracking state lives in one `Option`: either fully tracked or fully
/// untracked. Torn intermediate states are not representable.
#[derive(Default)]
struct TargetState {
    active: Option<ActiveTarget>,
}

struct ActiveTarget {
    member: MemberId,
    group: GroupId,
    since: DateTime<Utc>,
    subscription: SubscriptionId,
    feed: JoinHandle<()>,
}

/// One consistent read of the current target.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TargetSnapshot {
    pub member: MemberId,
    pub group: GroupId,
    pub since: DateTime<Utc>,
}

impl TargetTracker {
    pub fn new(gateway: Arc<dyn VoiceGateway>, broadcaster: Arc<dyn AudioBroadcaster>) -> Self {
        Self {
            state: Arc::new(Mutex::new(TargetState::default())),
            gateway,
            broadcaster,
        }
    }

    /// Start stalking `member` in `group`, replacing any current target.
    ///
    /// Accepts resolver output directly: a `None` member, `None` group or a
    /// zero member id is a documented no-op — callers detect it by reading
    /// [`target`](Self::target) afterward. When a target is already set, the
    /// full effect of [`clear_target`](Self::clear_target) runs first, even
    /// if the group is unchanged, so at most one subscription is ever live.
    pub fn set_target(
        &self,
        member: Option<&Member>,
        group: Option<GroupId>,
    ) -> Result<(), String> {
        let (Some(member), Some(group)) = (member, group) else {
            warn!("set_target called without a member or group, ignoring");
            return Ok(());
        };
        if member.id == 0 {
            warn!(username = %member.username, "set_target called with a zero member id, ignoring");
            return Ok(());
        }

        // The whole unsubscribe/subscribe/commit transition happens under
        // one lock acquisition, so concurrent readers and speaking updates
        // see only the old state or the new one.
        let mut state = self.state.lock().unwrap();
        self.release(&mut state)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.gateway.subscribe(group, tx)?;
        let feed = tokio::spawn(Self::run_feed(
            Arc::clone(&self.state),
            Arc::clone(&self.broadcaster),
            rx,
        ));

        state.active = Some(ActiveTarget {
            member: member.id,
            group,
            since: Utc::now(),
            subscription,
            feed,
        });
        info!(member = member.id, group, "stalking target set");
        Ok(())
    }

    /// Stop stalking: unsubscribe from the voice gateway, stop the feed and
    /// reset to untracked. A no-op when nothing is tracked.
    pub fn clear_target(&self) -> Result<(), String> {
        let mut state = self.state.lock().unwrap();
        self.release(&mut state)
    }

    /// Drop the active subscription, if any. The caller holds the state
    /// lock; the state is reset before the gateway call so that even a
    /// failed unsubscribe leaves the tracker cleanly untracked.
    fn release(&self, state: &mut TargetState) -> Result<(), String> {
        let Some(active) = state.active.take() else {
            return Ok(());
        };
        active.feed.abort();
        self.gateway.unsubscribe(active.group, active.subscription)?;
        info!(member = active.member, group = active.group, "stalking target cleared");
        Ok(())
    }

    /// Forward speaking updates to the audio broadcaster. Deliberately does
    /// not compare the speaker to the tracked member: any speaking update in
    /// the subscribed group triggers a push while a target is armed.
    async fn run_feed(
        state: Arc<Mutex<TargetState>>,
        broadcaster: Arc<dyn AudioBroadcaster>,
        mut updates: mpsc::UnboundedReceiver<SpeakingUpdate>,
    ) {
        while let Some(update) = updates.recv().await {
            // Copy the group out before awaiting; push_audio does network
            // I/O and must not run under the state lock.
            let group = state.lock().unwrap().active.as_ref().map(|a| a.group);
            let Some(group) = group else {
                break;
            };
            if let Err(err) = broadcaster.push_audio(group).await {
                warn!(%err, speaker = update.speaker, "audio push failed");
            }
        }
    }

    /// Id of the tracked member, if any.
    pub fn target(&self) -> Option<MemberId> {
        self.state.lock().unwrap().active.as_ref().map(|a| a.member)
    }

    /// Group the tracking was initiated in, if any.
    pub fn target_group(&self) -> Option<GroupId> {
        self.state.lock().unwrap().active.as_ref().map(|a| a.group)
    }

    /// Whether the voice-activity feed is currently subscribed.
    pub fn is_subscribed(&self) -> bool {
        self.state.lock().unwrap().active.is_some()
    }

    pub fn snapshot(&self) -> Option<TargetSnapshot> {
        self.state
            .lock()
            .unwrap()
            .active
            .as_ref()
            .map(|a| TargetSnapshot {
                member: a.member,
                group: a.group,
                since: a.since,
            })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::platform::local::{LocalVoiceGateway, RecordingBroadcaster};

    const GROUP: GroupId = 10;

    fn setup() -> (
        Arc<LocalVoiceGateway>,
        Arc<RecordingBroadcaster>,
        TargetTracker,
    ) {
        let gateway = Arc::new(LocalVoiceGateway::new());
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let tracker = TargetTracker::new(gateway.clone(), broadcaster.clone());
        (gateway, broadcaster, tracker)
    }

    async fn wait_for_pushes(broadcaster: &RecordingBroadcaster, count: usize) {
        for _ in 0..200 {
            if broadcaster.push_count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("timed out waiting for {count} audio pushes");
    }

    #[tokio::test]
    async fn test_set_and_read_target() {
        let (gateway, _broadcaster, tracker) = setup();
        let alice = Member::new(42, "alice");

        tracker.set_target(Some(&alice), Some(GROUP)).unwrap();

        assert_eq!(tracker.target(), Some(42));
        assert_eq!(tracker.target_group(), Some(GROUP));
        assert!(tracker.is_subscribed());
        assert_eq!(gateway.subscriber_count(GROUP), 1);

        let snapshot = tracker.snapshot().unwrap();
        assert_eq!(snapshot.member, 42);
        assert_eq!(snapshot.group, GROUP);
    }

    #[tokio::test]
    async fn test_retarget_keeps_a_single_subscription() {
        let (gateway, _broadcaster, tracker) = setup();
        let alice = Member::new(42, "alice");
        let bob = Member::new(7, "bob");

        tracker.set_target(Some(&alice), Some(GROUP)).unwrap();
        tracker.set_target(Some(&bob), Some(GROUP)).unwrap();

        assert_eq!(tracker.target(), Some(7));
        assert_eq!(gateway.subscriber_count(GROUP), 1);
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let (gateway, _broadcaster, tracker) = setup();
        let alice = Member::new(42, "alice");

        tracker.set_target(Some(&alice), Some(GROUP)).unwrap();
        tracker.clear_target().unwrap();

        assert_eq!(tracker.target(), None);
        assert_eq!(tracker.target_group(), None);
        assert!(!tracker.is_subscribed());
        assert!(tracker.snapshot().is_none());
        assert_eq!(gateway.subscriber_count(GROUP), 0);
    }

    #[tokio::test]
    async fn test_clear_on_untracked_is_a_noop() {
        let (_gateway, _broadcaster, tracker) = setup();

        tracker.clear_target().unwrap();
        tracker.clear_target().unwrap();

        assert_eq!(tracker.target(), None);
        assert!(!tracker.is_subscribed());
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_noops() {
        let (gateway, _broadcaster, tracker) = setup();
        let alice = Member::new(42, "alice");
        let nobody = Member::new(0, "nobody");

        tracker.set_target(None, Some(GROUP)).unwrap();
        tracker.set_target(Some(&alice), None).unwrap();
        tracker.set_target(Some(&nobody), Some(GROUP)).unwrap();

        assert_eq!(tracker.target(), None);
        assert!(!tracker.is_subscribed());
        assert_eq!(gateway.subscriber_count(GROUP), 0);
    }

    #[tokio::test]
    async fn test_invalid_arguments_do_not_drop_a_live_target() {
        let (gateway, _broadcaster, tracker) = setup();
        let alice = Member::new(42, "alice");
        let nobody = Member::new(0, "nobody");

        tracker.set_target(Some(&alice), Some(GROUP)).unwrap();
        tracker.set_target(Some(&nobody), Some(GROUP)).unwrap();
        tracker.set_target(None, None).unwrap();

        assert_eq!(tracker.target(), Some(42));
        assert_eq!(gateway.subscriber_count(GROUP), 1);
    }

    #[tokio::test]
    async fn test_any_speaker_triggers_a_push() {
        let (gateway, broadcaster, tracker) = setup();
        let alice = Member::new(42, "alice");

        tracker.set_target(Some(&alice), Some(GROUP)).unwrap();

        // A different member stops speaking — still pushes.
        gateway.emit(GROUP, 7, false);
        wait_for_pushes(&broadcaster, 1).await;
        assert_eq!(broadcaster.pushes(), vec![GROUP]);
    }

    #[tokio::test]
    async fn test_clear_stops_deliveries() {
        let (gateway, broadcaster, tracker) = setup();
        let alice = Member::new(42, "alice");

        tracker.set_target(Some(&alice), Some(GROUP)).unwrap();
        tracker.clear_target().unwrap();

        assert_eq!(gateway.emit(GROUP, 42, true), 0);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(broadcaster.push_count(), 0);
    }

    struct OfflineGateway;

    impl VoiceGateway for OfflineGateway {
        fn subscribe(
            &self,
            _group: GroupId,
            _sink: mpsc::UnboundedSender<SpeakingUpdate>,
        ) -> Result<SubscriptionId, String> {
            Err("voice gateway offline".into())
        }

        fn unsubscribe(
            &self,
            _group: GroupId,
            _subscription: SubscriptionId,
        ) -> Result<(), String> {
            Err("voice gateway offline".into())
        }
    }

    #[tokio::test]
    async fn test_subscribe_failure_propagates_and_leaves_untracked() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let tracker = TargetTracker::new(Arc::new(OfflineGateway), broadcaster);
        let alice = Member::new(42, "alice");

        let err = tracker.set_target(Some(&alice), Some(GROUP)).unwrap_err();
        assert!(err.contains("offline"));
        assert_eq!(tracker.target(), None);
        assert!(!tracker.is_subscribed());
    }

    struct StuckGateway;

    impl VoiceGateway for StuckGateway {
        fn subscribe(
            &self,
            _group: GroupId,
            _sink: mpsc::UnboundedSender<SpeakingUpdate>,
        ) -> Result<SubscriptionId, String> {
            Ok(uuid::Uuid::new_v4())
        }

        fn unsubscribe(
            &self,
            _group: GroupId,
            _subscription: SubscriptionId,
        ) -> Result<(), String> {
            Err("unsubscribe rejected".into())
        }
    }

    #[tokio::test]
    async fn test_unsubscribe_failure_still_resets_state() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let tracker = TargetTracker::new(Arc::new(StuckGateway), broadcaster);
        let alice = Member::new(42, "alice");

        tracker.set_target(Some(&alice), Some(GROUP)).unwrap();
        let err = tracker.clear_target().unwrap_err();
        assert!(err.contains("rejected"));

        // The error propagates, but the tracker is cleanly untracked.
        assert_eq!(tracker.target(), None);
        assert!(!tracker.is_subscribed());
    }
}
