//! Prowl — the targeting core of a voice-channel troll bot.
//!
//! The chat-platform SDK (command parsing, permission checks, audio
//! transport) lives in the embedding adapter; this crate owns the parts
//! with real logic:
//!
//! - [`engine::resolver`] — fuzzy resolution of free-form user input to a
//!   member of a group roster.
//! - [`engine::tracker`] — the single-target stalking state machine that
//!   arms a voice-activity feed and drives the audio broadcaster.
//! - [`engine::roasts`] / [`engine::suggestions`] — the in-memory stores
//!   behind the roast and suggestion commands.
//!
//! The adapter constructs one [`engine::tracker::TargetTracker`] at its
//! composition root and injects the [`platform`] collaborators:
//!
//! ```
//! use std::sync::Arc;
//!
//! use prowl_bot::engine::member::Member;
//! use prowl_bot::engine::resolver::resolve_member;
//! use prowl_bot::engine::tracker::TargetTracker;
//! use prowl_bot::platform::local::{LocalVoiceGateway, NullBroadcaster};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let gateway = Arc::new(LocalVoiceGateway::new());
//! let tracker = TargetTracker::new(gateway.clone(), Arc::new(NullBroadcaster));
//!
//! let roster = vec![Member::new(42, "alice"), Member::new(7, "bob")];
//! let target = resolve_member("alise", &roster);
//! tracker.set_target(target, Some(1)).unwrap();
//! assert_eq!(tracker.target(), Some(42));
//!
//! tracker.clear_target().unwrap();
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod platform;
