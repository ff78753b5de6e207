use serde::{Deserialize, Serialize};

/// Unique identifier for a member (the platform's user id). Id 0 is never a
/// valid member.
pub type MemberId = u64;

/// Unique identifier for a group (server/guild) and its voice stream.
pub type GroupId = u64;

/// A member of a group as the bot sees it: one primary handle plus an
/// optional per-group nickname, both human-editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// Primary handle (unique display name). Empty is treated as absent.
    pub username: String,
    /// Per-group nickname, if the member set one.
    pub nickname: Option<String>,
}

impl Member {
    pub fn new(id: MemberId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            nickname: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// The name the platform renders: nickname when set, username otherwise.
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}
