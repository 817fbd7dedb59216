//! Message types carried by user inboxes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A point-to-point message, immutable once sent.
///
/// The textual form is the content alone; the sender is kept for record
/// but not rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    /// Login of the sender, or the system sender for automatic notes.
    pub sender: String,
    /// Message text.
    pub content: String,
}

impl DirectMessage {
    /// Create a new direct message.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
        }
    }
}

impl fmt::Display for DirectMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

/// A message broadcast to a community, immutable once sent.
///
/// Delivered to every member's queue at send time; carries the community
/// name and a creation timestamp for the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityMessage {
    /// Name of the community it was sent to.
    pub community: String,
    /// Login of the sender.
    pub sender: String,
    /// Message text.
    pub content: String,
    /// Unix seconds at creation.
    pub sent_at: u64,
}

impl CommunityMessage {
    /// Create a new community message stamped with the current time.
    pub fn new(
        community: impl Into<String>,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            community: community.into(),
            sender: sender.into(),
            content: content.into(),
            sent_at: unix_now(),
        }
    }
}

impl fmt::Display for CommunityMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

/// Current time as unix seconds.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
