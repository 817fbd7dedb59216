//! User accounts and their relation state.

use crate::message::{CommunityMessage, DirectMessage};
use crate::profile::Profile;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// A registered account with its profile, relations, and inboxes.
///
/// Relations reference other users by login; there are no object cycles, so
/// snapshotting a user snapshots everything it owns. Confirmed friends and
/// pending requests keep insertion order; the asymmetric relations (idols,
/// fans, crushes, enemies) are plain sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    login: String,
    password: String,
    name: String,
    profile: Profile,

    friends: Vec<String>,
    pending_requests: Vec<String>,
    idols: HashSet<String>,
    fans: HashSet<String>,
    crushes: HashSet<String>,
    enemies: HashSet<String>,

    inbox: VecDeque<DirectMessage>,
    community_inbox: VecDeque<CommunityMessage>,
    community_read: VecDeque<CommunityMessage>,

    communities: Vec<String>,
}

impl User {
    /// Create a new account with an empty profile.
    pub fn new(
        login: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            name: name.into(),
            profile: Profile::new(),
            friends: Vec::new(),
            pending_requests: Vec::new(),
            idols: HashSet::new(),
            fans: HashSet::new(),
            crushes: HashSet::new(),
            enemies: HashSet::new(),
            inbox: VecDeque::new(),
            community_inbox: VecDeque::new(),
            community_read: VecDeque::new(),
            communities: Vec::new(),
        }
    }

    /// The unique login.
    pub fn login(&self) -> &str {
        &self.login
    }

    /// The stored credential.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The profile attributes.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Mutable access to the profile attributes.
    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    // =========================================================================
    // Friendship
    // =========================================================================

    /// Confirmed friends in confirmation order.
    pub fn friends(&self) -> &[String] {
        &self.friends
    }

    /// Check if another user is a confirmed friend.
    pub fn is_friend(&self, login: &str) -> bool {
        self.friends.iter().any(|f| f == login)
    }

    /// Check if a friend request from the given user is awaiting acceptance.
    pub fn has_pending_from(&self, login: &str) -> bool {
        self.pending_requests.iter().any(|p| p == login)
    }

    /// Record an incoming friend request.
    pub fn add_pending_request(&mut self, login: impl Into<String>) {
        let login = login.into();
        if !self.has_pending_from(&login) {
            self.pending_requests.push(login);
        }
    }

    /// Confirm a friendship: drop any pending request from the user and
    /// append them to the confirmed list.
    pub fn confirm_friend(&mut self, login: &str) {
        self.pending_requests.retain(|p| p != login);
        if !self.is_friend(login) {
            self.friends.push(login.to_string());
        }
    }

    // =========================================================================
    // Asymmetric relations
    // =========================================================================

    /// Logins this user follows.
    pub fn idols(&self) -> &HashSet<String> {
        &self.idols
    }

    /// Logins following this user.
    pub fn fans(&self) -> &HashSet<String> {
        &self.fans
    }

    /// This user's crushes.
    pub fn crushes(&self) -> &HashSet<String> {
        &self.crushes
    }

    /// Logins this user has declared enemies.
    pub fn enemies(&self) -> &HashSet<String> {
        &self.enemies
    }

    /// Check if this user follows the given login.
    pub fn is_fan_of(&self, idol: &str) -> bool {
        self.idols.contains(idol)
    }

    /// Check if this user has a crush on the given login.
    pub fn has_crush_on(&self, login: &str) -> bool {
        self.crushes.contains(login)
    }

    /// Check if this user has declared the given login an enemy.
    pub fn has_enemy(&self, login: &str) -> bool {
        self.enemies.contains(login)
    }

    /// Record an idol (someone this user follows).
    pub fn add_idol(&mut self, login: impl Into<String>) {
        self.idols.insert(login.into());
    }

    /// Record a fan (someone following this user).
    pub fn add_fan(&mut self, login: impl Into<String>) {
        self.fans.insert(login.into());
    }

    /// Record a crush.
    pub fn add_crush(&mut self, login: impl Into<String>) {
        self.crushes.insert(login.into());
    }

    /// Record an enemy.
    pub fn add_enemy(&mut self, login: impl Into<String>) {
        self.enemies.insert(login.into());
    }

    /// Strip a removed user from every forward-looking relation.
    ///
    /// Pending friend requests are deliberately left alone, and delivered
    /// messages are immutable history.
    pub fn purge_relations_with(&mut self, login: &str) {
        self.friends.retain(|f| f != login);
        self.idols.remove(login);
        self.fans.remove(login);
        self.crushes.remove(login);
        self.enemies.remove(login);
    }

    // =========================================================================
    // Inboxes
    // =========================================================================

    /// Enqueue a direct message at the tail of the inbox.
    pub fn receive_message(&mut self, message: DirectMessage) {
        self.inbox.push_back(message);
    }

    /// Dequeue the oldest direct message.
    pub fn take_message(&mut self) -> Option<DirectMessage> {
        self.inbox.pop_front()
    }

    /// Enqueue a community message at the tail of the community inbox.
    pub fn receive_community_message(&mut self, message: CommunityMessage) {
        self.community_inbox.push_back(message);
    }

    /// Dequeue the oldest unread community message, archiving it as read.
    pub fn take_community_message(&mut self) -> Option<CommunityMessage> {
        let message = self.community_inbox.pop_front()?;
        self.community_read.push_back(message.clone());
        Some(message)
    }

    // =========================================================================
    // Community membership
    // =========================================================================

    /// Community names this user belongs to, in join order.
    pub fn communities(&self) -> &[String] {
        &self.communities
    }

    /// Record membership in a community.
    pub fn join_community(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.communities.contains(&name) {
            self.communities.push(name);
        }
    }

    /// Drop membership in a community.
    pub fn leave_community(&mut self, name: &str) {
        self.communities.retain(|c| c != name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friend_confirmation_keeps_order() {
        let mut ana = User::new("ana", "pw", "Ana");
        ana.confirm_friend("caio");
        ana.confirm_friend("bia");
        ana.confirm_friend("caio"); // no duplicate

        assert_eq!(ana.friends(), ["caio", "bia"]);
        assert!(ana.is_friend("bia"));
        assert!(!ana.is_friend("dani"));
    }

    #[test]
    fn test_confirm_clears_pending() {
        let mut ana = User::new("ana", "pw", "Ana");
        ana.add_pending_request("bia");
        ana.add_pending_request("bia");
        assert!(ana.has_pending_from("bia"));

        ana.confirm_friend("bia");
        assert!(!ana.has_pending_from("bia"));
        assert_eq!(ana.friends(), ["bia"]);
    }

    #[test]
    fn test_purge_leaves_pending_and_inbox() {
        let mut ana = User::new("ana", "pw", "Ana");
        ana.confirm_friend("bia");
        ana.add_idol("bia");
        ana.add_fan("bia");
        ana.add_crush("bia");
        ana.add_enemy("bia");
        ana.add_pending_request("bia");
        ana.receive_message(DirectMessage::new("bia", "oi"));

        ana.purge_relations_with("bia");

        assert!(ana.friends().is_empty());
        assert!(ana.idols().is_empty());
        assert!(ana.fans().is_empty());
        assert!(ana.crushes().is_empty());
        assert!(ana.enemies().is_empty());
        assert!(ana.has_pending_from("bia"));
        assert_eq!(ana.take_message().unwrap().content, "oi");
    }

    #[test]
    fn test_inbox_fifo() {
        let mut ana = User::new("ana", "pw", "Ana");
        ana.receive_message(DirectMessage::new("bia", "m1"));
        ana.receive_message(DirectMessage::new("caio", "m2"));

        assert_eq!(ana.take_message().unwrap().content, "m1");
        assert_eq!(ana.take_message().unwrap().content, "m2");
        assert!(ana.take_message().is_none());
    }

    #[test]
    fn test_community_read_archive() {
        let mut ana = User::new("ana", "pw", "Ana");
        ana.receive_community_message(CommunityMessage::new("c1", "bia", "oi"));

        let read = ana.take_community_message().unwrap();
        assert_eq!(read.content, "oi");
        assert!(ana.take_community_message().is_none());
        assert_eq!(ana.community_read.len(), 1);
    }

    #[test]
    fn test_join_community_once() {
        let mut ana = User::new("ana", "pw", "Ana");
        ana.join_community("c1");
        ana.join_community("c1");
        ana.join_community("c2");

        assert_eq!(ana.communities(), ["c1", "c2"]);

        ana.leave_community("c1");
        assert_eq!(ana.communities(), ["c2"]);
    }
}
