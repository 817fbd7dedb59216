//! The network context object: every operation of the system.
//!
//! `Network` owns the user directory, the session registry, and the
//! community registry, and exposes each operation as a method. It is pure
//! in-memory state; persistence wraps it from the outside.

use crate::community::Community;
use crate::directory::UserDirectory;
use crate::error::{NetworkError, NetworkResult};
use crate::message::{CommunityMessage, DirectMessage};
use crate::session::SessionRegistry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Sender recorded on automatic system notes.
pub const SYSTEM_SENDER: &str = "mingle";

/// The complete in-memory state of one network instance.
///
/// All mutating operations resolve the caller through the session registry
/// first, then validate against the relation and community invariants, then
/// mutate. Cross-record updates (friend confirmation, community cascade)
/// complete before the method returns; no partial state is ever observable.
#[derive(Debug, Default)]
pub struct Network {
    directory: UserDirectory,
    sessions: SessionRegistry,
    communities: HashMap<String, Community>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a network from persisted parts. Sessions always start empty.
    pub(crate) fn from_parts(
        directory: UserDirectory,
        communities: HashMap<String, Community>,
    ) -> Self {
        let mut network = Self {
            directory,
            sessions: SessionRegistry::new(),
            communities,
        };
        network.reconcile();
        network
    }

    /// The user directory.
    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// The community registry.
    pub fn communities(&self) -> &HashMap<String, Community> {
        &self.communities
    }

    /// Resolve a session token to its login, owned.
    fn session_user(&self, token: &str) -> NetworkResult<String> {
        self.sessions.resolve(token).map(str::to_string)
    }

    // =========================================================================
    // Accounts and sessions
    // =========================================================================

    /// Register a new account with an empty profile.
    pub fn create_user(&mut self, login: &str, password: &str, name: &str) -> NetworkResult<()> {
        self.directory.create_user(login, password, name)?;
        debug!(login, "user created");
        Ok(())
    }

    /// Authenticate and open a session, returning the new token.
    pub fn authenticate(&mut self, login: &str, password: &str) -> NetworkResult<String> {
        self.directory.verify_credentials(login, password)?;
        Ok(self.sessions.issue(login))
    }

    /// Read a profile attribute of any user.
    ///
    /// `"name"` (any case) is a virtual attribute backed by the display
    /// name; everything else goes through the profile.
    pub fn attribute(&self, login: &str, attribute: &str) -> NetworkResult<String> {
        let user = self.directory.get(login)?;

        if attribute.eq_ignore_ascii_case("name") {
            return Ok(user.name().to_string());
        }

        user.profile()
            .get(attribute)
            .map(str::to_string)
            .ok_or(NetworkError::AttributeNotSet)
    }

    /// Write a profile attribute of the session's user.
    pub fn set_attribute(&mut self, token: &str, attribute: &str, value: &str) -> NetworkResult<()> {
        let login = self.session_user(token)?;
        self.directory.get_mut(&login)?.profile_mut().set(attribute, value);
        Ok(())
    }

    // =========================================================================
    // Friendship
    // =========================================================================

    /// Request friendship with another user, or confirm it if they asked
    /// first.
    ///
    /// The asymmetric rule is deliberate: a pending request *from* the
    /// target turns this call into the confirmation for both sides; any
    /// other state registers a new pending request on the target.
    pub fn add_friend(&mut self, token: &str, other: &str) -> NetworkResult<()> {
        let login = self.session_user(token)?;

        let target = self.directory.get(other)?;
        if target.has_enemy(&login) {
            return Err(NetworkError::InvalidRelationship(target.name().to_string()));
        }
        if login == other {
            return Err(NetworkError::SelfRelationship("add themselves as a friend"));
        }

        let caller = self.directory.get(&login)?;
        if caller.is_friend(other) {
            return Err(NetworkError::AlreadyFriends);
        }
        if self.directory.get(other)?.has_pending_from(&login) {
            return Err(NetworkError::RequestAlreadyPending);
        }

        if caller.has_pending_from(other) {
            // They asked first: this call is the confirmation.
            self.directory.get_mut(&login)?.confirm_friend(other);
            self.directory.get_mut(other)?.confirm_friend(&login);
            debug!(a = %login, b = other, "friendship confirmed");
        } else {
            self.directory.get_mut(other)?.add_pending_request(login);
        }
        Ok(())
    }

    /// Check if two users are mutually confirmed friends.
    pub fn is_friend(&self, a: &str, b: &str) -> NetworkResult<bool> {
        let user_a = self.directory.get(a)?;
        let user_b = self.directory.get(b)?;
        Ok(user_a.is_friend(b) && user_b.is_friend(a))
    }

    /// A user's confirmed friends, in confirmation order.
    pub fn friends(&self, login: &str) -> NetworkResult<Vec<String>> {
        Ok(self.directory.get(login)?.friends().to_vec())
    }

    // =========================================================================
    // Fan/idol, crush, enemy
    // =========================================================================

    /// Shared validation for the asymmetric relations: the target must
    /// exist, must not be the caller, and must not have the caller marked
    /// as an enemy.
    fn validate_relation(
        &self,
        login: &str,
        target: &str,
        self_action: &'static str,
    ) -> NetworkResult<()> {
        let target_user = self.directory.get(target)?;
        if login == target {
            return Err(NetworkError::SelfRelationship(self_action));
        }
        if target_user.has_enemy(login) {
            return Err(NetworkError::InvalidRelationship(
                target_user.name().to_string(),
            ));
        }
        Ok(())
    }

    /// Follow another user: they become an idol of the caller, the caller a
    /// fan of theirs.
    pub fn add_idol(&mut self, token: &str, idol: &str) -> NetworkResult<()> {
        let login = self.session_user(token)?;
        self.validate_relation(&login, idol, "be their own idol")?;

        if self.directory.get(&login)?.is_fan_of(idol) {
            return Err(NetworkError::AlreadyRelated("an idol"));
        }

        self.directory.get_mut(&login)?.add_idol(idol);
        self.directory.get_mut(idol)?.add_fan(login);
        Ok(())
    }

    /// Check if `fan` follows `idol`. Lenient: an unknown fan login is
    /// simply not a fan.
    pub fn is_fan(&self, fan: &str, idol: &str) -> bool {
        self.directory
            .get(fan)
            .map(|user| user.is_fan_of(idol))
            .unwrap_or(false)
    }

    /// A user's fans, sorted. Lenient: an unknown login has no fans.
    pub fn fans(&self, login: &str) -> Vec<String> {
        self.directory
            .get(login)
            .map(|user| sorted(user.fans()))
            .unwrap_or_default()
    }

    /// Record a crush. If the target already has a crush on the caller,
    /// both receive one automatic system note, exactly once, now.
    pub fn add_crush(&mut self, token: &str, target: &str) -> NetworkResult<()> {
        let login = self.session_user(token)?;
        self.validate_relation(&login, target, "be their own crush")?;

        let caller = self.directory.get(&login)?;
        if caller.has_crush_on(target) {
            return Err(NetworkError::AlreadyRelated("a crush"));
        }
        let caller_name = caller.name().to_string();

        let target_user = self.directory.get(target)?;
        let target_name = target_user.name().to_string();
        let mutual = target_user.has_crush_on(&login);

        self.directory.get_mut(&login)?.add_crush(target);

        if mutual {
            self.directory.get_mut(&login)?.receive_message(DirectMessage::new(
                SYSTEM_SENDER,
                format!("{target_name} is your crush too!"),
            ));
            self.directory.get_mut(target)?.receive_message(DirectMessage::new(
                SYSTEM_SENDER,
                format!("{caller_name} is your crush too!"),
            ));
            debug!(a = %login, b = target, "mutual crush detected");
        }
        Ok(())
    }

    /// Check if the session's user has a crush on the given login.
    pub fn is_crush(&self, token: &str, target: &str) -> NetworkResult<bool> {
        let login = self.session_user(token)?;
        Ok(self.directory.get(&login)?.has_crush_on(target))
    }

    /// The session user's crushes, sorted.
    pub fn crushes(&self, token: &str) -> NetworkResult<Vec<String>> {
        let login = self.session_user(token)?;
        Ok(sorted(self.directory.get(&login)?.crushes()))
    }

    /// Declare an enemy. Blocks future friend/idol/crush/message operations
    /// initiated by the listed user; never dissolves existing relations.
    pub fn add_enemy(&mut self, token: &str, target: &str) -> NetworkResult<()> {
        let login = self.session_user(token)?;
        self.validate_relation(&login, target, "be their own enemy")?;

        if self.directory.get(&login)?.has_enemy(target) {
            return Err(NetworkError::AlreadyRelated("an enemy"));
        }

        self.directory.get_mut(&login)?.add_enemy(target);
        Ok(())
    }

    // =========================================================================
    // Messaging
    // =========================================================================

    /// Send a direct message to another user's inbox.
    pub fn send_message(&mut self, token: &str, recipient: &str, text: &str) -> NetworkResult<()> {
        let login = self.session_user(token)?;

        let target = self.directory.get(recipient)?;
        if target.has_enemy(&login) {
            return Err(NetworkError::InvalidRelationship(target.name().to_string()));
        }
        if login == recipient {
            return Err(NetworkError::SelfRelationship("send messages to themselves"));
        }

        self.directory
            .get_mut(recipient)?
            .receive_message(DirectMessage::new(login, text));
        Ok(())
    }

    /// Read the oldest direct message of the session's user.
    pub fn read_message(&mut self, token: &str) -> NetworkResult<String> {
        let login = self.session_user(token)?;
        self.directory
            .get_mut(&login)?
            .take_message()
            .map(|message| message.content)
            .ok_or(NetworkError::NoMessages)
    }

    /// Broadcast a message to every current member of a community,
    /// including the sender. Members joining later do not receive it.
    pub fn broadcast(&mut self, token: &str, community: &str, text: &str) -> NetworkResult<()> {
        let login = self.session_user(token)?;

        let members = self
            .communities
            .get(community)
            .ok_or(NetworkError::CommunityNotFound)?
            .members()
            .to_vec();

        let message = CommunityMessage::new(community, login, text);
        for member in members {
            if let Ok(user) = self.directory.get_mut(&member) {
                user.receive_community_message(message.clone());
            }
        }
        Ok(())
    }

    /// Read the oldest unread community message of the session's user,
    /// across all communities, in arrival order.
    pub fn read_community_message(&mut self, token: &str) -> NetworkResult<String> {
        let login = self.session_user(token)?;
        self.directory
            .get_mut(&login)?
            .take_community_message()
            .map(|message| message.content)
            .ok_or(NetworkError::NoMessages)
    }

    // =========================================================================
    // Communities
    // =========================================================================

    /// Create a community owned by the session's user.
    pub fn create_community(
        &mut self,
        token: &str,
        name: &str,
        description: &str,
    ) -> NetworkResult<()> {
        let login = self.session_user(token)?;

        if self.communities.contains_key(name) {
            return Err(NetworkError::CommunityAlreadyExists);
        }

        self.communities
            .insert(name.to_string(), Community::new(name, description, &login));
        self.directory.get_mut(&login)?.join_community(name);
        debug!(name, owner = %login, "community created");
        Ok(())
    }

    /// Join an existing community.
    pub fn join_community(&mut self, token: &str, name: &str) -> NetworkResult<()> {
        let login = self.session_user(token)?;

        let community = self
            .communities
            .get_mut(name)
            .ok_or(NetworkError::CommunityNotFound)?;
        if community.is_member(&login) {
            return Err(NetworkError::AlreadyMember);
        }

        community.add_member(&login);
        self.directory.get_mut(&login)?.join_community(name);
        Ok(())
    }

    /// Member logins of a community: owner first, then join order.
    pub fn community_members(&self, name: &str) -> NetworkResult<Vec<String>> {
        self.communities
            .get(name)
            .map(|community| community.members().to_vec())
            .ok_or(NetworkError::CommunityNotFound)
    }

    /// The owner of a community.
    pub fn community_owner(&self, name: &str) -> NetworkResult<String> {
        self.communities
            .get(name)
            .map(|community| community.owner().to_string())
            .ok_or(NetworkError::CommunityNotFound)
    }

    /// The description of a community.
    pub fn community_description(&self, name: &str) -> NetworkResult<String> {
        self.communities
            .get(name)
            .map(|community| community.description().to_string())
            .ok_or(NetworkError::CommunityNotFound)
    }

    /// Community names a user belongs to, in join order.
    pub fn communities_of(&self, login: &str) -> NetworkResult<Vec<String>> {
        Ok(self.directory.get(login)?.communities().to_vec())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Delete the session's user and cascade.
    ///
    /// Communities they own disappear for every member; their membership
    /// elsewhere is dropped; every other user's forward-looking relation
    /// sets are purged; all their sessions die. Delivered messages stay.
    pub fn remove_user(&mut self, token: &str) -> NetworkResult<()> {
        let login = self.session_user(token)?;
        self.directory.get(&login)?;

        let owned: Vec<String> = self
            .communities
            .values()
            .filter(|community| community.owner() == login)
            .map(|community| community.name().to_string())
            .collect();

        for name in &owned {
            if let Some(community) = self.communities.remove(name) {
                for member in community.members() {
                    if let Ok(user) = self.directory.get_mut(member) {
                        user.leave_community(name);
                    }
                }
            }
        }
        for community in self.communities.values_mut() {
            community.remove_member(&login);
        }

        for user in self.directory.iter_mut() {
            user.purge_relations_with(&login);
        }

        self.sessions.revoke_user(&login);
        self.directory.remove(&login);
        info!(login = %login, owned = owned.len(), "user removed");
        Ok(())
    }

    /// Clear every user, session, and community.
    pub fn reset(&mut self) {
        self.directory.clear();
        self.sessions.clear();
        self.communities.clear();
        info!("network state reset");
    }

    /// Repair referential integrity after loading a snapshot.
    ///
    /// Communities whose owner no longer resolves are discarded; unknown
    /// member logins are stripped; membership lists drop names of discarded
    /// communities.
    pub fn reconcile(&mut self) {
        let before = self.communities.len();
        let directory = &self.directory;
        self.communities
            .retain(|_, community| directory.contains(community.owner()));
        for community in self.communities.values_mut() {
            community.retain_members(|login| directory.contains(login));
        }

        let names: HashSet<String> = self.communities.keys().cloned().collect();
        for user in self.directory.iter_mut() {
            let stale: Vec<String> = user
                .communities()
                .iter()
                .filter(|name| !names.contains(*name))
                .cloned()
                .collect();
            for name in stale {
                user.leave_community(&name);
            }
        }

        let dropped = before - self.communities.len();
        if dropped > 0 {
            info!(dropped, "discarded communities with missing owners");
        }
    }
}

/// Sorted snapshot of a login set, for deterministic listings.
fn sorted(set: &HashSet<String>) -> Vec<String> {
    let mut logins: Vec<String> = set.iter().cloned().collect();
    logins.sort();
    logins
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network_with(users: &[&str]) -> Network {
        let mut network = Network::new();
        for login in users {
            let name = {
                let mut chars = login.chars();
                let first = chars.next().unwrap().to_uppercase().to_string();
                format!("{first}{}", chars.as_str())
            };
            network.create_user(login, "pw", &name).unwrap();
        }
        network
    }

    fn session(network: &mut Network, login: &str) -> String {
        network.authenticate(login, "pw").unwrap()
    }

    #[test]
    fn test_handshake_confirms_in_both_directions() {
        let mut network = network_with(&["ana", "bia"]);
        let ana = session(&mut network, "ana");
        let bia = session(&mut network, "bia");

        network.add_friend(&ana, "bia").unwrap();
        assert!(!network.is_friend("ana", "bia").unwrap());

        network.add_friend(&bia, "ana").unwrap();
        assert!(network.is_friend("ana", "bia").unwrap());
        assert!(network.is_friend("bia", "ana").unwrap());
        assert_eq!(network.friends("ana").unwrap(), ["bia"]);
        assert_eq!(network.friends("bia").unwrap(), ["ana"]);
    }

    #[test]
    fn test_duplicate_request_and_friendship() {
        let mut network = network_with(&["ana", "bia"]);
        let ana = session(&mut network, "ana");
        let bia = session(&mut network, "bia");

        network.add_friend(&ana, "bia").unwrap();
        assert_eq!(
            network.add_friend(&ana, "bia").unwrap_err(),
            NetworkError::RequestAlreadyPending
        );

        network.add_friend(&bia, "ana").unwrap();
        assert_eq!(
            network.add_friend(&ana, "bia").unwrap_err(),
            NetworkError::AlreadyFriends
        );
    }

    #[test]
    fn test_enemy_blocks_new_relations_but_not_existing() {
        let mut network = network_with(&["ana", "bia"]);
        let ana = session(&mut network, "ana");
        let bia = session(&mut network, "bia");

        network.add_friend(&ana, "bia").unwrap();
        network.add_friend(&bia, "ana").unwrap();

        network.add_enemy(&bia, "ana").unwrap();

        // Existing friendship survives the declaration.
        assert!(network.is_friend("ana", "bia").unwrap());

        // New positive relations from ana toward bia are blocked.
        assert_eq!(
            network.add_idol(&ana, "bia").unwrap_err(),
            NetworkError::InvalidRelationship("Bia".to_string())
        );
        assert_eq!(
            network.add_crush(&ana, "bia").unwrap_err(),
            NetworkError::InvalidRelationship("Bia".to_string())
        );
        assert_eq!(
            network.send_message(&ana, "bia", "oi").unwrap_err(),
            NetworkError::InvalidRelationship("Bia".to_string())
        );

        // The declaring side is unaffected.
        network.add_crush(&bia, "ana").unwrap();
    }

    #[test]
    fn test_mutual_crush_notifies_each_party_once() {
        let mut network = network_with(&["ana", "bia"]);
        let ana = session(&mut network, "ana");
        let bia = session(&mut network, "bia");

        network.add_crush(&ana, "bia").unwrap();
        assert_eq!(
            network.read_message(&ana).unwrap_err(),
            NetworkError::NoMessages
        );

        network.add_crush(&bia, "ana").unwrap();
        assert_eq!(network.read_message(&ana).unwrap(), "Bia is your crush too!");
        assert_eq!(network.read_message(&bia).unwrap(), "Ana is your crush too!");
        assert_eq!(
            network.read_message(&ana).unwrap_err(),
            NetworkError::NoMessages
        );
    }

    #[test]
    fn test_fan_idol_is_asymmetric() {
        let mut network = network_with(&["ana", "bia"]);
        let ana = session(&mut network, "ana");

        network.add_idol(&ana, "bia").unwrap();

        assert!(network.is_fan("ana", "bia"));
        assert!(!network.is_fan("bia", "ana"));
        assert_eq!(network.fans("bia"), ["ana"]);
        assert!(network.fans("ana").is_empty());
        assert_eq!(
            network.add_idol(&ana, "bia").unwrap_err(),
            NetworkError::AlreadyRelated("an idol")
        );
    }

    #[test]
    fn test_remove_user_cascades() {
        let mut network = network_with(&["ana", "bia", "caio"]);
        let ana = session(&mut network, "ana");
        let bia = session(&mut network, "bia");

        network.add_friend(&ana, "bia").unwrap();
        network.add_friend(&bia, "ana").unwrap();
        network.add_idol(&bia, "ana").unwrap();
        network.create_community(&ana, "c1", "d").unwrap();
        network.join_community(&bia, "c1").unwrap();

        network.remove_user(&ana).unwrap();

        assert!(!network.directory().contains("ana"));
        assert!(network.friends("bia").unwrap().is_empty());
        assert!(!network.is_fan("bia", "ana"));
        assert!(network.communities_of("bia").unwrap().is_empty());
        assert!(network.communities().is_empty());
        assert_eq!(
            network.add_friend(&ana, "caio").unwrap_err(),
            NetworkError::InvalidSession
        );
    }

    #[test]
    fn test_broadcast_reaches_current_members_only() {
        let mut network = network_with(&["ana", "bia", "caio"]);
        let ana = session(&mut network, "ana");
        let bia = session(&mut network, "bia");
        let caio = session(&mut network, "caio");

        network.create_community(&ana, "c1", "d").unwrap();
        network.join_community(&bia, "c1").unwrap();
        network.broadcast(&ana, "c1", "oi").unwrap();
        network.join_community(&caio, "c1").unwrap();

        assert_eq!(network.read_community_message(&ana).unwrap(), "oi");
        assert_eq!(network.read_community_message(&bia).unwrap(), "oi");
        assert_eq!(
            network.read_community_message(&caio).unwrap_err(),
            NetworkError::NoMessages
        );
    }

    #[test]
    fn test_reconcile_discards_orphan_communities() {
        let mut network = network_with(&["ana", "bia"]);
        let ana = session(&mut network, "ana");
        let bia = session(&mut network, "bia");
        network.create_community(&ana, "c1", "d").unwrap();
        network.join_community(&bia, "c1").unwrap();
        network.create_community(&bia, "c2", "d").unwrap();

        // Simulate a snapshot whose owner record vanished.
        network.directory.remove("ana");
        network.reconcile();

        assert!(!network.communities().contains_key("c1"));
        assert_eq!(network.community_members("c2").unwrap(), ["bia"]);
        assert_eq!(network.communities_of("bia").unwrap(), ["c2"]);
    }
}
