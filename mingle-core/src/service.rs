//! NetworkService - the primary public API for the social network.
//!
//! This module wraps the in-memory [`Network`] and the snapshot
//! [`FileStore`] into a single facade: load-or-fresh on open, persist after
//! every mutation, and render collection results the way callers expect.

use crate::error::NetworkError;
use crate::network::Network;
use crate::persist::{FileStore, PersistError};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors from NetworkService operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Network(#[from] NetworkError),

    /// Persistence failure is fatal: the in-memory mutation stands, but the
    /// snapshot on disk no longer reflects it and there is no rollback.
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Result type for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// A social network instance bound to a snapshot file.
///
/// This is the main entry point. It manages:
/// - The in-memory state (users, sessions, relations, communities)
/// - Snapshot persistence after every mutating operation
///
/// Every operation runs to completion before the next begins; the service
/// assumes a single logical caller.
pub struct NetworkService {
    network: Network,
    store: FileStore,
}

impl NetworkService {
    /// Open a service on the given snapshot path, loading persisted state
    /// when a usable snapshot exists and starting fresh otherwise.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let store = FileStore::new(path.as_ref());
        let network = match store.load().await? {
            Some(network) => {
                info!(path = %store.path().display(), "loaded persisted network state");
                network
            }
            None => Network::new(),
        };
        Ok(Self { network, store })
    }

    /// Get a reference to the in-memory state.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Get a mutable reference to the in-memory state.
    ///
    /// Use with caution - direct modifications bypass persistence.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Persist the current state, surfacing failure as fatal.
    async fn persist(&self) -> ServiceResult<()> {
        self.store.save(&self.network).await?;
        Ok(())
    }

    // =========================================================================
    // Accounts and sessions
    // =========================================================================

    /// Register a new account.
    pub async fn create_user(
        &mut self,
        login: &str,
        password: &str,
        name: &str,
    ) -> ServiceResult<()> {
        self.network.create_user(login, password, name)?;
        self.persist().await
    }

    /// Authenticate and open a session, returning the token.
    ///
    /// Sessions are ephemeral, so nothing is persisted here.
    pub fn login(&mut self, login: &str, password: &str) -> ServiceResult<String> {
        Ok(self.network.authenticate(login, password)?)
    }

    /// Read a profile attribute of any user (`"name"` is virtual).
    pub fn attribute(&self, login: &str, attribute: &str) -> ServiceResult<String> {
        Ok(self.network.attribute(login, attribute)?)
    }

    /// Write a profile attribute of the session's user.
    pub async fn set_attribute(
        &mut self,
        token: &str,
        attribute: &str,
        value: &str,
    ) -> ServiceResult<()> {
        self.network.set_attribute(token, attribute, value)?;
        self.persist().await
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    /// Request or confirm friendship.
    pub async fn add_friend(&mut self, token: &str, other: &str) -> ServiceResult<()> {
        self.network.add_friend(token, other)?;
        self.persist().await
    }

    /// Check mutual friendship.
    pub fn is_friend(&self, a: &str, b: &str) -> ServiceResult<bool> {
        Ok(self.network.is_friend(a, b)?)
    }

    /// A user's confirmed friends, rendered in confirmation order.
    pub fn friends(&self, login: &str) -> ServiceResult<String> {
        Ok(render(&self.network.friends(login)?))
    }

    /// Follow another user.
    pub async fn add_idol(&mut self, token: &str, idol: &str) -> ServiceResult<()> {
        self.network.add_idol(token, idol)?;
        self.persist().await
    }

    /// Check if `fan` follows `idol`.
    pub fn is_fan(&self, fan: &str, idol: &str) -> bool {
        self.network.is_fan(fan, idol)
    }

    /// A user's fans, rendered.
    pub fn fans(&self, login: &str) -> String {
        render(&self.network.fans(login))
    }

    /// Record a crush; mutual crushes notify both parties.
    pub async fn add_crush(&mut self, token: &str, target: &str) -> ServiceResult<()> {
        self.network.add_crush(token, target)?;
        self.persist().await
    }

    /// Check if the session's user has a crush on the given login.
    pub fn is_crush(&self, token: &str, target: &str) -> ServiceResult<bool> {
        Ok(self.network.is_crush(token, target)?)
    }

    /// The session user's crushes, rendered.
    pub fn crushes(&self, token: &str) -> ServiceResult<String> {
        Ok(render(&self.network.crushes(token)?))
    }

    /// Declare an enemy.
    pub async fn add_enemy(&mut self, token: &str, target: &str) -> ServiceResult<()> {
        self.network.add_enemy(token, target)?;
        self.persist().await
    }

    // =========================================================================
    // Messaging
    // =========================================================================

    /// Send a direct message.
    pub async fn send_message(
        &mut self,
        token: &str,
        recipient: &str,
        text: &str,
    ) -> ServiceResult<()> {
        self.network.send_message(token, recipient, text)?;
        self.persist().await
    }

    /// Read the oldest direct message. Dequeues, so the new queue state is
    /// persisted.
    pub async fn read_message(&mut self, token: &str) -> ServiceResult<String> {
        let content = self.network.read_message(token)?;
        self.persist().await?;
        Ok(content)
    }

    /// Broadcast to every current member of a community.
    pub async fn broadcast(
        &mut self,
        token: &str,
        community: &str,
        text: &str,
    ) -> ServiceResult<()> {
        self.network.broadcast(token, community, text)?;
        self.persist().await
    }

    /// Read the oldest unread community message.
    pub async fn read_community_message(&mut self, token: &str) -> ServiceResult<String> {
        let content = self.network.read_community_message(token)?;
        self.persist().await?;
        Ok(content)
    }

    // =========================================================================
    // Communities
    // =========================================================================

    /// Create a community owned by the session's user.
    pub async fn create_community(
        &mut self,
        token: &str,
        name: &str,
        description: &str,
    ) -> ServiceResult<()> {
        self.network.create_community(token, name, description)?;
        self.persist().await
    }

    /// Join an existing community.
    pub async fn join_community(&mut self, token: &str, name: &str) -> ServiceResult<()> {
        self.network.join_community(token, name)?;
        self.persist().await
    }

    /// A community's members, rendered owner-first.
    pub fn community_members(&self, name: &str) -> ServiceResult<String> {
        Ok(render(&self.network.community_members(name)?))
    }

    /// A community's owner.
    pub fn community_owner(&self, name: &str) -> ServiceResult<String> {
        Ok(self.network.community_owner(name)?)
    }

    /// A community's description.
    pub fn community_description(&self, name: &str) -> ServiceResult<String> {
        Ok(self.network.community_description(name)?)
    }

    /// The communities a user belongs to, rendered in join order.
    pub fn communities_of(&self, login: &str) -> ServiceResult<String> {
        Ok(render(&self.network.communities_of(login)?))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Delete the session's user with full cascade.
    pub async fn remove_user(&mut self, token: &str) -> ServiceResult<()> {
        self.network.remove_user(token)?;
        self.persist().await
    }

    /// Clear all state, in memory and on disk.
    pub async fn reset(&mut self) -> ServiceResult<()> {
        self.network.reset();
        self.store.reset().await?;
        Ok(())
    }
}

/// Render a collection result as `{a,b,c}`, `{}` when empty.
fn render(items: &[String]) -> String {
    format!("{{{}}}", items.join(","))
}
