//! Snapshot persistence for the network state.
//!
//! Serializes users and communities as a versioned JSON snapshot. Sessions
//! are ephemeral and never written. A snapshot that cannot be decoded is
//! quarantined (renamed next to the original) so a fresh system can start
//! without destroying evidence.

use crate::community::Community;
use crate::directory::UserDirectory;
use crate::message::unix_now;
use crate::network::Network;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current snapshot format version.
const SAVE_VERSION: u32 = 1;

/// A persisted snapshot of the durable state: users and communities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedNetwork {
    /// Snapshot format version for compatibility checking.
    pub version: u32,

    /// Unix seconds when the snapshot was taken.
    pub saved_at: u64,

    /// The complete user directory.
    pub users: UserDirectory,

    /// All communities, keyed by name.
    pub communities: HashMap<String, Community>,
}

impl SavedNetwork {
    /// Take a deep snapshot of a network's durable state.
    pub fn from_network(network: &Network) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at: unix_now(),
            users: network.directory().clone(),
            communities: network.communities().clone(),
        }
    }

    /// Decode a snapshot, checking the format version.
    pub fn from_json(content: &str) -> Result<Self, PersistError> {
        let saved: Self = serde_json::from_str(content)?;

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }

    /// Rebuild a live network. Sessions start empty and referential
    /// integrity is repaired (communities with missing owners are dropped).
    pub fn into_network(self) -> Network {
        Network::from_parts(self.users, self.communities)
    }
}

/// File-backed store for network snapshots.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store writing to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state, or `None` when there is nothing usable.
    ///
    /// A missing file means a fresh system. A file that fails to decode is
    /// renamed to `<path>.corrupt_<unix-secs>` and also treated as fresh.
    pub async fn load(&self) -> Result<Option<Network>, PersistError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match SavedNetwork::from_json(&content) {
            Ok(saved) => Ok(Some(saved.into_network())),
            Err(err) => {
                let quarantine = quarantine_path(&self.path);
                warn!(
                    path = %self.path.display(),
                    quarantine = %quarantine.display(),
                    %err,
                    "snapshot unreadable, starting fresh"
                );
                fs::rename(&self.path, &quarantine).await?;
                Ok(None)
            }
        }
    }

    /// Persist a full snapshot of the network's durable state.
    pub async fn save(&self, network: &Network) -> Result<(), PersistError> {
        let saved = SavedNetwork::from_network(network);
        let content = serde_json::to_string_pretty(&saved)?;
        fs::write(&self.path, content).await?;
        debug!(path = %self.path.display(), users = saved.users.len(), "snapshot written");
        Ok(())
    }

    /// Delete the persisted snapshot, if any.
    pub async fn reset(&self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Quarantine name for an unreadable snapshot.
fn quarantine_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".corrupt_{}", unix_now()));
    PathBuf::from(name)
}
