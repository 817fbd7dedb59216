//! Social network engine: accounts, sessions, relationships, messaging,
//! and communities.
//!
//! This crate provides:
//! - User accounts with free-form profiles and uuid-token sessions
//! - The friend request/confirmation handshake plus fan/idol, crush, and
//!   enemy relations with their cross-cutting validation
//! - Direct-message and community-broadcast inboxes (strict FIFO)
//! - Versioned JSON snapshot persistence with load-time reconciliation
//!
//! # Quick Start
//!
//! ```ignore
//! use mingle_core::NetworkService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut service = NetworkService::open("mingle_data.json").await?;
//!
//!     service.create_user("ana", "secret", "Ana").await?;
//!     service.create_user("bia", "secret", "Bia").await?;
//!
//!     let ana = service.login("ana", "secret")?;
//!     let bia = service.login("bia", "secret")?;
//!
//!     service.add_friend(&ana, "bia").await?;
//!     service.add_friend(&bia, "ana").await?;
//!     assert!(service.is_friend("ana", "bia")?);
//!     Ok(())
//! }
//! ```

pub mod community;
pub mod directory;
pub mod error;
pub mod message;
pub mod network;
pub mod persist;
pub mod profile;
pub mod service;
pub mod session;
pub mod user;

// Primary public API
pub use community::Community;
pub use directory::UserDirectory;
pub use error::{NetworkError, NetworkResult};
pub use message::{CommunityMessage, DirectMessage};
pub use network::{Network, SYSTEM_SENDER};
pub use persist::{FileStore, PersistError, SavedNetwork};
pub use profile::Profile;
pub use service::{NetworkService, ServiceError, ServiceResult};
pub use session::SessionRegistry;
pub use user::User;
