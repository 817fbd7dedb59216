//! Error types for network operations.
//!
//! Uses thiserror for ergonomic error definition.

use thiserror::Error;

/// Failures surfaced by operations on the social network state.
///
/// Every variant is local and non-retryable: the caller supplied something
/// the current state rejects. Persistence failures live in
/// [`crate::persist::PersistError`] and are composed at the service layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    /// A required argument was empty or blank.
    #[error("Invalid {0}.")]
    InvalidArgument(&'static str),

    /// An account with the requested login already exists.
    #[error("An account with that login already exists.")]
    UserAlreadyExists,

    /// The referenced login is not registered.
    #[error("User not registered.")]
    UserNotFound,

    /// Login/password pair did not match any account.
    ///
    /// Deliberately does not distinguish a missing account from a wrong
    /// password.
    #[error("Invalid login or password.")]
    AuthenticationFailed,

    /// The session token does not map to a live session.
    #[error("Invalid or expired session.")]
    InvalidSession,

    /// The profile has no value for the requested attribute.
    #[error("Attribute not set.")]
    AttributeNotSet,

    /// A user tried to relate to themselves; carries the rejected action.
    #[error("Users cannot {0}.")]
    SelfRelationship(&'static str),

    /// The two users are already confirmed friends.
    #[error("User is already a friend.")]
    AlreadyFriends,

    /// A friend request in this direction is already awaiting acceptance.
    #[error("User is already added as a friend, awaiting acceptance.")]
    RequestAlreadyPending,

    /// The target has marked the caller as an enemy; carries the target's
    /// display name.
    #[error("Invalid operation: {0} is your enemy.")]
    InvalidRelationship(String),

    /// The requested relation already exists; carries the relation name.
    #[error("User is already added as {0}.")]
    AlreadyRelated(&'static str),

    /// A community with the requested name already exists.
    #[error("A community with that name already exists.")]
    CommunityAlreadyExists,

    /// The referenced community is not registered.
    #[error("Community does not exist.")]
    CommunityNotFound,

    /// The user already belongs to the community.
    #[error("User is already a member of that community.")]
    AlreadyMember,

    /// The caller's message queue is empty.
    #[error("No messages.")]
    NoMessages,
}

/// Result type for network operations.
pub type NetworkResult<T> = std::result::Result<T, NetworkError>;
