//! The user directory: owns every account record.

use crate::error::{NetworkError, NetworkResult};
use crate::user::User;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Map of all registered users, keyed by login.
///
/// Enforces login uniqueness and the blank-credential rules; everything
/// above (sessions, relations, messaging) resolves users through it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDirectory {
    users: HashMap<String, User>,
}

impl UserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new account.
    ///
    /// Fails on blank login or password, or when the login is taken.
    pub fn create_user(&mut self, login: &str, password: &str, name: &str) -> NetworkResult<()> {
        if login.trim().is_empty() {
            return Err(NetworkError::InvalidArgument("login"));
        }
        if password.trim().is_empty() {
            return Err(NetworkError::InvalidArgument("password"));
        }
        if self.users.contains_key(login) {
            return Err(NetworkError::UserAlreadyExists);
        }

        self.users
            .insert(login.to_string(), User::new(login, password, name));
        Ok(())
    }

    /// Check a login/password pair without revealing which half failed.
    pub fn verify_credentials(&self, login: &str, password: &str) -> NetworkResult<()> {
        match self.users.get(login) {
            Some(user) if user.password() == password => Ok(()),
            _ => Err(NetworkError::AuthenticationFailed),
        }
    }

    /// Check whether a login is registered.
    pub fn contains(&self, login: &str) -> bool {
        self.users.contains_key(login)
    }

    /// Look up a user.
    pub fn get(&self, login: &str) -> NetworkResult<&User> {
        self.users.get(login).ok_or(NetworkError::UserNotFound)
    }

    /// Look up a user mutably.
    pub fn get_mut(&mut self, login: &str) -> NetworkResult<&mut User> {
        self.users.get_mut(login).ok_or(NetworkError::UserNotFound)
    }

    /// Delete a user record.
    pub fn remove(&mut self, login: &str) -> Option<User> {
        self.users.remove(login)
    }

    /// Iterate every user.
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// Iterate every user mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut User> {
        self.users.values_mut()
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Check if the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.users.clear();
    }
}
