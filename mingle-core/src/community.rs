//! Communities and their membership.

use serde::{Deserialize, Serialize};

/// A named community with an owner and an ordered member list.
///
/// Members are logins; the owner is always a member and always first in the
/// list. Referencing users by login keeps the snapshot acyclic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    name: String,
    description: String,
    owner: String,
    members: Vec<String>,
}

impl Community {
    /// Create a community; the owner is automatically the first member.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        let owner = owner.into();
        Self {
            name: name.into(),
            description: description.into(),
            members: vec![owner.clone()],
            owner,
        }
    }

    /// The unique community name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The free-form description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The owner's login.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Member logins, owner first, then join order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Check if a login is a member.
    pub fn is_member(&self, login: &str) -> bool {
        self.members.iter().any(|m| m == login)
    }

    /// Add a member, preserving join order. No-op if already present.
    pub fn add_member(&mut self, login: impl Into<String>) {
        let login = login.into();
        if !self.is_member(&login) {
            self.members.push(login);
        }
    }

    /// Remove a member.
    pub fn remove_member(&mut self, login: &str) {
        self.members.retain(|m| m != login);
    }

    /// Drop members whose login no longer resolves, keeping the owner first.
    ///
    /// Used when reconciling a loaded snapshot against the user directory.
    pub fn retain_members<F>(&mut self, mut exists: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.members.retain(|m| exists(m));
        if !self.is_member(&self.owner) {
            self.members.insert(0, self.owner.clone());
        }
    }
}
