//! Group model
//!
//! A group is a named set of members who share expenses. Member order is the
//! order in which people joined and is used wherever output needs a stable
//! member order (balance tables, equal-split remainders).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, MemberId};
use super::member::Member;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,

    pub name: String,

    #[serde(default)]
    pub members: Vec<Member>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: GroupId::new(),
            name: name.into(),
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Normalize a group name for matching
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    pub fn matches(&self, query: &str) -> bool {
        Self::normalize_name(&self.name) == Self::normalize_name(query) || self.id.matches(query)
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Find a member by name or ID
    pub fn find_member(&self, query: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.matches(query))
    }

    pub fn has_member(&self, id: MemberId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    /// Display name for a member ID, falling back to the short ID
    pub fn member_name(&self, id: MemberId) -> String {
        self.member(id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members.iter().map(|m| m.id).collect()
    }

    /// Add a member; rejects names already used in this group
    pub fn add_member(&mut self, member: Member) -> Result<(), GroupValidationError> {
        let normalized = Member::normalize_name(&member.name);
        if self
            .members
            .iter()
            .any(|m| Member::normalize_name(&m.name) == normalized)
        {
            return Err(GroupValidationError::DuplicateMember(member.name));
        }
        self.members.push(member);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn remove_member(&mut self, id: MemberId) -> Option<Member> {
        let index = self.members.iter().position(|m| m.id == id)?;
        self.updated_at = Utc::now();
        Some(self.members.remove(index))
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), GroupValidationError> {
        if self.name.trim().is_empty() {
            return Err(GroupValidationError::EmptyName);
        }

        if self.name.chars().count() > 100 {
            return Err(GroupValidationError::NameTooLong(self.name.chars().count()));
        }

        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    EmptyName,
    NameTooLong(usize),
    DuplicateMember(String),
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Group name cannot be empty"),
            Self::NameTooLong(len) => write!(f, "Group name too long ({} chars, max 100)", len),
            Self::DuplicateMember(name) => {
                write!(f, "A member named '{}' is already in this group", name)
            }
        }
    }
}

impl std::error::Error for GroupValidationError {}
