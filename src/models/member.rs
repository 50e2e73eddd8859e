//! Group member model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::MemberId;

/// A person taking part in a group's shared expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,

    /// Display name, unique within the group (case-insensitive)
    pub name: String,

    pub joined_at: DateTime<Utc>,
}

impl Member {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(),
            name: name.into(),
            joined_at: Utc::now(),
        }
    }

    /// Normalize a member name for matching
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Check if this member matches a name (case-insensitive) or an ID
    pub fn matches(&self, query: &str) -> bool {
        Self::normalize_name(&self.name) == Self::normalize_name(query) || self.id.matches(query)
    }

    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.name.trim().is_empty() {
            return Err(MemberValidationError::EmptyName);
        }

        if self.name.chars().count() > 50 {
            return Err(MemberValidationError::NameTooLong(self.name.chars().count()));
        }

        Ok(())
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for members
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for MemberValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Member name cannot be empty"),
            Self::NameTooLong(len) => write!(f, "Member name too long ({} chars, max 50)", len),
        }
    }
}

impl std::error::Error for MemberValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_name_case_insensitive() {
        let member = Member::new("Asha");
        assert!(member.matches("asha"));
        assert!(member.matches("  ASHA "));
        assert!(!member.matches("Ravi"));
    }

    #[test]
    fn test_matches_short_id() {
        let member = Member::new("Asha");
        assert!(member.matches(&member.id.to_string()));
    }

    #[test]
    fn test_validation() {
        let mut member = Member::new("Valid");
        assert!(member.validate().is_ok());

        member.name = "   ".into();
        assert_eq!(member.validate(), Err(MemberValidationError::EmptyName));

        member.name = "x".repeat(51);
        assert!(matches!(
            member.validate(),
            Err(MemberValidationError::NameTooLong(51))
        ));
    }
}
