//! Team member entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{TeamId, TeamRole};
use crate::domain::user::{UserId, UserSummary};

/// Unique identifier for a team membership
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(String);

impl MemberId {
    /// Create a new member ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique ID
    pub fn generate() -> Self {
        Self(format!("member-{}", uuid::Uuid::new_v4()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MemberId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MemberId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Membership of a user in a team
///
/// Carries the joined user name/email so listings can be rendered without a
/// second lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    /// Unique identifier
    id: MemberId,
    /// Team this membership belongs to
    team_id: TeamId,
    /// The member's user ID
    user_id: UserId,
    /// Role within the team
    role: TeamRole,
    /// When the user joined the team
    created_at: DateTime<Utc>,
    /// Joined user name/email
    user: UserSummary,
}

impl TeamMember {
    /// Create a new membership
    pub fn new(team_id: TeamId, user_id: UserId, role: TeamRole, user: UserSummary) -> Self {
        Self {
            id: MemberId::generate(),
            team_id,
            user_id,
            role,
            created_at: Utc::now(),
            user,
        }
    }

    /// Rebuild a member from stored fields
    pub fn from_parts(
        id: MemberId,
        team_id: TeamId,
        user_id: UserId,
        role: TeamRole,
        created_at: DateTime<Utc>,
        user: UserSummary,
    ) -> Self {
        Self {
            id,
            team_id,
            user_id,
            role,
            created_at,
            user,
        }
    }

    pub fn id(&self) -> &MemberId {
        &self.id
    }

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn role(&self) -> TeamRole {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn user(&self) -> &UserSummary {
        &self.user
    }

    /// Replace the member's role
    pub fn set_role(&mut self, role: TeamRole) {
        self.role = role;
    }
}
