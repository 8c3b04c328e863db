//! Team member invite entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{TeamId, TeamRole};

/// Unique identifier for a team member invite
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InviteId(String);

impl InviteId {
    /// Create a new invite ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique ID
    pub fn generate() -> Self {
        Self(format!("invite-{}", uuid::Uuid::new_v4()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for InviteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for InviteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for InviteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pending invitation for an email address to join a team
///
/// The signup token is only populated on freshly created invites so it can be
/// delivered to the recipient. It is never serialized and invites read back
/// from storage leave it unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberInvite {
    /// Unique identifier
    id: InviteId,
    /// Team the invite belongs to
    team_id: TeamId,
    /// Invited email address, stored lowercase
    email: String,
    /// Role the member will receive on acceptance
    role: TeamRole,
    /// Signup token, present only on newly created invites
    #[serde(skip_serializing, default)]
    token: Option<String>,
    /// When the invite was created
    created_at: DateTime<Utc>,
}

impl TeamMemberInvite {
    /// Create a new invite with a freshly issued token
    pub fn new(team_id: TeamId, email: impl Into<String>, role: TeamRole, token: String) -> Self {
        Self {
            id: InviteId::generate(),
            team_id,
            email: email.into().to_lowercase(),
            role,
            token: Some(token),
            created_at: Utc::now(),
        }
    }

    /// Rebuild an invite from stored fields, without the token
    pub fn from_parts(
        id: InviteId,
        team_id: TeamId,
        email: String,
        role: TeamRole,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            team_id,
            email,
            role,
            token: None,
            created_at,
        }
    }

    pub fn id(&self) -> &InviteId {
        &self.id
    }

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> TeamRole {
        self.role
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team_id() -> TeamId {
        TeamId::new("my-team").unwrap()
    }

    #[test]
    fn test_invite_id_generate() {
        let id = InviteId::generate();
        assert!(id.as_str().starts_with("invite-"));
    }

    #[test]
    fn test_invite_creation_lowercases_email() {
        let invite = TeamMemberInvite::new(
            team_id(),
            "Bob@Example.COM",
            TeamRole::Member,
            "tok".to_string(),
        );

        assert_eq!(invite.email(), "bob@example.com");
        assert_eq!(invite.token(), Some("tok"));
    }

    #[test]
    fn test_invite_from_parts_has_no_token() {
        let invite = TeamMemberInvite::from_parts(
            InviteId::new("invite-1"),
            team_id(),
            "bob@example.com".to_string(),
            TeamRole::Admin,
            Utc::now(),
        );

        assert_eq!(invite.token(), None);
        assert_eq!(invite.role(), TeamRole::Admin);
    }

    #[test]
    fn test_invite_serialization_excludes_token() {
        let invite = TeamMemberInvite::new(
            team_id(),
            "bob@example.com",
            TeamRole::Member,
            "secret-token".to_string(),
        );
        let json = serde_json::to_value(&invite).unwrap();

        assert!(json.get("token").is_none());
        assert_eq!(json["email"], "bob@example.com");
    }
}
