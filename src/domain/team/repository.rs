//! Team repository trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::entity::{Team, TeamId, TeamRole};
use super::invite::{InviteId, TeamMemberInvite};
use super::member::{MemberId, TeamMember};
use crate::domain::page::{PageRequest, SortDirection};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Sortable columns for member listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberOrderBy {
    /// The joined user's display name
    #[default]
    Name,
    /// The member's role
    Role,
    /// When the member joined
    CreatedAt,
}

/// Sortable columns for invite listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InviteOrderBy {
    /// The invited email address
    #[default]
    Email,
    /// The role the invite grants
    Role,
    /// When the invite was created
    CreatedAt,
}

/// Query parameters for listing team members
#[derive(Debug, Clone, Default)]
pub struct MemberQuery {
    /// Case-insensitive filter on the member's user name
    pub term: Option<String>,
    /// Page to fetch
    pub page: PageRequest,
    /// Column to order by
    pub order_by: MemberOrderBy,
    /// Sort direction
    pub direction: SortDirection,
}

impl MemberQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = self.page.with_page(page);
        self
    }

    pub fn with_per_page(mut self, per_page: i64) -> Self {
        self.page = self.page.with_per_page(per_page);
        self
    }

    pub fn with_order_by(mut self, order_by: MemberOrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// The search term, with empty strings treated as no filter
    pub fn filter_term(&self) -> Option<&str> {
        self.term.as_deref().filter(|t| !t.is_empty())
    }
}

/// Query parameters for listing team member invites
#[derive(Debug, Clone, Default)]
pub struct InviteQuery {
    /// Case-insensitive filter on the invited email
    pub term: Option<String>,
    /// Page to fetch
    pub page: PageRequest,
    /// Column to order by
    pub order_by: InviteOrderBy,
    /// Sort direction
    pub direction: SortDirection,
}

impl InviteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = self.page.with_page(page);
        self
    }

    pub fn with_per_page(mut self, per_page: i64) -> Self {
        self.page = self.page.with_per_page(per_page);
        self
    }

    pub fn with_order_by(mut self, order_by: InviteOrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// The search term, with empty strings treated as no filter
    pub fn filter_term(&self) -> Option<&str> {
        self.term.as_deref().filter(|t| !t.is_empty())
    }
}

/// Repository for teams, their members and their pending invites
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Get a team by ID
    async fn get_team(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// Create a team together with its owner membership
    async fn create_team(&self, team: Team, owner_id: &UserId) -> Result<Team, DomainError>;

    /// Get a user's membership in a team, if any
    async fn get_membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Option<TeamMember>, DomainError>;

    /// List one page of a team's members
    async fn find_members(
        &self,
        team_id: &TeamId,
        query: &MemberQuery,
    ) -> Result<Vec<TeamMember>, DomainError>;

    /// Count a team's members matching the query filter
    async fn count_members(
        &self,
        team_id: &TeamId,
        query: &MemberQuery,
    ) -> Result<i64, DomainError>;

    /// Get a member by ID within a team
    async fn get_member(
        &self,
        team_id: &TeamId,
        member_id: &MemberId,
    ) -> Result<Option<TeamMember>, DomainError>;

    /// Delete a member from a team
    async fn delete_member(
        &self,
        team_id: &TeamId,
        member_id: &MemberId,
    ) -> Result<(), DomainError>;

    /// Change a member's role
    async fn update_member_role(
        &self,
        team_id: &TeamId,
        member_id: &MemberId,
        role: TeamRole,
    ) -> Result<TeamMember, DomainError>;

    /// List one page of a team's pending invites
    async fn find_invites(
        &self,
        team_id: &TeamId,
        query: &InviteQuery,
    ) -> Result<Vec<TeamMemberInvite>, DomainError>;

    /// Count a team's pending invites matching the query filter
    async fn count_invites(
        &self,
        team_id: &TeamId,
        query: &InviteQuery,
    ) -> Result<i64, DomainError>;

    /// Get an invite by ID within a team
    async fn get_invite(
        &self,
        team_id: &TeamId,
        invite_id: &InviteId,
    ) -> Result<Option<TeamMemberInvite>, DomainError>;

    /// Look up an invite by its signup token
    async fn get_invite_by_token(
        &self,
        token: &str,
    ) -> Result<Option<TeamMemberInvite>, DomainError>;

    /// Store new invites, skipping emails already belonging to a member or a
    /// pending invite of the same team
    async fn create_invites(
        &self,
        invites: Vec<TeamMemberInvite>,
    ) -> Result<Vec<TeamMemberInvite>, DomainError>;

    /// Delete an invite from a team
    async fn delete_invite(
        &self,
        team_id: &TeamId,
        invite_id: &InviteId,
    ) -> Result<(), DomainError>;

    /// Turn an invite into a membership and remove the invite
    async fn accept_invite(
        &self,
        invite: &TeamMemberInvite,
        user_id: &UserId,
    ) -> Result<TeamMember, DomainError>;
}
