//! Team service for membership and invite management

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::team::{
    validate_invite_email, InviteId, InviteQuery, MemberId, MemberQuery, Team, TeamId, TeamMember,
    TeamMemberInvite, TeamRepository, TeamRole,
};
use crate::domain::user::UserId;
use crate::domain::{DomainError, Page};
use crate::infrastructure::team::token::InviteTokenGenerator;

/// Request for creating a new team
#[derive(Debug, Clone)]
pub struct CreateTeamRequest {
    pub id: String,
    pub name: String,
}

/// A single invite within a batch
#[derive(Debug, Clone)]
pub struct InviteRequest {
    pub email: String,
    pub role: TeamRole,
}

/// Request for inviting members to a team
#[derive(Debug, Clone)]
pub struct CreateInvitesRequest {
    pub invites: Vec<InviteRequest>,
}

/// Team service for membership and invite management
///
/// Every operation takes the acting user's ID and resolves their membership in
/// the target team before touching any data. Non-members get a not-found
/// error, so they cannot tell whether the team exists at all.
#[derive(Debug)]
pub struct TeamService<R: TeamRepository> {
    repository: Arc<R>,
    tokens: InviteTokenGenerator,
}

impl<R: TeamRepository> TeamService<R> {
    /// Create a new team service
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            tokens: InviteTokenGenerator::new(),
        }
    }

    /// Create a new team owned by the acting user
    pub async fn create_team(
        &self,
        owner_id: &str,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError> {
        info!(owner = %owner_id, id = %request.id, name = %request.name, "Creating team");

        let owner_id =
            UserId::new(owner_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        let team_id =
            TeamId::new(&request.id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        let team =
            Team::new(team_id, &request.name).map_err(|e| DomainError::validation(e.to_string()))?;

        self.repository.create_team(team, &owner_id).await
    }

    /// Get a team, visible only to its members
    pub async fn get_team(&self, user_id: &str, team_id: &str) -> Result<Team, DomainError> {
        let user_id = UserId::new(user_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        let team_id = TeamId::new(team_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        self.require_membership(&team_id, &user_id).await?;

        self.repository
            .get_team(&team_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", team_id)))
    }

    /// List one page of a team's members together with the total count
    pub async fn find_members(
        &self,
        user_id: &str,
        team_id: &str,
        query: MemberQuery,
    ) -> Result<Page<TeamMember>, DomainError> {
        let user_id = UserId::new(user_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        let team_id = TeamId::new(team_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        self.require_membership(&team_id, &user_id).await?;

        debug!(team = %team_id, page = query.page.current_page(), "Listing team members");

        // Page and count run concurrently
        let (members, count) = tokio::try_join!(
            self.repository.find_members(&team_id, &query),
            self.repository.count_members(&team_id, &query),
        )?;

        Ok(Page::new(members, count, &query.page))
    }

    /// List one page of a team's pending invites together with the total count
    ///
    /// Returned invites never carry their signup token.
    pub async fn find_member_invites(
        &self,
        user_id: &str,
        team_id: &str,
        query: InviteQuery,
    ) -> Result<Page<TeamMemberInvite>, DomainError> {
        let user_id = UserId::new(user_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        let team_id = TeamId::new(team_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        self.require_membership(&team_id, &user_id).await?;

        debug!(team = %team_id, page = query.page.current_page(), "Listing team invites");

        // Page and count run concurrently
        let (invites, count) = tokio::try_join!(
            self.repository.find_invites(&team_id, &query),
            self.repository.count_invites(&team_id, &query),
        )?;

        Ok(Page::new(invites, count, &query.page))
    }

    /// Invite a batch of email addresses to a team
    ///
    /// Emails already belonging to a member or a pending invite are skipped.
    /// Returns the invites that were actually created, tokens included so they
    /// can be delivered to the recipients.
    pub async fn create_invites(
        &self,
        user_id: &str,
        team_id: &str,
        request: CreateInvitesRequest,
    ) -> Result<Vec<TeamMemberInvite>, DomainError> {
        info!(team = %team_id, count = request.invites.len(), "Creating team invites");

        let user_id = UserId::new(user_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        let team_id = TeamId::new(team_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        self.require_manager(&team_id, &user_id).await?;

        if request.invites.is_empty() {
            return Err(DomainError::validation("At least one invite is required"));
        }

        let mut invites = Vec::with_capacity(request.invites.len());

        for invite in request.invites {
            validate_invite_email(&invite.email)
                .map_err(|e| DomainError::validation(e.to_string()))?;

            if invite.role == TeamRole::Owner {
                return Err(DomainError::validation("Invites cannot grant the owner role"));
            }

            invites.push(TeamMemberInvite::new(
                team_id.clone(),
                invite.email,
                invite.role,
                self.tokens.generate(),
            ));
        }

        self.repository.create_invites(invites).await
    }

    /// Revoke a pending invite
    pub async fn revoke_invite(
        &self,
        user_id: &str,
        team_id: &str,
        invite_id: &str,
    ) -> Result<(), DomainError> {
        info!(team = %team_id, invite = %invite_id, "Revoking team invite");

        let user_id = UserId::new(user_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        let team_id = TeamId::new(team_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        self.require_manager(&team_id, &user_id).await?;

        self.repository
            .delete_invite(&team_id, &InviteId::new(invite_id))
            .await
    }

    /// Accept an invite using its signup token
    ///
    /// The acting user's email must match the invited address.
    pub async fn accept_invite(
        &self,
        token: &str,
        user_id: &str,
        email: &str,
    ) -> Result<TeamMember, DomainError> {
        let user_id = UserId::new(user_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        let invite = self
            .repository
            .get_invite_by_token(token)
            .await?
            .ok_or_else(|| DomainError::not_found("Invite not found"))?;

        if !invite.email().eq_ignore_ascii_case(email) {
            return Err(DomainError::forbidden(
                "Invite was issued for a different email address",
            ));
        }

        if self
            .repository
            .get_membership(invite.team_id(), &user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(format!(
                "User '{}' is already a member of team '{}'",
                user_id,
                invite.team_id()
            )));
        }

        info!(team = %invite.team_id(), user = %user_id, "Accepting team invite");

        self.repository.accept_invite(&invite, &user_id).await
    }

    /// Remove a member from a team
    pub async fn remove_member(
        &self,
        user_id: &str,
        team_id: &str,
        member_id: &str,
    ) -> Result<(), DomainError> {
        info!(team = %team_id, member = %member_id, "Removing team member");

        let user_id = UserId::new(user_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        let team_id = TeamId::new(team_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        let actor = self.require_manager(&team_id, &user_id).await?;

        let member_id = MemberId::new(member_id);
        let target = self
            .repository
            .get_member(&team_id, &member_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Team member '{}' not found", member_id))
            })?;

        if target.role() == TeamRole::Owner {
            return Err(DomainError::forbidden("The team owner cannot be removed"));
        }

        if !actor.role().has_privilege_over(&target.role()) {
            return Err(DomainError::forbidden(
                "Insufficient privileges to remove this member",
            ));
        }

        self.repository.delete_member(&team_id, &member_id).await
    }

    /// Change a member's role
    pub async fn update_member_role(
        &self,
        user_id: &str,
        team_id: &str,
        member_id: &str,
        role: TeamRole,
    ) -> Result<TeamMember, DomainError> {
        info!(team = %team_id, member = %member_id, role = %role, "Updating member role");

        let user_id = UserId::new(user_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        let team_id = TeamId::new(team_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        let actor = self.require_manager(&team_id, &user_id).await?;

        if role == TeamRole::Owner {
            return Err(DomainError::validation(
                "Ownership cannot be granted through role updates",
            ));
        }

        let member_id = MemberId::new(member_id);
        let target = self
            .repository
            .get_member(&team_id, &member_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Team member '{}' not found", member_id))
            })?;

        if target.role() == TeamRole::Owner {
            return Err(DomainError::forbidden(
                "The team owner's role cannot be changed",
            ));
        }

        if !actor.role().has_privilege_over(&target.role()) {
            return Err(DomainError::forbidden(
                "Insufficient privileges to change this member's role",
            ));
        }

        self.repository
            .update_member_role(&team_id, &member_id, role)
            .await
    }

    /// Resolve the acting user's membership, mapping a miss to not-found
    async fn require_membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<TeamMember, DomainError> {
        self.repository
            .get_membership(team_id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", team_id)))
    }

    /// Resolve the acting user's membership and require a managing role
    async fn require_manager(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<TeamMember, DomainError> {
        let member = self.require_membership(team_id, user_id).await?;

        if !member.role().can_manage_members() {
            return Err(DomainError::forbidden(
                "Managing members requires the owner or admin role",
            ));
        }

        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::SortDirection;
    use crate::domain::team::mock::MockTeamRepository;
    use crate::domain::team::{InviteOrderBy, MemberOrderBy};
    use crate::domain::user::UserSummary;

    fn create_service() -> (TeamService<MockTeamRepository>, Arc<MockTeamRepository>) {
        let repository = Arc::new(MockTeamRepository::new());
        let service = TeamService::new(repository.clone());
        (service, repository)
    }

    fn seed_user(repo: &MockTeamRepository, id: &str, name: &str) {
        let user_id = UserId::new(id).unwrap();
        repo.insert_user(
            &user_id,
            UserSummary::new(name, format!("{}@example.com", id)),
        );
    }

    async fn create_team_with_owner(
        service: &TeamService<MockTeamRepository>,
        repo: &MockTeamRepository,
    ) {
        seed_user(repo, "alice", "Alice Smith");
        service
            .create_team(
                "alice",
                CreateTeamRequest {
                    id: "test-team".to_string(),
                    name: "Test Team".to_string(),
                },
            )
            .await
            .unwrap();
    }

    async fn add_member(
        service: &TeamService<MockTeamRepository>,
        repo: &MockTeamRepository,
        id: &str,
        name: &str,
        role: TeamRole,
    ) -> TeamMember {
        seed_user(repo, id, name);
        let email = format!("{}@example.com", id);

        let invites = service
            .create_invites(
                "alice",
                "test-team",
                CreateInvitesRequest {
                    invites: vec![InviteRequest {
                        email: email.clone(),
                        role,
                    }],
                },
            )
            .await
            .unwrap();

        let token = invites[0].token().unwrap().to_string();
        service.accept_invite(&token, id, &email).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_team_adds_owner_membership() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;

        let page = service
            .find_members("alice", "test-team", MemberQuery::new())
            .await
            .unwrap();

        assert_eq!(page.count, 1);
        assert_eq!(page.data[0].role(), TeamRole::Owner);
        assert_eq!(page.data[0].user().name(), "Alice Smith");
    }

    #[tokio::test]
    async fn test_create_team_invalid_id() {
        let (service, repo) = create_service();
        seed_user(&repo, "alice", "Alice Smith");

        let result = service
            .create_team(
                "alice",
                CreateTeamRequest {
                    id: "bad id!".to_string(),
                    name: "Test Team".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::InvalidId { .. })));
    }

    #[tokio::test]
    async fn test_create_team_invalid_name() {
        let (service, repo) = create_service();
        seed_user(&repo, "alice", "Alice Smith");

        let result = service
            .create_team(
                "alice",
                CreateTeamRequest {
                    id: "test-team".to_string(),
                    name: "".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_get_team_as_member() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;

        let team = service.get_team("alice", "test-team").await.unwrap();
        assert_eq!(team.name(), "Test Team");
    }

    #[tokio::test]
    async fn test_get_team_as_non_member() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        seed_user(&repo, "mallory", "Mallory");

        let result = service.get_team("mallory", "test-team").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_find_members_requires_membership() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        seed_user(&repo, "mallory", "Mallory");

        let result = service
            .find_members("mallory", "test-team", MemberQuery::new())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_find_invites_requires_membership() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        seed_user(&repo, "mallory", "Mallory");

        let result = service
            .find_member_invites("mallory", "test-team", InviteQuery::new())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_find_members_search_term() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        add_member(&service, &repo, "bob", "Bob Jones", TeamRole::Member).await;
        add_member(&service, &repo, "carol", "Carol Smith", TeamRole::Member).await;

        let page = service
            .find_members(
                "alice",
                "test-team",
                MemberQuery::new().with_term("smith"),
            )
            .await
            .unwrap();

        assert_eq!(page.count, 2);
        assert!(page.data.iter().all(|m| m.user().name().contains("Smith")));
    }

    #[tokio::test]
    async fn test_find_members_empty_term_unfiltered() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        add_member(&service, &repo, "bob", "Bob Jones", TeamRole::Member).await;

        let page = service
            .find_members("alice", "test-team", MemberQuery::new().with_term(""))
            .await
            .unwrap();

        assert_eq!(page.count, 2);
    }

    #[tokio::test]
    async fn test_find_members_pagination_envelope() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;

        for i in 1..5 {
            add_member(
                &service,
                &repo,
                &format!("user-{}", i),
                &format!("User {}", i),
                TeamRole::Member,
            )
            .await;
        }

        let page = service
            .find_members(
                "alice",
                "test-team",
                MemberQuery::new().with_page(2).with_per_page(2),
            )
            .await
            .unwrap();

        // 5 members across pages of 2
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.count, 5);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.per_page, 2);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn test_find_members_order_by_name_direction() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        add_member(&service, &repo, "bob", "Bob", TeamRole::Member).await;
        add_member(&service, &repo, "carol", "Carol", TeamRole::Member).await;

        // Default is name descending
        let page = service
            .find_members("alice", "test-team", MemberQuery::new())
            .await
            .unwrap();
        let names: Vec<&str> = page.data.iter().map(|m| m.user().name()).collect();
        assert_eq!(names, vec!["Carol", "Bob", "Alice Smith"]);

        let page = service
            .find_members(
                "alice",
                "test-team",
                MemberQuery::new().with_direction(SortDirection::Asc),
            )
            .await
            .unwrap();
        let names: Vec<&str> = page.data.iter().map(|m| m.user().name()).collect();
        assert_eq!(names, vec!["Alice Smith", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn test_find_members_order_by_role() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        add_member(&service, &repo, "bob", "Bob", TeamRole::Admin).await;
        add_member(&service, &repo, "carol", "Carol", TeamRole::Member).await;

        let page = service
            .find_members(
                "alice",
                "test-team",
                MemberQuery::new()
                    .with_order_by(MemberOrderBy::Role)
                    .with_direction(SortDirection::Asc),
            )
            .await
            .unwrap();
        let roles: Vec<TeamRole> = page.data.iter().map(|m| m.role()).collect();

        // Roles sort by their stored text: admin, member, owner
        assert_eq!(roles, vec![TeamRole::Admin, TeamRole::Member, TeamRole::Owner]);
    }

    #[tokio::test]
    async fn test_create_invites_returns_tokens_once() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;

        let invites = service
            .create_invites(
                "alice",
                "test-team",
                CreateInvitesRequest {
                    invites: vec![InviteRequest {
                        email: "bob@example.com".to_string(),
                        role: TeamRole::Member,
                    }],
                },
            )
            .await
            .unwrap();

        assert_eq!(invites.len(), 1);
        assert!(invites[0].token().is_some());

        // Listings never expose the token
        let page = service
            .find_member_invites("alice", "test-team", InviteQuery::new())
            .await
            .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.data[0].token(), None);

        let json = serde_json::to_value(&page.data[0]).unwrap();
        assert!(json.get("token").is_none());
    }

    #[tokio::test]
    async fn test_create_invites_requires_manager() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        add_member(&service, &repo, "bob", "Bob", TeamRole::Member).await;

        let result = service
            .create_invites(
                "bob",
                "test-team",
                CreateInvitesRequest {
                    invites: vec![InviteRequest {
                        email: "dave@example.com".to_string(),
                        role: TeamRole::Member,
                    }],
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_create_invites_rejects_owner_role() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;

        let result = service
            .create_invites(
                "alice",
                "test-team",
                CreateInvitesRequest {
                    invites: vec![InviteRequest {
                        email: "bob@example.com".to_string(),
                        role: TeamRole::Owner,
                    }],
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_invites_invalid_email() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;

        let result = service
            .create_invites(
                "alice",
                "test-team",
                CreateInvitesRequest {
                    invites: vec![InviteRequest {
                        email: "not-an-email".to_string(),
                        role: TeamRole::Member,
                    }],
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_invites_empty_batch() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;

        let result = service
            .create_invites(
                "alice",
                "test-team",
                CreateInvitesRequest { invites: vec![] },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_invites_skips_existing_emails() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        add_member(&service, &repo, "bob", "Bob", TeamRole::Member).await;

        let invites = service
            .create_invites(
                "alice",
                "test-team",
                CreateInvitesRequest {
                    invites: vec![
                        InviteRequest {
                            email: "bob@example.com".to_string(),
                            role: TeamRole::Member,
                        },
                        InviteRequest {
                            email: "dave@example.com".to_string(),
                            role: TeamRole::Member,
                        },
                    ],
                },
            )
            .await
            .unwrap();

        // Bob is already a member, only Dave's invite is created
        assert_eq!(invites.len(), 1);
        assert_eq!(invites[0].email(), "dave@example.com");
    }

    #[tokio::test]
    async fn test_find_invites_search_and_order() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;

        service
            .create_invites(
                "alice",
                "test-team",
                CreateInvitesRequest {
                    invites: vec![
                        InviteRequest {
                            email: "anna@example.com".to_string(),
                            role: TeamRole::Member,
                        },
                        InviteRequest {
                            email: "zoe@example.com".to_string(),
                            role: TeamRole::Member,
                        },
                        InviteRequest {
                            email: "zoe@other.org".to_string(),
                            role: TeamRole::Member,
                        },
                    ],
                },
            )
            .await
            .unwrap();

        // Default is email descending
        let page = service
            .find_member_invites("alice", "test-team", InviteQuery::new())
            .await
            .unwrap();
        let emails: Vec<&str> = page.data.iter().map(|i| i.email()).collect();
        assert_eq!(
            emails,
            vec!["zoe@other.org", "zoe@example.com", "anna@example.com"]
        );

        let page = service
            .find_member_invites(
                "alice",
                "test-team",
                InviteQuery::new()
                    .with_term("zoe")
                    .with_order_by(InviteOrderBy::Email)
                    .with_direction(SortDirection::Asc),
            )
            .await
            .unwrap();
        let emails: Vec<&str> = page.data.iter().map(|i| i.email()).collect();
        assert_eq!(emails, vec!["zoe@example.com", "zoe@other.org"]);
        assert_eq!(page.count, 2);
    }

    #[tokio::test]
    async fn test_revoke_invite() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;

        let invites = service
            .create_invites(
                "alice",
                "test-team",
                CreateInvitesRequest {
                    invites: vec![InviteRequest {
                        email: "bob@example.com".to_string(),
                        role: TeamRole::Member,
                    }],
                },
            )
            .await
            .unwrap();

        service
            .revoke_invite("alice", "test-team", invites[0].id().as_str())
            .await
            .unwrap();

        let page = service
            .find_member_invites("alice", "test-team", InviteQuery::new())
            .await
            .unwrap();
        assert_eq!(page.count, 0);
    }

    #[tokio::test]
    async fn test_revoke_invite_requires_manager() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        add_member(&service, &repo, "bob", "Bob", TeamRole::Member).await;

        let result = service
            .revoke_invite("bob", "test-team", "invite-whatever")
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_accept_invite_flow() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        seed_user(&repo, "bob", "Bob");

        let invites = service
            .create_invites(
                "alice",
                "test-team",
                CreateInvitesRequest {
                    invites: vec![InviteRequest {
                        email: "bob@example.com".to_string(),
                        role: TeamRole::Admin,
                    }],
                },
            )
            .await
            .unwrap();
        let token = invites[0].token().unwrap();

        let member = service
            .accept_invite(token, "bob", "bob@example.com")
            .await
            .unwrap();
        assert_eq!(member.role(), TeamRole::Admin);

        // Invite is consumed and the member shows up in listings
        let invites = service
            .find_member_invites("alice", "test-team", InviteQuery::new())
            .await
            .unwrap();
        assert_eq!(invites.count, 0);

        let members = service
            .find_members("alice", "test-team", MemberQuery::new())
            .await
            .unwrap();
        assert_eq!(members.count, 2);
    }

    #[tokio::test]
    async fn test_accept_invite_email_case_insensitive() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        seed_user(&repo, "bob", "Bob");

        let invites = service
            .create_invites(
                "alice",
                "test-team",
                CreateInvitesRequest {
                    invites: vec![InviteRequest {
                        email: "Bob@Example.com".to_string(),
                        role: TeamRole::Member,
                    }],
                },
            )
            .await
            .unwrap();
        let token = invites[0].token().unwrap();

        let member = service
            .accept_invite(token, "bob", "BOB@EXAMPLE.COM")
            .await
            .unwrap();
        assert_eq!(member.user_id().as_str(), "bob");
    }

    #[tokio::test]
    async fn test_accept_invite_wrong_email() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        seed_user(&repo, "mallory", "Mallory");

        let invites = service
            .create_invites(
                "alice",
                "test-team",
                CreateInvitesRequest {
                    invites: vec![InviteRequest {
                        email: "bob@example.com".to_string(),
                        role: TeamRole::Member,
                    }],
                },
            )
            .await
            .unwrap();
        let token = invites[0].token().unwrap();

        let result = service
            .accept_invite(token, "mallory", "mallory@example.com")
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_accept_invite_unknown_token() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        seed_user(&repo, "bob", "Bob");

        let result = service
            .accept_invite("no-such-token", "bob", "bob@example.com")
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_remove_member() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        let member = add_member(&service, &repo, "bob", "Bob", TeamRole::Member).await;

        service
            .remove_member("alice", "test-team", member.id().as_str())
            .await
            .unwrap();

        let page = service
            .find_members("alice", "test-team", MemberQuery::new())
            .await
            .unwrap();
        assert_eq!(page.count, 1);
    }

    #[tokio::test]
    async fn test_remove_member_requires_manager() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        let member = add_member(&service, &repo, "bob", "Bob", TeamRole::Member).await;
        add_member(&service, &repo, "carol", "Carol", TeamRole::Member).await;

        let result = service
            .remove_member("carol", "test-team", member.id().as_str())
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_remove_member_owner_protected() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        add_member(&service, &repo, "bob", "Bob", TeamRole::Admin).await;

        let owner = service
            .find_members(
                "alice",
                "test-team",
                MemberQuery::new().with_order_by(MemberOrderBy::Role),
            )
            .await
            .unwrap()
            .data
            .into_iter()
            .find(|m| m.role() == TeamRole::Owner)
            .unwrap();

        let result = service
            .remove_member("bob", "test-team", owner.id().as_str())
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_remove_member_admin_can_remove_peer_admin() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        add_member(&service, &repo, "bob", "Bob", TeamRole::Admin).await;
        let carol = add_member(&service, &repo, "carol", "Carol", TeamRole::Admin).await;

        service
            .remove_member("bob", "test-team", carol.id().as_str())
            .await
            .unwrap();

        let page = service
            .find_members("bob", "test-team", MemberQuery::new())
            .await
            .unwrap();
        assert_eq!(page.count, 2);
    }

    #[tokio::test]
    async fn test_update_member_role() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        let member = add_member(&service, &repo, "bob", "Bob", TeamRole::Member).await;

        let updated = service
            .update_member_role("alice", "test-team", member.id().as_str(), TeamRole::Admin)
            .await
            .unwrap();
        assert_eq!(updated.role(), TeamRole::Admin);
    }

    #[tokio::test]
    async fn test_update_member_role_cannot_grant_owner() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        let member = add_member(&service, &repo, "bob", "Bob", TeamRole::Member).await;

        let result = service
            .update_member_role("alice", "test-team", member.id().as_str(), TeamRole::Owner)
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_member_role_owner_protected() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        add_member(&service, &repo, "bob", "Bob", TeamRole::Admin).await;

        let owner = service
            .find_members("alice", "test-team", MemberQuery::new())
            .await
            .unwrap()
            .data
            .into_iter()
            .find(|m| m.role() == TeamRole::Owner)
            .unwrap();

        let result = service
            .update_member_role("bob", "test-team", owner.id().as_str(), TeamRole::Member)
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_update_member_role_admin_can_demote_peer_admin() {
        let (service, repo) = create_service();
        create_team_with_owner(&service, &repo).await;
        add_member(&service, &repo, "bob", "Bob", TeamRole::Admin).await;
        let carol = add_member(&service, &repo, "carol", "Carol", TeamRole::Admin).await;

        let updated = service
            .update_member_role("bob", "test-team", carol.id().as_str(), TeamRole::Member)
            .await
            .unwrap();
        assert_eq!(updated.role(), TeamRole::Member);
    }

    #[tokio::test]
    async fn test_invalid_user_id_rejected() {
        let (service, _repo) = create_service();

        let result = service
            .find_members("not a valid id!", "test-team", MemberQuery::new())
            .await;
        assert!(matches!(result, Err(DomainError::InvalidId { .. })));
    }
}
