//! PostgreSQL team repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::team::{
    InviteId, InviteOrderBy, InviteQuery, MemberId, MemberOrderBy, MemberQuery, Team, TeamId,
    TeamMember, TeamMemberInvite, TeamRepository, TeamRole,
};
use crate::domain::user::{UserId, UserSummary};
use crate::domain::{DomainError, SortDirection};

/// PostgreSQL implementation of TeamRepository
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn get_team(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_team(&row)?)),
            None => Ok(None),
        }
    }

    async fn create_team(&self, team: Team, owner_id: &UserId) -> Result<Team, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to start transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO teams (id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(team.id().as_str())
        .bind(team.name())
        .bind(team.created_at())
        .bind(team.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Team '{}' already exists", team.id()))
            } else {
                DomainError::storage(format!("Failed to create team: {}", e))
            }
        })?;

        let member_id = MemberId::generate();
        sqlx::query(
            r#"
            INSERT INTO team_members (id, team_id, user_id, role, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(member_id.as_str())
        .bind(team.id().as_str())
        .bind(owner_id.as_str())
        .bind(role_to_str(TeamRole::Owner))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if e.to_string().contains("foreign key") {
                DomainError::not_found(format!("User '{}' not found", owner_id))
            } else {
                DomainError::storage(format!("Failed to create owner membership: {}", e))
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(team)
    }

    async fn get_membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Option<TeamMember>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT tm.id, tm.team_id, tm.user_id, tm.role, tm.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM team_members tm
            JOIN users u ON u.id = tm.user_id
            WHERE tm.team_id = $1 AND tm.user_id = $2
            "#,
        )
        .bind(team_id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get membership: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_member(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_members(
        &self,
        team_id: &TeamId,
        query: &MemberQuery,
    ) -> Result<Vec<TeamMember>, DomainError> {
        let order = format!(
            "{} {}",
            member_order_sql(query.order_by),
            direction_sql(query.direction)
        );

        let rows = match query.filter_term() {
            Some(term) => {
                let sql = format!(
                    r#"
                    SELECT tm.id, tm.team_id, tm.user_id, tm.role, tm.created_at,
                           u.name AS user_name, u.email AS user_email
                    FROM team_members tm
                    JOIN users u ON u.id = tm.user_id
                    WHERE tm.team_id = $1 AND u.name ILIKE $2
                    ORDER BY {}
                    LIMIT $3 OFFSET $4
                    "#,
                    order
                );

                sqlx::query(&sql)
                    .bind(team_id.as_str())
                    .bind(like_pattern(term))
                    .bind(query.page.per_page())
                    .bind(query.page.offset())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!(
                    r#"
                    SELECT tm.id, tm.team_id, tm.user_id, tm.role, tm.created_at,
                           u.name AS user_name, u.email AS user_email
                    FROM team_members tm
                    JOIN users u ON u.id = tm.user_id
                    WHERE tm.team_id = $1
                    ORDER BY {}
                    LIMIT $2 OFFSET $3
                    "#,
                    order
                );

                sqlx::query(&sql)
                    .bind(team_id.as_str())
                    .bind(query.page.per_page())
                    .bind(query.page.offset())
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list team members: {}", e)))?;

        let mut members = Vec::with_capacity(rows.len());

        for row in rows {
            members.push(row_to_member(&row)?);
        }

        Ok(members)
    }

    async fn count_members(
        &self,
        team_id: &TeamId,
        query: &MemberQuery,
    ) -> Result<i64, DomainError> {
        let count: i64 = match query.filter_term() {
            Some(term) => {
                sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*)
                    FROM team_members tm
                    JOIN users u ON u.id = tm.user_id
                    WHERE tm.team_id = $1 AND u.name ILIKE $2
                    "#,
                )
                .bind(team_id.as_str())
                .bind(like_pattern(term))
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
                    .bind(team_id.as_str())
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to count team members: {}", e)))?;

        Ok(count)
    }

    async fn get_member(
        &self,
        team_id: &TeamId,
        member_id: &MemberId,
    ) -> Result<Option<TeamMember>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT tm.id, tm.team_id, tm.user_id, tm.role, tm.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM team_members tm
            JOIN users u ON u.id = tm.user_id
            WHERE tm.team_id = $1 AND tm.id = $2
            "#,
        )
        .bind(team_id.as_str())
        .bind(member_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get team member: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_member(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_member(
        &self,
        team_id: &TeamId,
        member_id: &MemberId,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND id = $2")
            .bind(team_id.as_str())
            .bind(member_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete team member: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Team member '{}' not found",
                member_id
            )));
        }

        Ok(())
    }

    async fn update_member_role(
        &self,
        team_id: &TeamId,
        member_id: &MemberId,
        role: TeamRole,
    ) -> Result<TeamMember, DomainError> {
        let result = sqlx::query("UPDATE team_members SET role = $3 WHERE team_id = $1 AND id = $2")
            .bind(team_id.as_str())
            .bind(member_id.as_str())
            .bind(role_to_str(role))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update member role: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Team member '{}' not found",
                member_id
            )));
        }

        self.get_member(team_id, member_id).await?.ok_or_else(|| {
            DomainError::not_found(format!("Team member '{}' not found", member_id))
        })
    }

    async fn find_invites(
        &self,
        team_id: &TeamId,
        query: &InviteQuery,
    ) -> Result<Vec<TeamMemberInvite>, DomainError> {
        let order = format!(
            "{} {}",
            invite_order_sql(query.order_by),
            direction_sql(query.direction)
        );

        let rows = match query.filter_term() {
            Some(term) => {
                let sql = format!(
                    r#"
                    SELECT id, team_id, email, role, created_at
                    FROM team_member_invites
                    WHERE team_id = $1 AND email ILIKE $2
                    ORDER BY {}
                    LIMIT $3 OFFSET $4
                    "#,
                    order
                );

                sqlx::query(&sql)
                    .bind(team_id.as_str())
                    .bind(like_pattern(term))
                    .bind(query.page.per_page())
                    .bind(query.page.offset())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!(
                    r#"
                    SELECT id, team_id, email, role, created_at
                    FROM team_member_invites
                    WHERE team_id = $1
                    ORDER BY {}
                    LIMIT $2 OFFSET $3
                    "#,
                    order
                );

                sqlx::query(&sql)
                    .bind(team_id.as_str())
                    .bind(query.page.per_page())
                    .bind(query.page.offset())
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list invites: {}", e)))?;

        let mut invites = Vec::with_capacity(rows.len());

        for row in rows {
            invites.push(row_to_invite(&row)?);
        }

        Ok(invites)
    }

    async fn count_invites(
        &self,
        team_id: &TeamId,
        query: &InviteQuery,
    ) -> Result<i64, DomainError> {
        let count: i64 = match query.filter_term() {
            Some(term) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM team_member_invites WHERE team_id = $1 AND email ILIKE $2",
                )
                .bind(team_id.as_str())
                .bind(like_pattern(term))
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM team_member_invites WHERE team_id = $1")
                    .bind(team_id.as_str())
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to count invites: {}", e)))?;

        Ok(count)
    }

    async fn get_invite(
        &self,
        team_id: &TeamId,
        invite_id: &InviteId,
    ) -> Result<Option<TeamMemberInvite>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, team_id, email, role, created_at
            FROM team_member_invites
            WHERE team_id = $1 AND id = $2
            "#,
        )
        .bind(team_id.as_str())
        .bind(invite_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get invite: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_invite(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_invite_by_token(
        &self,
        token: &str,
    ) -> Result<Option<TeamMemberInvite>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, team_id, email, role, created_at
            FROM team_member_invites
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get invite by token: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_invite(&row)?)),
            None => Ok(None),
        }
    }

    async fn create_invites(
        &self,
        invites: Vec<TeamMemberInvite>,
    ) -> Result<Vec<TeamMemberInvite>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to start transaction: {}", e)))?;

        let mut created = Vec::new();

        for invite in invites {
            let token = invite
                .token()
                .ok_or_else(|| DomainError::storage("Invite is missing its signup token"))?;

            // Skip emails that already belong to a member or a pending invite
            let result = sqlx::query(
                r#"
                INSERT INTO team_member_invites (id, team_id, email, role, token, created_at)
                SELECT $1, $2, $3, $4, $5, $6
                WHERE NOT EXISTS (
                    SELECT 1 FROM team_member_invites
                    WHERE team_id = $2 AND email = $3
                )
                AND NOT EXISTS (
                    SELECT 1 FROM team_members tm
                    JOIN users u ON u.id = tm.user_id
                    WHERE tm.team_id = $2 AND LOWER(u.email) = $3
                )
                "#,
            )
            .bind(invite.id().as_str())
            .bind(invite.team_id().as_str())
            .bind(invite.email())
            .bind(role_to_str(invite.role()))
            .bind(token)
            .bind(invite.created_at())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if e.to_string().contains("foreign key") {
                    DomainError::not_found(format!("Team '{}' not found", invite.team_id()))
                } else {
                    DomainError::storage(format!("Failed to create invite: {}", e))
                }
            })?;

            if result.rows_affected() > 0 {
                created.push(invite);
            }
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(created)
    }

    async fn delete_invite(
        &self,
        team_id: &TeamId,
        invite_id: &InviteId,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM team_member_invites WHERE team_id = $1 AND id = $2")
            .bind(team_id.as_str())
            .bind(invite_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete invite: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Team member invite '{}' not found",
                invite_id
            )));
        }

        Ok(())
    }

    async fn accept_invite(
        &self,
        invite: &TeamMemberInvite,
        user_id: &UserId,
    ) -> Result<TeamMember, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to start transaction: {}", e)))?;

        let member_id = MemberId::generate();
        sqlx::query(
            r#"
            INSERT INTO team_members (id, team_id, user_id, role, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(member_id.as_str())
        .bind(invite.team_id().as_str())
        .bind(user_id.as_str())
        .bind(role_to_str(invite.role()))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "User '{}' is already a member of team '{}'",
                    user_id,
                    invite.team_id()
                ))
            } else if msg.contains("foreign key") {
                DomainError::not_found(format!("User '{}' not found", user_id))
            } else {
                DomainError::storage(format!("Failed to create membership: {}", e))
            }
        })?;

        let deleted = sqlx::query("DELETE FROM team_member_invites WHERE id = $1")
            .bind(invite.id().as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete invite: {}", e)))?;

        // The invite may have been revoked since the token lookup
        if deleted.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Team member invite '{}' not found",
                invite.id()
            )));
        }

        // Read the membership back with the joined user columns
        let row = sqlx::query(
            r#"
            SELECT tm.id, tm.team_id, tm.user_id, tm.role, tm.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM team_members tm
            JOIN users u ON u.id = tm.user_id
            WHERE tm.id = $1
            "#,
        )
        .bind(member_id.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to load new membership: {}", e)))?;

        let member = row_to_member(&row)?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(member)
    }
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Result<Team, DomainError> {
    let id: String = row.get("id");
    let name: String = row.get("name");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let team_id = TeamId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid team ID in database: {}", e)))?;

    Ok(Team::from_parts(team_id, name, created_at, updated_at))
}

fn row_to_member(row: &sqlx::postgres::PgRow) -> Result<TeamMember, DomainError> {
    let id: String = row.get("id");
    let team_id: String = row.get("team_id");
    let user_id: String = row.get("user_id");
    let role: String = row.get("role");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let user_name: String = row.get("user_name");
    let user_email: String = row.get("user_email");

    let team_id = TeamId::new(&team_id)
        .map_err(|e| DomainError::storage(format!("Invalid team ID in database: {}", e)))?;
    let user_id = UserId::new(&user_id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(TeamMember::from_parts(
        MemberId::new(id),
        team_id,
        user_id,
        str_to_role(&role),
        created_at,
        UserSummary::new(user_name, user_email),
    ))
}

fn row_to_invite(row: &sqlx::postgres::PgRow) -> Result<TeamMemberInvite, DomainError> {
    let id: String = row.get("id");
    let team_id: String = row.get("team_id");
    let email: String = row.get("email");
    let role: String = row.get("role");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    let team_id = TeamId::new(&team_id)
        .map_err(|e| DomainError::storage(format!("Invalid team ID in database: {}", e)))?;

    Ok(TeamMemberInvite::from_parts(
        InviteId::new(id),
        team_id,
        email,
        str_to_role(&role),
        created_at,
    ))
}

fn role_to_str(role: TeamRole) -> &'static str {
    match role {
        TeamRole::Owner => "owner",
        TeamRole::Admin => "admin",
        TeamRole::Member => "member",
    }
}

fn str_to_role(s: &str) -> TeamRole {
    match s {
        "owner" => TeamRole::Owner,
        "admin" => TeamRole::Admin,
        _ => TeamRole::Member,
    }
}

fn direction_sql(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

fn member_order_sql(order_by: MemberOrderBy) -> &'static str {
    match order_by {
        MemberOrderBy::Name => "u.name",
        MemberOrderBy::Role => "tm.role",
        MemberOrderBy::CreatedAt => "tm.created_at",
    }
}

fn invite_order_sql(order_by: InviteOrderBy) -> &'static str {
    match order_by {
        InviteOrderBy::Email => "email",
        InviteOrderBy::Role => "role",
        InviteOrderBy::CreatedAt => "created_at",
    }
}

// Escapes LIKE wildcards so the term matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{}%", escaped)
}
