//! Domain layer - Core business logic and entities

pub mod error;
pub mod page;
pub mod team;
pub mod user;

pub use error::DomainError;
pub use page::{Page, PageRequest, SortDirection};
pub use team::{
    validate_invite_email, validate_team_id, validate_team_name, InviteId, InviteOrderBy,
    InviteQuery, MemberId, MemberOrderBy, MemberQuery, Team, TeamId, TeamMember, TeamMemberInvite,
    TeamRepository, TeamRole, TeamValidationError,
};
pub use user::{validate_user_id, UserId, UserSummary, UserValidationError};
