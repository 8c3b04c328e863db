//! Team domain module
//!
//! Teams are the primary organizational unit. Memberships tie users to teams
//! with a role, and invites let teams bring in users by email address.

mod entity;
mod invite;
mod member;
mod repository;
mod validation;

pub use entity::{Team, TeamId, TeamRole};
pub use invite::{InviteId, TeamMemberInvite};
pub use member::{MemberId, TeamMember};
pub use repository::{InviteOrderBy, InviteQuery, MemberOrderBy, MemberQuery, TeamRepository};
pub use validation::{
    validate_invite_email, validate_team_id, validate_team_name, TeamValidationError,
};

#[cfg(test)]
pub use repository::mock;
