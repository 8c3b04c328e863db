//! Team infrastructure implementations

mod postgres_repository;
mod service;
mod token;

pub use postgres_repository::PostgresTeamRepository;
pub use service::{CreateInvitesRequest, CreateTeamRequest, InviteRequest, TeamService};
pub use token::InviteTokenGenerator;
