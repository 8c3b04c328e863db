//! User domain
//!
//! Identity lives outside this service; these types reference users by ID and
//! carry the joined name/email summary exposed on team members.

mod entity;
mod validation;

pub use entity::{UserId, UserSummary};
pub use validation::{validate_user_id, UserValidationError};
