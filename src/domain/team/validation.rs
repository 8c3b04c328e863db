//! Team validation

use thiserror::Error;

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Team ID cannot be empty")]
    EmptyId,

    #[error("Team ID cannot exceed {0} characters")]
    IdTooLong(usize),

    #[error("Team ID can only contain alphanumeric characters and hyphens")]
    InvalidIdCharacters,

    #[error("Team ID cannot start or end with a hyphen")]
    InvalidIdFormat,

    #[error("Team name cannot be empty")]
    EmptyName,

    #[error("Team name cannot exceed {0} characters")]
    NameTooLong(usize),

    #[error("Invite email cannot be empty")]
    EmptyEmail,

    #[error("Invite email cannot exceed {0} characters")]
    EmailTooLong(usize),

    #[error("Invite email '{0}' is not a valid address")]
    InvalidEmail(String),
}

const MAX_TEAM_ID_LENGTH: usize = 50;
const MAX_TEAM_NAME_LENGTH: usize = 100;
const MAX_INVITE_EMAIL_LENGTH: usize = 254;

/// Validate a team ID
pub fn validate_team_id(id: &str) -> Result<(), TeamValidationError> {
    if id.is_empty() {
        return Err(TeamValidationError::EmptyId);
    }

    if id.len() > MAX_TEAM_ID_LENGTH {
        return Err(TeamValidationError::IdTooLong(MAX_TEAM_ID_LENGTH));
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(TeamValidationError::InvalidIdCharacters);
    }

    if id.starts_with('-') || id.ends_with('-') {
        return Err(TeamValidationError::InvalidIdFormat);
    }

    Ok(())
}

/// Validate a team name
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    if name.len() > MAX_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong(MAX_TEAM_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an invitee email address
///
/// Intentionally loose: one '@' with a non-empty local part and a dotted
/// domain, no whitespace. Deliverability is the mailer's problem.
pub fn validate_invite_email(email: &str) -> Result<(), TeamValidationError> {
    if email.is_empty() {
        return Err(TeamValidationError::EmptyEmail);
    }

    if email.len() > MAX_INVITE_EMAIL_LENGTH {
        return Err(TeamValidationError::EmailTooLong(MAX_INVITE_EMAIL_LENGTH));
    }

    if email.chars().any(|c| c.is_whitespace()) {
        return Err(TeamValidationError::InvalidEmail(email.to_string()));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(TeamValidationError::InvalidEmail(email.to_string()));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(TeamValidationError::InvalidEmail(email.to_string()));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(TeamValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}
