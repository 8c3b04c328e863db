//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("User ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("User ID must start with a letter or number")]
    InvalidIdStart,

    #[error("User ID must end with a letter or number")]
    InvalidIdEnd,

    #[error("User ID contains invalid character: '{0}'. Only alphanumeric characters and hyphens are allowed")]
    InvalidIdCharacter(char),

    #[error("User ID cannot contain consecutive hyphens")]
    ConsecutiveHyphens,
}

const MAX_USER_ID_LENGTH: usize = 50;

/// Validate a user ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 50 characters
/// - Only alphanumeric characters and hyphens
/// - Must start and end with alphanumeric
/// - No consecutive hyphens
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    if id.len() > MAX_USER_ID_LENGTH {
        return Err(UserValidationError::IdTooLong(MAX_USER_ID_LENGTH));
    }

    let first = id.chars().next().unwrap_or(' ');
    if !first.is_ascii_alphanumeric() {
        return Err(UserValidationError::InvalidIdStart);
    }

    let last = id.chars().last().unwrap_or(' ');
    if !last.is_ascii_alphanumeric() {
        return Err(UserValidationError::InvalidIdEnd);
    }

    for c in id.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(UserValidationError::InvalidIdCharacter(c));
        }
    }

    if id.contains("--") {
        return Err(UserValidationError::ConsecutiveHyphens);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_id() {
        assert!(validate_user_id("alice").is_ok());
        assert!(validate_user_id("user-123").is_ok());
        assert!(validate_user_id("a").is_ok());
        assert!(validate_user_id("7even").is_ok());
    }

    #[test]
    fn test_empty_user_id() {
        assert_eq!(validate_user_id(""), Err(UserValidationError::EmptyId));
    }

    #[test]
    fn test_user_id_too_long() {
        let long_id = "a".repeat(51);
        assert_eq!(
            validate_user_id(&long_id),
            Err(UserValidationError::IdTooLong(50))
        );
    }

    #[test]
    fn test_user_id_invalid_start() {
        assert_eq!(
            validate_user_id("-alice"),
            Err(UserValidationError::InvalidIdStart)
        );
    }

    #[test]
    fn test_user_id_invalid_end() {
        assert_eq!(
            validate_user_id("alice-"),
            Err(UserValidationError::InvalidIdEnd)
        );
    }

    #[test]
    fn test_user_id_invalid_character() {
        assert_eq!(
            validate_user_id("alice_smith"),
            Err(UserValidationError::InvalidIdCharacter('_'))
        );
        assert_eq!(
            validate_user_id("alice.smith"),
            Err(UserValidationError::InvalidIdCharacter('.'))
        );
    }

    #[test]
    fn test_user_id_consecutive_hyphens() {
        assert_eq!(
            validate_user_id("alice--smith"),
            Err(UserValidationError::ConsecutiveHyphens)
        );
    }
}
