//! Caller authentication and role extraction.
//!
//! The expected API key is resolved once at startup and passed in; nothing here reads the
//! environment.

use rotation_core::Role;

/// Header carrying the shared API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the caller's application role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing x-api-key header")]
    MissingApiKey,
    #[error("invalid API key")]
    InvalidApiKey,
    #[error("missing x-user-role header")]
    MissingRole,
    #[error("unknown role '{0}'")]
    UnknownRole(String),
}

/// Validates the provided API key against the configured one.
///
/// When no key is configured every caller is accepted.
pub fn validate_api_key(expected: Option<&str>, provided: Option<&str>) -> Result<(), AuthError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    match provided {
        None => Err(AuthError::MissingApiKey),
        Some(key) if key == expected => Ok(()),
        Some(_) => Err(AuthError::InvalidApiKey),
    }
}

/// Reads the caller's role from its header value.
pub fn role_from_header(value: Option<&str>) -> Result<Role, AuthError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingRole)?;
    Role::parse(value).map_err(|_| AuthError::UnknownRole(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_key_accepts_everyone() {
        assert_eq!(validate_api_key(None, None), Ok(()));
        assert_eq!(validate_api_key(None, Some("anything")), Ok(()));
    }

    #[test]
    fn configured_key_must_match() {
        assert_eq!(validate_api_key(Some("s3cret"), Some("s3cret")), Ok(()));
        assert_eq!(
            validate_api_key(Some("s3cret"), Some("guess")),
            Err(AuthError::InvalidApiKey)
        );
        assert_eq!(
            validate_api_key(Some("s3cret"), None),
            Err(AuthError::MissingApiKey)
        );
    }

    #[test]
    fn parses_role_header() {
        assert_eq!(
            role_from_header(Some(" hospital_admin ")),
            Ok(Role::HospitalAdmin)
        );
        assert_eq!(role_from_header(Some("tutor")), Ok(Role::Tutor));
        assert_eq!(role_from_header(None), Err(AuthError::MissingRole));
        assert_eq!(role_from_header(Some("  ")), Err(AuthError::MissingRole));
        assert_eq!(
            role_from_header(Some("janitor")),
            Err(AuthError::UnknownRole("janitor".into()))
        );
    }
}
