//! Input validation for user records

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{RepositoryError, RepositoryResult};
use crate::models::user::{NewUser, UpdateUser};

/// Validate a required free-text field
pub fn validate_required(field: &str, value: &str) -> RepositoryResult<()> {
    if value.trim().is_empty() {
        return Err(RepositoryError::validation(field, format!("{} is required", field)));
    }
    Ok(())
}

/// Validate username
pub fn validate_username(username: &str) -> RepositoryResult<()> {
    validate_required("username", username)?;

    if username.len() < 3 {
        return Err(RepositoryError::validation(
            "username",
            "Username must be at least 3 characters long",
        ));
    }

    if username.len() > 32 {
        return Err(RepositoryError::validation(
            "username",
            "Username must be at most 32 characters long",
        ));
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("Failed to compile username regex")
    });

    if !regex.is_match(username) {
        return Err(RepositoryError::validation(
            "username",
            "Username can only contain letters, numbers, dots, dashes and underscores",
        ));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> RepositoryResult<()> {
    validate_required("email", email)?;

    if email.len() > 254 {
        return Err(RepositoryError::validation(
            "email",
            "Email must be at most 254 characters long",
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(RepositoryError::validation("email", "Invalid email format"));
    }

    Ok(())
}

/// Validate a user before it is inserted
pub fn validate_new_user(user: &NewUser) -> RepositoryResult<()> {
    validate_required("clerk_id", &user.clerk_id)?;
    validate_required("name", &user.name)?;
    validate_username(&user.username)?;
    validate_email(&user.email)?;
    validate_required("picture", &user.picture)?;
    Ok(())
}

/// Validate the fields present in a partial update
pub fn validate_update(update: &UpdateUser) -> RepositoryResult<()> {
    if let Some(name) = &update.name {
        validate_required("name", name)?;
    }
    if let Some(username) = &update.username {
        validate_username(username)?;
    }
    if let Some(email) = &update.email {
        validate_email(email)?;
    }
    if let Some(picture) = &update.picture {
        validate_required("picture", picture)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            clerk_id: "user_2abc".to_string(),
            name: "Alice Liddell".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            picture: "https://img.example.com/alice.png".to_string(),
            bio: None,
            location: None,
            portfolio_website: None,
        }
    }

    fn field_of(result: RepositoryResult<()>) -> String {
        match result {
            Err(RepositoryError::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_complete_user() {
        assert!(validate_new_user(&new_user()).is_ok());
    }

    #[test]
    fn test_reports_missing_field() {
        let mut user = new_user();
        user.clerk_id = "  ".to_string();
        assert_eq!(field_of(validate_new_user(&user)), "clerk_id");

        let mut user = new_user();
        user.picture.clear();
        assert_eq!(field_of(validate_new_user(&user)), "picture");
    }

    #[test]
    fn test_rejects_malformed_username_and_email() {
        assert_eq!(field_of(validate_username("al")), "username");
        assert_eq!(field_of(validate_username("alice smith")), "username");
        assert!(validate_username("alice.smith-2").is_ok());
        assert_eq!(field_of(validate_email("alice@localhost")), "email");
    }

    #[test]
    fn test_update_only_checks_present_fields() {
        assert!(validate_update(&UpdateUser::default()).is_ok());

        let update = UpdateUser {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert_eq!(field_of(validate_update(&update)), "email");
    }
}
