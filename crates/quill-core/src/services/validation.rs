//! Input rules shared by the account and post use cases.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::DomainError;

pub const USERNAME_MIN_LEN: usize = 2;
pub const USERNAME_MAX_LEN: usize = 20;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const TITLE_MAX_LEN: usize = 100;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 120 && EMAIL_RE.is_match(email)
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(DomainError::Validation("Invalid email address".to_string()))
    }
}

pub fn validate_username(username: &str) -> Result<(), DomainError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(DomainError::Validation(format!(
            "Username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"
        )));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(DomainError::Validation(
            "Username must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_new_password(password: &str, confirm_password: &str) -> Result<(), DomainError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    if password != confirm_password {
        return Err(DomainError::Validation("Passwords must match".to_string()));
    }
    Ok(())
}

pub fn validate_post(title: &str, content: &str) -> Result<(), DomainError> {
    let title_len = title.trim().chars().count();
    if title_len == 0 {
        return Err(DomainError::Validation("Title is required".to_string()));
    }
    if title_len > TITLE_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "Title must be at most {TITLE_MAX_LEN} characters"
        )));
    }
    if content.trim().is_empty() {
        return Err(DomainError::Validation("Content is required".to_string()));
    }
    Ok(())
}
