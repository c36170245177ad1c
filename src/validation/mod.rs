use std::fmt;

use crate::domain::Role;

pub const ALLOWED_EMAIL_DOMAINS: &[&str] = &["gmail.com", "northeastern.edu"];
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";
pub const PASSWORD_MIN_LEN: usize = 8;

pub const EMAIL_MESSAGE: &str = "Email must be from gmail.com or northeastern.edu.";
pub const FULL_NAME_MESSAGE: &str =
    "Full name must contain only alphabetic characters and spaces.";
pub const PASSWORD_MESSAGE: &str =
    "Weak password. Must contain uppercase, lowercase, number, and special character.";
pub const ROLE_MESSAGE: &str =
    "Invalid user type. Type must be either \"admin\" or \"employee\".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control() || ch.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fails with `"<label> is required."` when the value is blank.
pub fn validate_required(field: &'static str, label: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, format!("{} is required.", label)));
    }

    Ok(())
}

/// `local@domain` where local is `[A-Za-z0-9._-]+` and the domain is one of
/// [`ALLOWED_EMAIL_DOMAINS`].
pub fn validate_email(email: &str) -> ValidationResult {
    let invalid = || ValidationError::new("email", EMAIL_MESSAGE);

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || !local
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'))
    {
        return Err(invalid());
    }

    if !ALLOWED_EMAIL_DOMAINS.contains(&domain) {
        return Err(invalid());
    }

    Ok(())
}

pub fn validate_full_name(full_name: &str) -> ValidationResult {
    if full_name.is_empty()
        || !full_name
            .chars()
            .all(|ch| ch.is_ascii_alphabetic() || ch.is_whitespace())
    {
        return Err(ValidationError::new("fullName", FULL_NAME_MESSAGE));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> ValidationResult {
    let is_special = |ch: char| PASSWORD_SPECIALS.contains(ch);

    let strong = password.chars().count() >= PASSWORD_MIN_LEN
        && password
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || is_special(ch))
        && password.chars().any(|ch| ch.is_ascii_lowercase())
        && password.chars().any(|ch| ch.is_ascii_uppercase())
        && password.chars().any(|ch| ch.is_ascii_digit())
        && password.chars().any(is_special);

    if !strong {
        return Err(ValidationError::new("password", PASSWORD_MESSAGE));
    }

    Ok(())
}

pub fn parse_role(value: &str) -> Result<Role, ValidationError> {
    value
        .parse::<Role>()
        .map_err(|_| ValidationError::new("type", ROLE_MESSAGE))
}
