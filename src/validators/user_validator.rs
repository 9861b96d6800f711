use lazy_regex::regex_is_match;

use crate::error::{Error, Result};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", email)
}

pub fn is_valid_username(username: &str) -> bool {
    regex_is_match!(r"^[A-Za-z0-9_.-]{3,30}$", username)
}

/// Normalized form used for storage and comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_registration(username: &str, email: &str, password: &str) -> Result<()> {
    let mut messages = Vec::new();

    if !is_valid_username(username) {
        messages.push(
            "Username must be 3 to 30 letters, digits, dots, dashes or underscores".to_string(),
        );
    }
    if !is_valid_email(email) {
        messages.push("Email is invalid".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        messages.push(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation { messages })
    }
}
