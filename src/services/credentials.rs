//! Account credential policy applied on registration.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]").expect("Invalid regex pattern defined in code")
});

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_username(username: &str) -> Result<(), String> {
    if EMAIL_PATTERN.is_match(username) {
        Ok(())
    } else {
        Err("Please enter a valid email.".to_string())
    }
}

pub fn validate_password(username: &str, password: &str) -> Result<(), String> {
    if password == username {
        return Err("Password and username cannot be the same.".to_string());
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if has_lower
        && has_upper
        && has_digit
        && has_special
        && password.chars().count() >= MIN_PASSWORD_LEN
    {
        Ok(())
    } else {
        Err("Password must be at least 8 characters long, and include at least one \
             uppercase letter, one lowercase letter, one number, and one special character."
            .to_string())
    }
}
