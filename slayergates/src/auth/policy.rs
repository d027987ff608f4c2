//! Admin credential policy.
//!
//! Rules are checked in a fixed order and the first failure is reported.

use thiserror::Error;

use crate::errors::CoreError;

/// Minimum admin password length, in characters
pub const MIN_ADMIN_PASSWORD_LEN: usize = 12;

/// Characters that satisfy the symbol rule
pub const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Ascending and descending digit runs that are refused
pub const DIGIT_SEQUENCES: [&str; 16] = [
    "012", "123", "234", "345", "456", "567", "678", "789", "987", "876", "765", "654", "543",
    "432", "321", "210",
];

/// Passwords refused outright, compared case-insensitively
pub const DENY_LIST: [&str; 8] = [
    "admin123",
    "password",
    "123456",
    "qwerty",
    "azerty",
    "motdepasse",
    "administrator",
    "adminadmin",
];

/// Reason an admin password was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyFailure {
    #[error("password must be at least 12 characters long")]
    TooShort,

    #[error("password must contain at least one special character")]
    MissingSymbol,

    #[error("password must contain at least one digit")]
    MissingDigit,

    #[error("password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("password must not repeat a character three times in a row")]
    RepeatedCharacters,

    #[error("password must not contain a run of consecutive digits")]
    SequentialDigits,

    #[error("password is too common")]
    CommonPassword,

    #[error("password must not contain 'admin'")]
    ContainsAdmin,
}

impl From<PolicyFailure> for CoreError {
    fn from(failure: PolicyFailure) -> Self {
        CoreError::PolicyViolation(failure.to_string())
    }
}

fn has_triple_repeat(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

/// Check a candidate admin password against the policy
///
/// # Errors
///
/// The first rule the password breaks, in this order: length, symbol, digit,
/// uppercase, lowercase, repetition, digit sequence, deny-list, `admin`.
pub fn check_admin_password(password: &str) -> Result<(), PolicyFailure> {
    if password.chars().count() < MIN_ADMIN_PASSWORD_LEN {
        return Err(PolicyFailure::TooShort);
    }
    if !password.chars().any(|c| SYMBOLS.contains(c)) {
        return Err(PolicyFailure::MissingSymbol);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PolicyFailure::MissingDigit);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PolicyFailure::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PolicyFailure::MissingLowercase);
    }
    if has_triple_repeat(password) {
        return Err(PolicyFailure::RepeatedCharacters);
    }
    if DIGIT_SEQUENCES.iter().any(|seq| password.contains(seq)) {
        return Err(PolicyFailure::SequentialDigits);
    }

    let lowered = password.to_lowercase();
    if DENY_LIST.contains(&lowered.as_str()) {
        return Err(PolicyFailure::CommonPassword);
    }
    if lowered.contains("admin") {
        return Err(PolicyFailure::ContainsAdmin);
    }

    Ok(())
}
