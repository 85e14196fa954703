//! Allowlist validators for structured fields: email, username, password, chat.
//!
//! Validation failures are data, never errors. A [`ValidationResult`] or
//! [`ChatMessageCheck`] tells the caller whether to block submission and which
//! messages to show. Message strings are stable and shown verbatim in the UI.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::escape::escape_html;
use super::sanitize::utf16_len;

/// Maximum chat message length, in UTF-16 code units.
pub const MAX_CHAT_MESSAGE_CHARS: usize = 2000;

/// Minimum password length, in UTF-16 code units.
pub const MIN_PASSWORD_CHARS: usize = 8;

pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long";
pub const PASSWORD_NO_UPPERCASE: &str = "Password must contain at least one uppercase letter";
pub const PASSWORD_NO_LOWERCASE: &str = "Password must contain at least one lowercase letter";
pub const PASSWORD_NO_DIGIT: &str = "Password must contain at least one number";

pub const CHAT_MESSAGE_EMPTY: &str = "Message cannot be empty";
pub const CHAT_MESSAGE_TOO_LONG: &str = "Message too long (max 2000 characters)";

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// Loose address shape: `local@domain.tld`, no whitespace, a single `@`.
/// Not RFC 5322; quoted local parts and IP literals are rejected, and some
/// invalid domains are accepted.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// ASCII letters, digits, underscore, hyphen; 3-20 chars.
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,20}$").unwrap());

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Outcome of validating a single value. Valid iff there are no errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<String>,
}

impl ValidationResult {
    /// Build a result from collected errors, in the order they were found.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Outcome of checking a chat message.
///
/// A rejected message carries an error and an empty `sanitized` string; an
/// accepted one carries the escaped message and no error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessageCheck {
    valid: bool,
    sanitized: String,
    error: Option<String>,
}

impl ChatMessageCheck {
    fn accepted(sanitized: String) -> Self {
        Self {
            valid: true,
            sanitized,
            error: None,
        }
    }

    fn rejected(error: &str) -> Self {
        Self {
            valid: false,
            sanitized: String::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The escaped message. Empty when the message was rejected.
    pub fn sanitized(&self) -> &str {
        &self.sanitized
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Public validation functions
// ---------------------------------------------------------------------------

/// Check that an email address has the basic `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check that a username is 3-20 ASCII letters, digits, `_` or `-`.
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// Check password strength.
///
/// Every failed rule is reported, always in this order: length, uppercase,
/// lowercase, digit.
pub fn validate_password(password: &str) -> ValidationResult {
    let mut errors = Vec::new();

    if utf16_len(password) < MIN_PASSWORD_CHARS {
        errors.push(PASSWORD_TOO_SHORT.to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push(PASSWORD_NO_UPPERCASE.to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push(PASSWORD_NO_LOWERCASE.to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(PASSWORD_NO_DIGIT.to_string());
    }

    ValidationResult::from_errors(errors)
}

/// Check a chat message and escape it for display.
///
/// Blank (empty or whitespace-only) and over-long messages are rejected.
/// The accepted message is HTML-escaped but otherwise untouched; surrounding
/// whitespace is kept.
pub fn validate_chat_message(message: &str) -> ChatMessageCheck {
    if message.trim().is_empty() {
        return ChatMessageCheck::rejected(CHAT_MESSAGE_EMPTY);
    }
    if utf16_len(message) > MAX_CHAT_MESSAGE_CHARS {
        return ChatMessageCheck::rejected(CHAT_MESSAGE_TOO_LONG);
    }
    ChatMessageCheck::accepted(escape_html(message))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
