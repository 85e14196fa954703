//! Escaping, validation, sanitization, and anti-forgery tokens.
//!
//! Validators report failures as data ([`input::ValidationResult`] and friends)
//! so callers can branch on them and show field-level messages. Sanitizers are
//! total: they never fail, they only strip and truncate.

pub mod campaign;
pub mod escape;
pub mod input;
pub mod sanitize;
pub mod token;
