//! Input-safety layer for untrusted form, chat, and search input.
//!
//! Everything in [`security`] is a pure function except the token generator,
//! which draws from an injected cryptographic random source. [`limit`] holds
//! the only time-dependent piece: a sliding-log rate limiter driven by an
//! injected [`limit::Clock`].
//!
//! These checks are defense-in-depth for client-side code. They never replace
//! server-side validation.

pub mod limit;
pub mod security;

pub use limit::{Clock, LimitsConfig, ManualClock, RateLimitError, RateLimitPolicy, RateLimiter, SystemClock};
pub use security::campaign::{validate_campaign_data, CampaignDraft, CampaignField, CampaignValidation, GameSystem, SanitizedCampaign};
pub use security::escape::{encode_uri_component, escape_html};
pub use security::input::{
    is_valid_email, is_valid_username, validate_chat_message, validate_password, ChatMessageCheck,
    ValidationResult,
};
pub use security::sanitize::{sanitize_description, sanitize_name, sanitize_search_query};
pub use security::token::{generate_token, TokenGenerator, TOKEN_BYTES};
