//! Sliding-window rate limiting for user-triggered actions.
//!
//! One [`RateLimiter`] guards one action site (sending a chat message, creating
//! a campaign). Limits for the known sites come from a [`LimitsConfig`].

pub mod clock;
pub mod config;
pub mod rate_limiter;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, LimitsConfig, RateLimitPolicy};
pub use rate_limiter::{RateLimitError, RateLimiter};
