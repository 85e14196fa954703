//! Anti-forgery tokens.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// Number of random bytes in a token. Tokens render as twice as many hex chars.
pub const TOKEN_BYTES: usize = 32;

/// Produces hex-encoded random tokens from a cryptographically secure source.
///
/// The `CryptoRng` bound keeps general-purpose generators out: tokens guard
/// forms against forgery and must not be predictable.
#[derive(Debug)]
pub struct TokenGenerator<R = OsRng> {
    rng: R,
}

impl TokenGenerator<OsRng> {
    /// A generator backed by the operating system's secure random source.
    pub fn new() -> Self {
        Self { rng: OsRng }
    }
}

impl Default for TokenGenerator<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> TokenGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a 64-character lowercase hex token (256 bits of entropy).
    pub fn generate(&mut self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        self.rng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

/// Generate a token from the operating system's secure random source.
pub fn generate_token() -> String {
    TokenGenerator::new().generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    #[test]
    fn test_token_format() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(is_lower_hex(&token), "not lowercase hex: {}", token);
    }

    #[test]
    fn test_token_uniqueness() {
        let t1 = generate_token();
        let t2 = generate_token();
        assert_ne!(t1, t2, "Two generated tokens should differ");
    }

    #[test]
    fn test_injected_rng_is_used() {
        let mut a = TokenGenerator::with_rng(StdRng::seed_from_u64(7));
        let mut b = TokenGenerator::with_rng(StdRng::seed_from_u64(7));
        assert_eq!(a.generate(), b.generate());
        assert_ne!(a.generate(), generate_token());
    }

    #[test]
    fn test_consecutive_tokens_from_one_generator_differ() {
        let mut generator = TokenGenerator::new();
        let first = generator.generate();
        let second = generator.generate();
        assert_eq!(second.len(), 64);
        assert_ne!(first, second);
    }
}
