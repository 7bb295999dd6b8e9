//! Verification code
//!
//! A six-digit code is shown before play and must be typed back afterwards.
//! Generation and comparison only; the screens around it live elsewhere.

use rand::Rng;

pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;

/// Draw a six-digit code
pub fn generate_code<R: Rng>(rng: &mut R) -> String {
    rng.random_range(CODE_MIN..=CODE_MAX).to_string()
}

/// Exact match, ignoring surrounding whitespace in the input
pub fn verify_code(expected: &str, input: &str) -> bool {
    !expected.is_empty() && expected == input.trim()
}
