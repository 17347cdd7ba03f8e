//! Short shareable join codes.

use std::fmt;

use rand::seq::IndexedRandom;
use serde::Serialize;

/// Alphabet the generator draws from. Codes are stored uppercase.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of characters in a join code.
pub const CODE_LENGTH: usize = 6;

/// A pool's shareable join code: six uppercase alphanumeric characters.
///
/// The generator makes no global uniqueness promise. The store's UNIQUE
/// constraint on the code column is the arbiter; pool creation retries
/// generation a bounded number of times on collision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JoinCode(String);

/// Rejection produced by [`JoinCode::parse`].
#[derive(Debug, thiserror::Error)]
#[error("join code must be {CODE_LENGTH} alphanumeric characters")]
pub struct InvalidJoinCode;

impl JoinCode {
    /// Generates a random code.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let code = (0..CODE_LENGTH)
            .filter_map(|_| ALPHABET.choose(&mut rng))
            .map(|&b| b as char)
            .collect();
        Self(code)
    }

    /// Parses a client-supplied code, normalizing it to uppercase.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidJoinCode`] when the input is not exactly
    /// [`CODE_LENGTH`] ASCII alphanumeric characters.
    pub fn parse(input: &str) -> Result<Self, InvalidJoinCode> {
        let trimmed = input.trim();
        if trimmed.len() != CODE_LENGTH || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InvalidJoinCode);
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_uppercase_alphanumerics() {
        for _ in 0..100 {
            let code = JoinCode::generate();
            assert_eq!(code.as_str().len(), CODE_LENGTH);
            assert!(
                code.as_str()
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
        }
    }

    #[test]
    fn parse_normalizes_to_uppercase() {
        let Ok(code) = JoinCode::parse(" ab12cd ") else {
            panic!("expected valid code");
        };
        assert_eq!(code.as_str(), "AB12CD");
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(JoinCode::parse("ABC12").is_err());
        assert!(JoinCode::parse("ABC1234").is_err());
        assert!(JoinCode::parse("").is_err());
    }

    #[test]
    fn parse_rejects_non_alphanumerics() {
        assert!(JoinCode::parse("AB-12C").is_err());
        assert!(JoinCode::parse("AB 12C").is_err());
    }
}
