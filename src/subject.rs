//! Subject identity keys
//!
//! A subject key is the stable identifier for an actor: its public key,
//! hex-encoded to 64 characters. It keys the whitelist cache, the registry
//! tables, and the built-in admin set.

use crate::error::{Result, WardenError};
use std::fmt;
use std::str::FromStr;

/// Length of a hex-encoded subject key (32 bytes of key material)
pub const SUBJECT_KEY_LEN: usize = 64;

/// Validated, normalized subject identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectKey(String);

impl SubjectKey {
    /// Parse a subject key from its hex representation.
    ///
    /// Accepts mixed case and normalizes to lowercase. Rejects anything that
    /// is not exactly 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != SUBJECT_KEY_LEN {
            return Err(WardenError::Validation(format!(
                "subject key must be {} hex chars, got {}",
                SUBJECT_KEY_LEN,
                s.len()
            )));
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(WardenError::Validation(format!(
                "subject key contains non-hex characters: {}",
                s
            )));
        }
        Ok(SubjectKey(s.to_ascii_lowercase()))
    }

    /// The normalized hex form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SubjectKey {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self> {
        SubjectKey::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_key_parses() {
        let hex = "a".repeat(64);
        let key = SubjectKey::from_hex(&hex).unwrap();
        assert_eq!(key.as_str(), hex);
    }

    #[test]
    fn test_mixed_case_normalized() {
        let key = SubjectKey::from_hex(&"AbCdEf01".repeat(8)).unwrap();
        assert_eq!(key.as_str(), "abcdef01".repeat(8));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(SubjectKey::from_hex("abc123").is_err());
        assert!(SubjectKey::from_hex(&"a".repeat(65)).is_err());
        assert!(SubjectKey::from_hex("").is_err());
    }

    #[test]
    fn test_non_hex_rejected() {
        let mut s = "a".repeat(63);
        s.push('g');
        assert!(SubjectKey::from_hex(&s).is_err());
    }

    #[test]
    fn test_from_str() {
        let hex = "0".repeat(64);
        let key: SubjectKey = hex.parse().unwrap();
        assert_eq!(key.to_string(), hex);
    }
}
