//! Cryptographic utilities for admin session tokens.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Prefix carried by every admin session token.
pub const SESSION_TOKEN_PREFIX: &str = "os_";

/// Number of random bytes behind a session token.
const SESSION_TOKEN_BYTES: usize = 32;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a new random session token (`os_` followed by 64 hex chars).
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}{}", SESSION_TOKEN_PREFIX, hex::encode(bytes))
}

/// Returns true if the value looks like a token produced by [`generate_session_token`].
pub fn is_session_token_format(token: &str) -> bool {
    token
        .strip_prefix(SESSION_TOKEN_PREFIX)
        .map(|rest| rest.len() == SESSION_TOKEN_BYTES * 2 && rest.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex("same_input"), sha256_hex("same_input"));
        assert_ne!(sha256_hex("input1"), sha256_hex("input2"));
    }

    #[test]
    fn test_generate_session_token_format() {
        let token = generate_session_token();
        assert!(token.starts_with("os_"));
        assert_eq!(token.len(), 3 + 64);
        assert!(is_session_token_format(&token));
    }

    #[test]
    fn test_generate_session_token_unique() {
        assert_ne!(generate_session_token(), generate_session_token());
    }

    #[test]
    fn test_is_session_token_format_rejects_garbage() {
        assert!(!is_session_token_format("os_short"));
        assert!(!is_session_token_format("pm_abcdef"));
        assert!(!is_session_token_format(&format!("os_{}", "z".repeat(64))));
    }
}
