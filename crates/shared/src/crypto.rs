//! Hashing utilities for credential verification.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verifies a presented token against a stored SHA-256 hex digest.
///
/// Comparing digests rather than raw tokens keeps the plaintext credential
/// out of configuration files and avoids length-dependent early exits.
pub fn verify_sha256(token: &str, expected_hex: &str) -> bool {
    let computed = sha256_hex(token);
    if computed.len() != expected_hex.len() {
        return false;
    }
    computed
        .bytes()
        .zip(expected_hex.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
