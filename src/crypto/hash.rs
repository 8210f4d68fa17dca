//! Cryptographic hashing utilities for the ledger
//!
//! Provides the SHA-256 based digest functions used for block sealing,
//! transaction integrity, and the proof-of-work difficulty check.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Checks if a hex-encoded digest meets the difficulty target.
/// The digest must start with `difficulty` zero hex characters.
pub fn meets_difficulty(digest: &str, difficulty: u32) -> bool {
    let required = difficulty as usize;
    if required == 0 {
        return true;
    }
    if digest.len() < required {
        return false;
    }
    digest.bytes().take(required).all(|c| c == b'0')
}
