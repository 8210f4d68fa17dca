//! Cryptographic utilities for the ledger
//!
//! This module provides:
//! - SHA-256 digests and the proof-of-work difficulty predicate
//! - ECDSA signing capability (secp256k1)

pub mod hash;
pub mod keys;

pub use hash::{meets_difficulty, sha256, sha256_hex};
pub use keys::{public_key_from_hex, sign_digest, verify_signature, KeyError, KeyPair};
