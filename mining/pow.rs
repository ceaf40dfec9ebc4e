//! Proof-of-work hashing for the simulated chain
//!
//! This module provides the hash function the search loop runs per attempt
//! and the difficulty predicate that decides when a candidate wins. A
//! candidate nonce is hashed as SHA256 over its decimal string form, and the
//! lowercase hex digest wins when it carries `difficulty` leading zero
//! characters.

use sha2::{Digest, Sha256};

/// Computes the digest for a candidate nonce.
///
/// The preimage is the nonce's decimal string representation, so the same
/// nonce always yields the same digest regardless of platform endianness.
///
/// # Arguments
/// * `nonce` - Candidate nonce value
///
/// # Returns
/// The lowercase hex encoding of the SHA256 digest (64 characters)
pub fn hash_nonce(nonce: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks whether a hex digest satisfies a leading-zeros difficulty.
///
/// # Arguments
/// * `digest` - Lowercase hex digest to test
/// * `difficulty` - Required number of leading `'0'` characters
///
/// # Returns
/// true if the digest starts with at least `difficulty` zero characters
pub fn meets_difficulty(digest: &str, difficulty: u32) -> bool {
    digest
        .bytes()
        .take(difficulty as usize)
        .filter(|&b| b == b'0')
        .count()
        == difficulty as usize
}
