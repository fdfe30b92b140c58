//! Machine identifier embedded in the login user agent

use sha1::{Digest, Sha1};

/// Derive the 10 hex digit computer id from a stable per-machine seed
///
/// Bytes 1..5 of the seed's SHA-1 are kept and byte 0 is set so that all five
/// bytes sum to zero.
pub fn computer_id(seed: &str) -> String {
    let digest = Sha1::digest(seed.as_bytes());

    let mut bytes = [0u8; 5];
    bytes[1..].copy_from_slice(&digest[1..5]);
    let sum = bytes[1..]
        .iter()
        .fold(0u8, |sum, &byte| sum.wrapping_add(byte));
    bytes[0] = sum.wrapping_neg();

    hex::encode(bytes)
}
