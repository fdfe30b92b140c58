//! Game process argument encoding
//!
//! The game client accepts its command line either in plain `key=value` form
//! or wrapped as `//**sqex0003<payload><checksum>**//`. The payload is the
//! argument string prefixed with ` /T =<ticks>`, Blowfish encrypted with a key
//! derived from the upper half of the tick count, then URL-safe base64 encoded
//! with the trailing `=` kept.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::CryptoError;
use crate::sqex_blowfish::SqexBlowfish;

const CHECKSUM_TABLE: &[u8; 16] = b"fX1pGtdS5CAP4_VL";

const PREFIX: &str = "//**sqex0003";
const SUFFIX: &str = "**//";

/// 32-bit millisecond tick count
///
/// Only the value's shape matters to the game client, so wall-clock
/// milliseconds truncated to 32 bits stand in for the OS tick counter.
pub fn current_ticks() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u32)
        .unwrap_or_default()
}

/// Blowfish key for a tick count
pub fn key_for_ticks(ticks: u32) -> u32 {
    ticks & 0xFFFF_0000
}

/// Checksum character appended after the payload
pub fn checksum(key: u32) -> char {
    let index = ((key & 0x000F_0000) >> 16) as usize;
    char::from(CHECKSUM_TABLE[index])
}

/// Encode an argument string for the given tick count
///
/// `arguments` should already be in ` /key =value` form.
pub fn encrypt_arguments(arguments: &str, ticks: u32) -> Result<String, CryptoError> {
    let key = key_for_ticks(ticks);
    let key_text = format!("{key:08x}");

    let plaintext = format!(" /T ={ticks}{arguments}");
    let encrypted = SqexBlowfish::new(key_text.as_bytes())?.encrypt_padded(plaintext.as_bytes());

    let mut output = String::with_capacity(PREFIX.len() + encrypted.len() * 2 + SUFFIX.len() + 1);
    output.push_str(PREFIX);
    URL_SAFE.encode_string(&encrypted, &mut output);
    output.push(checksum(key));
    output.push_str(SUFFIX);
    Ok(output)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode(encoded: &str, ticks: u32) -> String {
        let inner = encoded
            .strip_prefix(PREFIX)
            .and_then(|rest| rest.strip_suffix(SUFFIX))
            .expect("Operation should succeed");
        let (payload, check) = inner.split_at(inner.len() - 1);
        assert_eq!(check.chars().next(), Some(checksum(key_for_ticks(ticks))));

        let mut bytes = URL_SAFE.decode(payload).expect("Operation should succeed");
        let cipher = SqexBlowfish::new(format!("{:08x}", key_for_ticks(ticks)).as_bytes())
            .expect("Operation should succeed");
        cipher
            .decrypt_in_place(&mut bytes)
            .expect("Operation should succeed");
        String::from_utf8(bytes)
            .expect("Operation should succeed")
            .trim_end_matches('\0')
            .to_string()
    }

    #[test]
    fn test_key_derivation() {
        assert_eq!(key_for_ticks(0x1234_5678), 0x1234_0000);
        assert_eq!(format!("{:08x}", key_for_ticks(0x0001_ffff)), "00010000");
    }

    #[test]
    fn test_checksum_table() {
        assert_eq!(checksum(0x0000_0000), 'f');
        assert_eq!(checksum(0x0001_0000), 'X');
        assert_eq!(checksum(0x000D_0000), '_');
        assert_eq!(checksum(0xFFFF_0000), 'L');
    }

    #[test]
    fn test_wrapper_shape() {
        let encoded = encrypt_arguments(" /DEV.TestSID =0123456789abcdef", 0x1234_5678)
            .expect("Operation should succeed");
        assert!(encoded.starts_with("//**sqex0003"));
        assert!(encoded.ends_with("G**//"));
    }

    #[test]
    fn test_payload_decodes_to_tick_prefixed_arguments() {
        let ticks = 0x0ABC_DEF0;
        let arguments = " /DEV.TestSID =abc /SYS.Region =3";
        let encoded = encrypt_arguments(arguments, ticks).expect("Operation should succeed");
        assert_eq!(decode(&encoded, ticks), format!(" /T ={ticks}{arguments}"));
    }

    #[test]
    fn test_padding_is_kept() {
        // " /T =1" is 6 bytes, one block, 8 bytes of base64 input -> 12 chars with one '='
        let encoded = encrypt_arguments("", 1).expect("Operation should succeed");
        let inner = &encoded[PREFIX.len()..encoded.len() - SUFFIX.len() - 1];
        assert_eq!(inner.len(), 12);
        assert!(inner.ends_with('='));
    }

    #[test]
    fn test_deterministic() {
        let first = encrypt_arguments(" /language =1", 987_654_321).expect("Operation should succeed");
        let second = encrypt_arguments(" /language =1", 987_654_321).expect("Operation should succeed");
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn checksum_depends_only_on_key(ticks in any::<u32>(), low in any::<u16>()) {
            let same_key = (ticks & 0xFFFF_0000) | u32::from(low);
            prop_assert_eq!(checksum(key_for_ticks(ticks)), checksum(key_for_ticks(same_key)));
        }

        #[test]
        fn encoding_is_deterministic(ticks in any::<u32>(), arguments in "[ -~]{0,64}") {
            let first = encrypt_arguments(&arguments, ticks).expect("Operation should succeed");
            let second = encrypt_arguments(&arguments, ticks).expect("Operation should succeed");
            prop_assert_eq!(first, second);
        }
    }
}
