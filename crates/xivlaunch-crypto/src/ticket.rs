//! Platform session ticket encoding
//!
//! When logging in through Steam the launcher forwards the Steam auth ticket to
//! the login server. The ticket is hex encoded, prefixed with a checksum, padded
//! with CrtRand-chosen characters to a block boundary, Blowfish encrypted under
//! a key derived from the current minute and finally base64 encoded with the
//! launcher's character substitutions.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::crt_rand::CrtRand;
use crate::error::CryptoError;
use crate::sqex_blowfish::SqexBlowfish;

const FILLER_ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

/// Maximum length of one comma-separated chunk of the encoded ticket
pub const CHUNK_SIZE: usize = 300;

/// Encoded ticket ready to be placed in the login page query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedTicket {
    /// Comma-joined chunks of mangled base64
    pub text: String,
    /// Length of `text`, sent alongside it as `ticket_size`
    pub length: usize,
}

/// Round a unix timestamp the way the launcher does before keying the cipher
pub fn round_time(time: u32) -> u32 {
    let time = time.wrapping_sub(5);
    time - time % 60
}

/// Encode a raw platform ticket issued at `time` (unix seconds)
pub fn encrypt_ticket(ticket: &[u8], time: u32) -> Result<EncryptedTicket, CryptoError> {
    if ticket.is_empty() {
        return Err(CryptoError::EmptyTicket);
    }

    let time = round_time(time);

    let mut raw_ticket = hex::encode(ticket).into_bytes();
    raw_ticket.push(0);

    let ticket_sum = raw_ticket
        .iter()
        .fold(0u16, |sum, &byte| sum.wrapping_add(u16::from(byte)));

    let mut buffer = Vec::with_capacity(raw_ticket.len() + 16);
    buffer.extend_from_slice(&ticket_sum.to_le_bytes());
    buffer.extend_from_slice(&raw_ticket);

    let seed = time ^ (ticket_sum as i16 as i32 as u32);
    let mut rand = CrtRand::new(seed);

    let padded_len = padded_length(raw_ticket.len());
    let filler_len = padded_len - 2 - raw_ticket.len();

    let mut running_sum = u32::from_le_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]);
    let mut filler = Vec::with_capacity(filler_len);
    for _ in 0..filler_len {
        let index = (running_sum.wrapping_add(rand.next()) & 0x3F) as usize;
        let character = FILLER_ALPHABET[index];
        filler.push(character);
        running_sum = running_sum.wrapping_add(u32::from(character));
    }

    let mut block = Vec::with_capacity(padded_len);
    block.extend_from_slice(&running_sum.to_le_bytes());
    block.extend_from_slice(&buffer[4..]);
    block.extend_from_slice(&filler);
    block.swap(0, 1);

    let key = format!("{time:08x}#un@e=x>");
    SqexBlowfish::new(key.as_bytes())?.encrypt_in_place(&mut block)?;

    let text = chunked(&mangled_base64(&block));
    Ok(EncryptedTicket {
        length: text.len(),
        text,
    })
}

/// Encrypted block length for a NUL terminated hex ticket of `raw_len` bytes
///
/// `raw_len + 9` rounded up to a multiple of 8. The block holds the ticket,
/// its two checksum bytes and the filler.
fn padded_length(raw_len: usize) -> usize {
    (raw_len + 9).div_ceil(8) * 8
}

/// Base64 with `+`, `/` and `=` replaced by `-`, `_` and `*`
pub fn mangled_base64(data: &[u8]) -> String {
    STANDARD
        .encode(data)
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            '=' => '*',
            other => other,
        })
        .collect()
}

fn chunked(text: &str) -> String {
    text.as_bytes()
        .chunks(CHUNK_SIZE)
        .map(|chunk| String::from_utf8_lossy(chunk))
        .collect::<Vec<_>>()
        .join(",")
}
