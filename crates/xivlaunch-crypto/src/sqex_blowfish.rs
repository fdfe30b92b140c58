//! Blowfish in the byte order the game client uses
//!
//! Square Enix loads each 64-bit block as two little-endian words, which is
//! what [`blowfish::BlowfishLE`] does. The key schedule is the standard one.
//! Payloads are encrypted in ECB mode after zero-padding to the block size.

use ::blowfish::BlowfishLE;
use cipher::generic_array::GenericArray;
use cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

use crate::error::CryptoError;

/// Blowfish block size in bytes
pub const BLOCK_SIZE: usize = 8;

/// ECB Blowfish cipher with little-endian block words
pub struct SqexBlowfish {
    cipher: BlowfishLE,
}

impl SqexBlowfish {
    /// Create a cipher from a 4 to 56 byte key
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let cipher =
            BlowfishLE::new_from_slice(key).map_err(|_| CryptoError::InvalidKeySize(key.len()))?;
        Ok(Self { cipher })
    }

    /// Encrypt `data`, zero-padding it up to the next block boundary
    pub fn encrypt_padded(&self, data: &[u8]) -> Vec<u8> {
        let mut buffer = pad_to_block(data);
        for block in buffer.chunks_exact_mut(BLOCK_SIZE) {
            self.cipher.encrypt_block(GenericArray::from_mut_slice(block));
        }
        buffer
    }

    /// Encrypt block-aligned data in place
    pub fn encrypt_in_place(&self, data: &mut [u8]) -> Result<(), CryptoError> {
        if data.len() % BLOCK_SIZE != 0 {
            return Err(CryptoError::UnalignedBlock(data.len()));
        }
        for block in data.chunks_exact_mut(BLOCK_SIZE) {
            self.cipher.encrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(())
    }

    /// Decrypt block-aligned data in place
    pub fn decrypt_in_place(&self, data: &mut [u8]) -> Result<(), CryptoError> {
        if data.len() % BLOCK_SIZE != 0 {
            return Err(CryptoError::UnalignedBlock(data.len()));
        }
        for block in data.chunks_exact_mut(BLOCK_SIZE) {
            self.cipher.decrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(())
    }
}

fn pad_to_block(data: &[u8]) -> Vec<u8> {
    let padded_len = data.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
    let mut buffer = Vec::with_capacity(padded_len);
    buffer.extend_from_slice(data);
    buffer.resize(padded_len, 0);
    buffer
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_to_block() {
        assert_eq!(pad_to_block(b"").len(), 0);
        assert_eq!(pad_to_block(b"a").len(), 8);
        assert_eq!(pad_to_block(b"12345678").len(), 8);
        assert_eq!(pad_to_block(b"123456789"), b"123456789\0\0\0\0\0\0\0".to_vec());
    }

    #[test]
    fn test_round_trip() {
        let cipher = SqexBlowfish::new(b"00010000").expect("Operation should succeed");
        let mut data = cipher.encrypt_padded(b"Hello, Eorzea!");
        assert_eq!(data.len(), 16);
        assert_ne!(&data[..14], b"Hello, Eorzea!");

        cipher
            .decrypt_in_place(&mut data)
            .expect("Operation should succeed");
        assert_eq!(&data[..14], b"Hello, Eorzea!");
        assert_eq!(&data[14..], &[0, 0]);
    }

    #[test]
    fn test_little_endian_differs_from_standard() {
        use ::blowfish::Blowfish;

        let key = b"abcdefgh";
        let le = SqexBlowfish::new(key).expect("Operation should succeed");
        let be: Blowfish = Blowfish::new_from_slice(key).expect("Operation should succeed");

        let mut standard = *b"01234567";
        be.encrypt_block(GenericArray::from_mut_slice(&mut standard));
        assert_ne!(le.encrypt_padded(b"01234567"), standard.to_vec());
    }

    #[test]
    fn test_unaligned_rejected() {
        let cipher = SqexBlowfish::new(b"abcd").expect("Operation should succeed");
        let mut data = [0u8; 7];
        assert!(matches!(
            cipher.encrypt_in_place(&mut data),
            Err(CryptoError::UnalignedBlock(7))
        ));
    }

    #[test]
    fn test_invalid_key() {
        assert!(matches!(
            SqexBlowfish::new(b"abc"),
            Err(CryptoError::InvalidKeySize(3))
        ));
    }
}
