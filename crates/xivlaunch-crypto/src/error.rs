//! Error types for the launcher encoders

use thiserror::Error;

/// Errors that can occur while encoding launcher payloads
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid key size
    #[error("Invalid key size: expected 4..=56 bytes, got {0}")]
    InvalidKeySize(usize),

    /// Data handed to the block cipher is not block aligned
    #[error("Data length {0} is not a multiple of the 8 byte block size")]
    UnalignedBlock(usize),

    /// Ticket is empty
    #[error("Session ticket is empty")]
    EmptyTicket,
}
