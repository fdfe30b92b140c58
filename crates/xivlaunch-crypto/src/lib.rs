//! Encoders used by the FFXIV launcher protocol
//!
//! None of these are meant to keep anything secret. They exist because the
//! game client and the login servers expect their inputs in exactly the shape
//! the official launcher produces, so every byte has to match.
//!
//! # Components
//!
//! - **Arguments**: tick-keyed Blowfish encoding of the game process command line
//! - **Tickets**: CrtRand-padded Blowfish encoding of a platform session ticket
//! - **CrtRand**: the MSVC `rand()` linear congruential generator
//! - **Computer id**: the machine identifier sent in the login user agent
//!
//! # Examples
//!
//! ## Launch Arguments
//!
//! ```
//! use xivlaunch_crypto::argument::encrypt_arguments;
//!
//! let encoded = encrypt_arguments(" /DEV.TestSID =abc", 0x0123_4567)?;
//! assert!(encoded.starts_with("//**sqex0003"));
//! assert!(encoded.ends_with("**//"));
//! # Ok::<(), xivlaunch_crypto::CryptoError>(())
//! ```
//!
//! ## CrtRand
//!
//! ```
//! use xivlaunch_crypto::CrtRand;
//!
//! let mut rand = CrtRand::new(5050);
//! assert_eq!(rand.next(), 16529);
//! ```

#![warn(missing_docs)]

pub mod argument;
pub mod computer_id;
pub mod crt_rand;
pub mod error;
pub mod sqex_blowfish;
pub mod ticket;

pub use error::CryptoError;

// Re-export commonly used types
pub use argument::{checksum, current_ticks, encrypt_arguments};
pub use computer_id::computer_id;
pub use crt_rand::CrtRand;
pub use sqex_blowfish::SqexBlowfish;
pub use ticket::{EncryptedTicket, encrypt_ticket};
